//! Ticket CRUD operations.

use engine::Ticket;

use crate::{Collection, DataStore, DbError};

const KIND: &str = "ticket";

/// Return every ticket in storage order.
pub fn list(store: &DataStore) -> Result<Vec<Ticket>, DbError> {
    store.load(Collection::Tickets)
}

/// Fetch a single ticket by id.
pub fn get(store: &DataStore, id: &str) -> Result<Ticket, DbError> {
    list(store)?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| DbError::NotFound { kind: KIND, id: id.to_owned() })
}

/// Append a new ticket.
///
/// Returns `DbError::AlreadyExists` if the id is taken.
pub fn create(store: &DataStore, ticket: &Ticket) -> Result<(), DbError> {
    let mut tickets = list(store)?;
    if tickets.iter().any(|t| t.id == ticket.id) {
        return Err(DbError::AlreadyExists { kind: KIND, id: ticket.id.clone() });
    }
    tickets.push(ticket.clone());
    store.save(Collection::Tickets, &tickets)
}

/// Replace an existing ticket in place.
///
/// Returns `DbError::NotFound` if no ticket has this id.
pub fn update(store: &DataStore, ticket: &Ticket) -> Result<(), DbError> {
    let mut tickets = list(store)?;
    let slot = tickets
        .iter_mut()
        .find(|t| t.id == ticket.id)
        .ok_or_else(|| DbError::NotFound { kind: KIND, id: ticket.id.clone() })?;
    *slot = ticket.clone();
    store.save(Collection::Tickets, &tickets)
}

/// Permanently delete a ticket by id.
///
/// Returns `DbError::NotFound` if nothing was deleted.
pub fn delete(store: &DataStore, id: &str) -> Result<(), DbError> {
    let mut tickets = list(store)?;
    let before = tickets.len();
    tickets.retain(|t| t.id != id);

    if tickets.len() == before {
        return Err(DbError::NotFound { kind: KIND, id: id.to_owned() });
    }

    store.save(Collection::Tickets, &tickets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Status;
    use tempfile::TempDir;

    fn store() -> (TempDir, DataStore) {
        let temp = TempDir::new().unwrap();
        let store = DataStore::open(temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn create_get_update_delete() {
        let (_temp, store) = store();
        let mut ticket = Ticket::new("ticket_1", "Disk full", "User");
        ticket.tags.insert("storage".into());

        create(&store, &ticket).unwrap();
        assert_eq!(get(&store, "ticket_1").unwrap(), ticket);

        ticket.status = Status::Resolved;
        update(&store, &ticket).unwrap();
        assert_eq!(get(&store, "ticket_1").unwrap().status, Status::Resolved);

        delete(&store, "ticket_1").unwrap();
        assert!(matches!(get(&store, "ticket_1"), Err(DbError::NotFound { .. })));
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let (_temp, store) = store();
        let ticket = Ticket::new("ticket_1", "Disk full", "User");
        create(&store, &ticket).unwrap();
        assert!(matches!(
            create(&store, &ticket),
            Err(DbError::AlreadyExists { id, .. }) if id == "ticket_1"
        ));
    }

    #[test]
    fn update_and_delete_require_existing_ticket() {
        let (_temp, store) = store();
        let ticket = Ticket::new("ghost", "?", "User");
        assert!(matches!(update(&store, &ticket), Err(DbError::NotFound { .. })));
        assert!(matches!(delete(&store, "ghost"), Err(DbError::NotFound { .. })));
    }
}
