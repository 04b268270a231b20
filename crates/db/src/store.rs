//! JSON-file data store.
//!
//! Each [`Collection`] is one pretty-printed JSON array on disk. A missing
//! file reads as an empty collection. Writes go to a temp file first and are
//! renamed into place so a crash never leaves a half-written collection.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::DbError;

/// The three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Tickets,
    Workflows,
    Executions,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Tickets    => "itsm_tickets.json",
            Self::Workflows  => "itsm_workflows.json",
            Self::Executions => "itsm_executions.json",
        }
    }
}

/// Handle on a data directory, shared by every repository function.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Open (and create if needed) the data directory at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DbError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Opened data store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Read a whole collection.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, DbError> {
        let path = self.path_for(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DbError::Io(e)),
        };

        serde_json::from_str(&content).map_err(|source| DbError::Json { path, source })
    }

    /// Replace a whole collection.
    pub fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<(), DbError> {
        let path = self.path_for(collection);
        let content = serde_json::to_string_pretty(items).map_err(|source| DbError::Json {
            path: path.clone(),
            source,
        })?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &path)?;
        debug!("Wrote {} item(s) to {}", items.len(), path.display());
        Ok(())
    }
}
