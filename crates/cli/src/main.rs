//! `itsm-automator` CLI entry-point.
//!
//! Available sub-commands:
//! - `init`       - seed the sample rules into an empty data directory.
//! - `submit`     - run `ticket_created` rules for a new ticket JSON file.
//! - `update`     - run edit triggers for a changed ticket JSON file.
//! - `validate`   - validate a rule-set JSON file.
//! - `rules`      - list, import, add, enable, disable or delete rules.
//! - `tickets`    - list or delete tickets.
//! - `executions` - show the execution log.
//! - `stats`      - print dashboard counters.

mod automation;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use automation::{Automator, ProcessReport};
use db::repository::{executions, rules, tickets};
use db::DataStore;
use engine::{
    validate_rules, DispatchConfig, Status, Ticket, UnsupportedActionPolicy, WorkflowRule,
};
use notify::TracingNotifier;

#[derive(Parser)]
#[command(
    name = "itsm-automator",
    about = "Rule-based automation for IT service management tickets",
    version
)]
struct Cli {
    /// Directory holding the ticket, rule and execution collections.
    #[arg(long, global = true, env = "ITSM_DATA_DIR", default_value = ".itsm")]
    data_dir: PathBuf,

    /// Record rules that hit an unsupported action as failed executions.
    #[arg(long, global = true)]
    mark_unsupported_failed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a rule-set JSON file.
    Validate {
        /// Path to the rules JSON file.
        path: PathBuf,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

/// Sub-commands that work against the data directory.
#[derive(Subcommand)]
enum StoreCommand {
    /// Seed the sample rules if the data directory is empty.
    Init,
    /// Submit a new ticket and run `ticket_created` rules.
    Submit {
        /// Path to the ticket JSON file.
        path: PathBuf,
    },
    /// Save an edited ticket and run the triggers the edit raises.
    Update {
        /// Path to the ticket JSON file.
        path: PathBuf,
    },
    /// Manage workflow rules.
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Manage tickets.
    Tickets {
        #[command(subcommand)]
        command: TicketsCommand,
    },
    /// Show the execution log, newest first.
    Executions {
        /// Only show executions for this ticket.
        #[arg(long)]
        ticket: Option<String>,
    },
    /// Print ticket, rule and execution totals.
    Stats,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// List rules in dispatch order.
    List,
    /// Validate a rule-set file and replace the stored rules with it.
    Import {
        path: PathBuf,
    },
    /// Validate a single rule file and register it after the existing rules.
    Add {
        path: PathBuf,
    },
    /// Enable a rule.
    Enable {
        id: String,
    },
    /// Disable a rule without deleting it.
    Disable {
        id: String,
    },
    /// Delete a rule. Its executions stay in the log.
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum TicketsCommand {
    /// List tickets, optionally filtered by status.
    List {
        #[arg(long)]
        status: Option<Status>,
    },
    /// Delete a ticket.
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => validate(&path),
        Command::Store(command) => run(&cli.data_dir, cli.mark_unsupported_failed, command).await,
    }
}

fn validate(path: &Path) -> Result<()> {
    let rule_set: Vec<WorkflowRule> = read_json(path)?;
    match validate_rules(&rule_set) {
        Ok(()) => {
            println!("✅ {} rule(s) are valid.", rule_set.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Validation failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(data_dir: &Path, mark_unsupported_failed: bool, command: StoreCommand) -> Result<()> {
    let store = DataStore::open(data_dir)
        .with_context(|| format!("cannot open data directory {}", data_dir.display()))?;
    let config = DispatchConfig {
        unsupported_actions: if mark_unsupported_failed {
            UnsupportedActionPolicy::MarkFailed
        } else {
            UnsupportedActionPolicy::Ignore
        },
    };
    let automator = Automator::new(store, config, Arc::new(TracingNotifier));

    match command {
        StoreCommand::Init => {
            if automator.seed_samples()? {
                println!("Seeded sample rules into {}", data_dir.display());
            } else {
                println!("Data directory already initialised; nothing to do.");
            }
        }
        StoreCommand::Submit { path } => {
            let ticket: Ticket = read_json(&path)?;
            let report = automator.submit(ticket).await?;
            print_report(&report);
        }
        StoreCommand::Update { path } => {
            let ticket: Ticket = read_json(&path)?;
            let report = automator.update(ticket).await?;
            print_report(&report);
        }
        StoreCommand::Rules { command: RulesCommand::List } => {
            for rule in rules::list(automator.store())? {
                println!(
                    "{} [{}] {} - trigger: {}, {} condition(s), {} action(s), executions: {}",
                    rule.id,
                    if rule.enabled { "enabled" } else { "disabled" },
                    rule.name,
                    rule.trigger,
                    rule.conditions.len(),
                    rule.actions.len(),
                    rule.execution_count,
                );
            }
        }
        StoreCommand::Rules { command: RulesCommand::Import { path } } => {
            let rule_set: Vec<WorkflowRule> = read_json(&path)?;
            validate_rules(&rule_set)?;
            rules::replace_all(automator.store(), &rule_set)?;
            info!("Imported {} rule(s) from {}", rule_set.len(), path.display());
            println!("Imported {} rule(s).", rule_set.len());
        }
        StoreCommand::Rules { command: RulesCommand::Add { path } } => {
            let rule: WorkflowRule = read_json(&path)?;
            automator.add_rule(&rule)?;
            println!("Added rule {} ({})", rule.id, rule.name);
        }
        StoreCommand::Rules { command: RulesCommand::Enable { id } } => {
            let rule = automator.set_rule_enabled(&id, true)?;
            println!("Enabled rule {} ({})", rule.id, rule.name);
        }
        StoreCommand::Rules { command: RulesCommand::Disable { id } } => {
            let rule = automator.set_rule_enabled(&id, false)?;
            println!("Disabled rule {} ({})", rule.id, rule.name);
        }
        StoreCommand::Rules { command: RulesCommand::Delete { id } } => {
            automator.delete_rule(&id)?;
            println!("Deleted rule {id}");
        }
        StoreCommand::Tickets { command: TicketsCommand::List { status } } => {
            for ticket in tickets::list(automator.store())?
                .into_iter()
                .filter(|t| status.map_or(true, |s| t.status == s))
            {
                println!(
                    "{} [{} / {} / {}] {} - assignee: {}, tags: {:?}",
                    ticket.id,
                    ticket.status,
                    ticket.priority,
                    ticket.category,
                    ticket.title,
                    ticket.assignee.as_deref().unwrap_or("-"),
                    ticket.tags,
                );
            }
        }
        StoreCommand::Tickets { command: TicketsCommand::Delete { id } } => {
            tickets::delete(automator.store(), &id)?;
            println!("Deleted ticket {id}");
        }
        StoreCommand::Executions { ticket } => {
            let store = automator.store();
            let log = match &ticket {
                Some(id) => executions::list_for_ticket(store, id)?,
                None => executions::list(store)?,
            };
            let names: HashMap<String, String> = rules::list(store)?
                .into_iter()
                .map(|r| (r.id, r.name))
                .collect();

            if log.is_empty() {
                println!("No workflow executions yet.");
            }
            for execution in log.iter().rev() {
                println!(
                    "{} {} - ticket {} at {}",
                    if execution.success { "✔" } else { "✘" },
                    names.get(&execution.rule_id).map_or("Unknown Workflow", String::as_str),
                    execution.ticket_id,
                    execution.executed_at.to_rfc3339(),
                );
                for action in &execution.actions_executed {
                    println!("    - {action}");
                }
            }
        }
        StoreCommand::Stats => {
            let stats = automator.stats()?;
            println!("Total tickets:    {}", stats.total_tickets);
            println!("Open tickets:     {}", stats.open_tickets);
            println!("Active workflows: {}", stats.active_rules);
            println!("Total executions: {}", stats.total_executions);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_report(report: &ProcessReport) {
    let ticket = &report.ticket;
    println!(
        "Ticket {} saved [{} / {}], assignee: {}",
        ticket.id,
        ticket.status,
        ticket.priority,
        ticket.assignee.as_deref().unwrap_or("-"),
    );
    let triggers: Vec<_> = report.triggers.iter().map(|t| t.as_str()).collect();
    println!("Triggers: {}", triggers.join(", "));

    if report.executions.is_empty() {
        println!("No rules fired.");
    }
    for execution in &report.executions {
        println!("Rule {} fired:", execution.rule_id);
        for action in &execution.actions_executed {
            println!("    - {action}");
        }
    }
    if report.notifications_failed > 0 {
        println!(
            "{} notification(s) delivered, {} failed",
            report.notifications_delivered, report.notifications_failed
        );
    }
}
