//! Intake log CLI commands.

use clap::Subcommand;
use dosekeep_core::model::names_match;
use dosekeep_core::{IntakeEntry, IntakeStore};

use super::{now, parse_datetime, CliResult, Context};

#[derive(Subcommand)]
pub enum IntakeAction {
    /// Log an intake
    Log {
        /// Name of what was taken
        name: String,
        /// When it was taken (defaults to now)
        #[arg(long)]
        at: Option<String>,
        /// Record the intake without counting it toward a goal
        #[arg(long)]
        missed: bool,
    },
    /// List logged intakes
    List {
        /// Only entries with this name
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Intakes logged today
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a logged intake
    Remove {
        /// Entry id (see `intake list --json`)
        id: String,
    },
}

pub fn run(action: IntakeAction) -> CliResult {
    let ctx = Context::load()?;
    let db = ctx.database()?;

    let (entries, json) = match action {
        IntakeAction::Log { name, at, missed } => {
            let timestamp = match at {
                Some(at) => parse_datetime(&at)?,
                None => now(),
            };
            let mut entry = IntakeEntry::new(name, timestamp);
            entry.goal_met = !missed;
            db.record_entry(&entry)?;
            println!("Logged {} at {}", entry.name, entry.timestamp.format("%Y-%m-%d %H:%M"));
            return Ok(());
        }
        IntakeAction::List { name, json } => {
            let mut entries = db.all_entries()?;
            if let Some(name) = name {
                entries.retain(|e| names_match(&e.name, &name));
            }
            (entries, json)
        }
        IntakeAction::Today { json } => (db.today_entries(now())?, json),
        IntakeAction::Remove { id } => {
            if !db.delete_entry(&id)? {
                return Err(format!("Entry '{id}' not found").into());
            }
            println!("Entry removed: {id}");
            return Ok(());
        }
    };

    print_entries(&entries, json)
}

fn print_entries(entries: &[IntakeEntry], json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No intakes logged.");
        return Ok(());
    }
    for entry in entries {
        let marker = if entry.goal_met { "" } else { " (missed)" };
        println!(
            "  {}  {}{marker}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.name
        );
    }
    Ok(())
}
