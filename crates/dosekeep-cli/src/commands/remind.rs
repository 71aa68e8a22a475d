//! Reminder CLI commands.

use clap::Subcommand;
use dosekeep_core::gateway::NotificationGateway;
use dosekeep_core::reminders::identifier::decode;
use dosekeep_core::{Goal, ScheduleReport};

use super::{now, parse_datetime, runtime, CliResult, Context};

#[derive(Subcommand)]
pub enum RemindAction {
    /// Replace the pending reminders of a goal (or every goal)
    Schedule {
        /// Goal id or name
        key: Option<String>,
        /// Schedule every goal
        #[arg(long, conflicts_with = "key")]
        all: bool,
    },
    /// Cancel the pending reminders of a goal
    Cancel {
        /// Goal id or name
        key: String,
    },
    /// List pending reminders
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decide whether a due reminder should be delivered
    Check {
        /// Goal id or name
        key: String,
        /// Scheduled time of the reminder (HH:MM or YYYY-MM-DD HH:MM)
        #[arg(long)]
        at: String,
        /// Evaluate as of this time instead of now
        #[arg(long)]
        now: Option<String>,
    },
    /// Cancel pending reminders of a goal set earlier in the day than a slot
    Supersede {
        /// Goal id or name
        key: String,
        /// The slot taking over (HH:MM or YYYY-MM-DD HH:MM)
        #[arg(long)]
        at: String,
    },
    /// Cancel every pending reminder
    Clear,
}

pub fn run(action: RemindAction) -> CliResult {
    let ctx = Context::load()?;
    match action {
        RemindAction::Schedule { key, all } => {
            let goals = if all {
                ctx.goals.load_all()?
            } else {
                let key = key.ok_or("a goal id or name is required (or --all)")?;
                vec![ctx.goals.find(&key)?]
            };
            schedule(&ctx, &goals)
        }
        RemindAction::Cancel { key } => {
            let goal = ctx.goals.find(&key)?;
            let coordinator = ctx.coordinator()?;
            let cancelled = runtime()?.block_on(coordinator.cancel_reminders(&goal))?;
            println!("Cancelled {} reminder(s) for '{}'.", cancelled.len(), goal.name);
            Ok(())
        }
        RemindAction::Pending { json } => pending(&ctx, json),
        RemindAction::Check { key, at, now: at_now } => {
            let goal = ctx.goals.find(&key)?;
            let scheduled = parse_datetime(&at)?;
            let reference = match at_now {
                Some(value) => parse_datetime(&value)?,
                None => now(),
            };
            let coordinator = ctx.coordinator()?;
            if coordinator.should_suppress(&goal, scheduled, reference) {
                println!("suppress");
            } else {
                println!("deliver");
            }
            Ok(())
        }
        RemindAction::Supersede { key, at } => {
            let goal = ctx.goals.find(&key)?;
            let scheduled = parse_datetime(&at)?;
            let coordinator = ctx.coordinator()?;
            let retracted =
                runtime()?.block_on(coordinator.retract_superseded(&goal, scheduled))?;
            if retracted.is_empty() {
                println!("Nothing superseded.");
            }
            for identifier in retracted {
                println!("Retracted {identifier}");
            }
            Ok(())
        }
        RemindAction::Clear => {
            let gateway = ctx.gateway()?;
            runtime()?.block_on(gateway.cancel_all())?;
            println!("All pending reminders cancelled.");
            Ok(())
        }
    }
}

fn schedule(ctx: &Context, goals: &[Goal]) -> CliResult {
    let coordinator = ctx.coordinator()?;
    let rt = runtime()?;
    rt.block_on(coordinator.register_categories())?;

    let mut reports = Vec::new();
    for goal in goals {
        let report = rt.block_on(coordinator.schedule_reminder(goal))?;
        print_report(goal, &report);
        reports.push(report);
    }

    for report in reports {
        report.into_result()?;
    }
    Ok(())
}

fn print_report(goal: &Goal, report: &ScheduleReport) {
    println!(
        "{}: {} scheduled, {} replaced",
        goal.name,
        report.submitted.len(),
        report.cancelled.len()
    );
    for failure in &report.failures {
        println!("  failed {}: {}", failure.identifier, failure.message);
    }
}

fn pending(ctx: &Context, json: bool) -> CliResult {
    let specs = ctx.gateway()?.specs()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }
    if specs.is_empty() {
        println!("No pending reminders.");
        return Ok(());
    }

    println!("Pending reminders ({}):", specs.len());
    for spec in specs {
        let slot = decode(&spec.identifier)
            .map(|d| format!("{} {:02}:{:02}", d.slot.frequency, d.slot.hour, d.slot.minute))
            .unwrap_or_else(|| "unrecognized".to_string());
        println!("  {}  {}  {}", spec.identifier, slot, spec.content.body);
    }
    Ok(())
}
