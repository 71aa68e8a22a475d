//! Goal management CLI commands.

use chrono::NaiveDate;
use clap::Subcommand;
use dosekeep_core::Goal;

use super::{now, parse_date, parse_time_on, runtime, CliResult, Context};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Goal name, matched against intake entries
        name: String,
        /// Recurrence label: "Daily", "Weekly" or "Monthly"
        #[arg(long, default_value = "Daily")]
        recurrence: String,
        /// Reminder time (HH:MM), repeatable
        #[arg(long = "at", required = true)]
        at: Vec<String>,
        /// Anchor date (YYYY-MM-DD); its weekday or day-of-month is used for
        /// weekly and monthly goals. Defaults to today.
        #[arg(long)]
        on: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        dosage: f64,
        #[arg(long, default_value = "")]
        units: String,
    },
    /// List goals
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a goal and cancel its reminders
    Remove {
        /// Goal id or name
        key: String,
    },
}

pub fn run(action: GoalAction) -> CliResult {
    match action {
        GoalAction::Add {
            name,
            recurrence,
            at,
            on,
            dosage,
            units,
        } => {
            let date = match on {
                Some(on) => parse_date(&on)?,
                None => now().date(),
            };
            add_goal(name, recurrence, &at, date, dosage, units)
        }
        GoalAction::List { json } => list_goals(json),
        GoalAction::Remove { key } => remove_goal(&key),
    }
}

fn add_goal(
    name: String,
    recurrence: String,
    at: &[String],
    date: NaiveDate,
    dosage: f64,
    units: String,
) -> CliResult {
    let ctx = Context::load()?;
    if ctx.goals.load_all()?.iter().any(|g| g.matches_name(&name)) {
        return Err(format!("Goal '{name}' already exists").into());
    }

    let mut goal = Goal::new(name, recurrence).with_dosage(dosage, units);
    for time in at {
        goal = goal.with_target(parse_time_on(time, date)?);
    }

    let id = goal.id.clone();
    ctx.goals.upsert(goal)?;
    println!("Goal added: {id}");
    Ok(())
}

fn list_goals(json: bool) -> CliResult {
    let ctx = Context::load()?;
    let goals = ctx.goals.load_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goals)?);
        return Ok(());
    }
    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    println!("Goals ({}):", goals.len());
    for goal in goals {
        let status = if goal.active { "active" } else { "inactive" };
        let times: Vec<String> = goal
            .target_times
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect();
        println!("  {} [{}] ({status})", goal.name, goal.id);
        println!("    {} at {}", goal.recurrence, times.join(", "));
    }
    Ok(())
}

fn remove_goal(key: &str) -> CliResult {
    let ctx = Context::load()?;
    let goal = ctx.goals.remove(key)?;

    let coordinator = ctx.coordinator()?;
    let cancelled = runtime()?.block_on(coordinator.cancel_reminders(&goal))?;
    println!(
        "Goal '{}' removed ({} reminder(s) cancelled).",
        goal.name,
        cancelled.len()
    );
    Ok(())
}
