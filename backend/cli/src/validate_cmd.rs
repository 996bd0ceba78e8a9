//! `catchup validate`: check an expression and preview its occurrences.

use anyhow::Result;
use chrono::{DateTime, Utc};

use catchup_config::CatchupConfig;
use catchup_core::ScheduleSpec;
use catchup_scheduler::CronEvaluator;

use crate::terminal_output::{paint, BOLD, DIM, GREEN};

pub fn run(
    config: &CatchupConfig,
    expression: &str,
    count: usize,
    after: Option<DateTime<Utc>>,
) -> Result<()> {
    let evaluator = CronEvaluator::parse(&ScheduleSpec::new(expression), config.time_zone()?)?;
    let tz = evaluator.time_zone();
    let after = after.unwrap_or_else(Utc::now);

    println!(
        "{} {} {}",
        paint(GREEN, "valid"),
        paint(BOLD, evaluator.expression()),
        paint(DIM, &format!("(evaluated in {tz})"))
    );
    let upcoming = evaluator.upcoming(after, count);
    if upcoming.is_empty() {
        println!("  no occurrences after {}", after.with_timezone(&tz).to_rfc3339());
    }
    for t in upcoming {
        println!("  - {}", t.with_timezone(&tz).to_rfc3339());
    }
    Ok(())
}
