//! Evaluates an hourly job with a 10 second starting deadline at four
//! instants around its 03:00 (Los Angeles) run.
//!
//! Run with `cargo run -p catchup-cli --example deadline_walkthrough`.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use chrono_tz::America::Los_Angeles;

use catchup_core::JobDescriptor;
use catchup_scheduler::{MissedRunCalculator, SafetyCap};

fn main() -> Result<()> {
    catchup_logging::init_logger("debug", None);

    let job = JobDescriptor::from_json(include_str!("../fixtures/hourly-job.json"))?;
    let calculator = MissedRunCalculator::new(Los_Angeles, SafetyCap::default());

    let cases = [
        ("exactly on schedule", (3, 0, 0)),
        ("after the schedule, before the starting deadline", (3, 0, 9)),
        ("exactly on the starting deadline", (3, 0, 10)),
        ("after the starting deadline", (3, 0, 11)),
    ];

    for (description, (h, m, s)) in cases {
        let now = Los_Angeles
            .with_ymd_and_hms(2022, 7, 21, h, m, s)
            .single()
            .ok_or_else(|| anyhow::anyhow!("ambiguous local time"))?
            .with_timezone(&Utc);
        let report = calculator.for_job(&job, now)?;
        println!("\n{description} at {}", now.with_timezone(&Los_Angeles));
        println!("  earliest time: {}", report.window.earliest_time.with_timezone(&Los_Angeles));
        if report.missed.is_empty() {
            println!("  no unmet schedules");
        }
        for t in report.missed.iter() {
            println!("  - {}", t.with_timezone(&Los_Angeles));
        }
    }
    Ok(())
}
