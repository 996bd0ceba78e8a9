//! Missed-run ("catch-up") computation for cron-scheduled jobs.
//!
//! Given a schedule, what is known about the job's previous runs, an
//! optional starting deadline and the current time, [`MissedRunCalculator`]
//! lists the occurrences that were missed, bounded by a [`SafetyCap`].

pub mod cap;
pub mod catchup;
pub mod cron_parser;
pub mod deadline;
pub mod enumerator;
pub mod evaluator;

pub use cap::{SafetyCap, DEFAULT_MAX_MISSED_RUNS};
pub use catchup::{CatchupReport, MissedRunCalculator};
pub use deadline::{compute_earliest_time, run_window};
pub use enumerator::enumerate_missed;
pub use evaluator::{CronEvaluator, ScheduleEvaluator};
