//! Starting-deadline window: the earliest instant worth catching up from.

use catchup_core::{DeadlineConstraint, RunHistory, RunWindow};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Latest of the last known start and `now - starting_deadline_seconds`.
///
/// Nothing before the scheduling deadline is ever caught up, however long
/// the job has been dormant.
pub fn compute_earliest_time(
    history: &RunHistory,
    deadline: Option<&DeadlineConstraint>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let base = history.last_known_start();
    let Some(scheduling_deadline) = deadline.and_then(|d| d.scheduling_deadline(now)) else {
        return base;
    };
    if scheduling_deadline > base {
        debug!(
            %base,
            %scheduling_deadline,
            "Starting deadline is later than last known start"
        );
        scheduling_deadline
    } else {
        base
    }
}

pub fn run_window(
    history: &RunHistory,
    deadline: Option<&DeadlineConstraint>,
    now: DateTime<Utc>,
) -> RunWindow {
    RunWindow {
        earliest_time: compute_earliest_time(history, deadline, now),
        now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 7, 21, h, m, s).unwrap()
    }

    #[test]
    fn uses_last_schedule_time_without_deadline() {
        let history = RunHistory::new(at(0, 0, 0)).with_last_schedule_time(at(3, 0, 0));
        assert_eq!(compute_earliest_time(&history, None, at(9, 0, 0)), at(3, 0, 0));
    }

    #[test]
    fn uses_creation_time_when_never_scheduled() {
        let history = RunHistory::new(at(1, 30, 0));
        assert_eq!(compute_earliest_time(&history, None, at(9, 0, 0)), at(1, 30, 0));
    }

    #[test]
    fn deadline_within_history_keeps_base() {
        let history = RunHistory::new(at(0, 0, 0)).with_last_schedule_time(at(3, 0, 0));
        let deadline = DeadlineConstraint::seconds(10);
        assert_eq!(
            compute_earliest_time(&history, Some(&deadline), at(3, 0, 9)),
            at(3, 0, 0)
        );
        // Equal is not later: base is kept.
        assert_eq!(
            compute_earliest_time(&history, Some(&deadline), at(3, 0, 10)),
            at(3, 0, 0)
        );
    }

    #[test]
    fn deadline_dominates_old_history() {
        let history = RunHistory::new(at(0, 0, 0)).with_last_schedule_time(at(3, 0, 0));
        let deadline = DeadlineConstraint::seconds(10);
        assert_eq!(
            compute_earliest_time(&history, Some(&deadline), at(3, 0, 11)),
            at(3, 0, 1)
        );

        let never_ran = RunHistory::new(at(0, 0, 0));
        assert_eq!(
            compute_earliest_time(&never_ran, Some(&deadline), at(3, 0, 11)),
            at(3, 0, 1)
        );
    }

    #[test]
    fn unrepresentable_deadline_keeps_base() {
        let history = RunHistory::new(at(0, 0, 0));
        let deadline = DeadlineConstraint::seconds(u64::MAX);
        assert_eq!(
            compute_earliest_time(&history, Some(&deadline), at(3, 0, 0)),
            at(0, 0, 0)
        );
    }

    #[test]
    fn window_can_start_after_now() {
        let history = RunHistory::new(at(5, 0, 0));
        let window = run_window(&history, None, at(3, 0, 0));
        assert!(window.is_empty());
    }
}
