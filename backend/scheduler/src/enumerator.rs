//! Walks a schedule's occurrences through a run window.

use catchup_core::{CatchupError, MissedRunSet, MissedRunSetBuilder, RunWindow};
use tracing::{debug, warn};

use crate::cap::SafetyCap;
use crate::evaluator::ScheduleEvaluator;

/// Collect every occurrence in `(window.earliest_time, window.now]`.
///
/// When more than `cap.limit()` occurrences fall in the window, the walk
/// stops and [`CatchupError::TooManyMissedRuns`] is returned instead of a
/// truncated list.
///
/// An evaluator that breaks its contract (an occurrence at or before
/// `window.earliest_time`, or at or before the previous occurrence) stops the
/// walk with [`CatchupError::InvalidScheduleExpression`]. Unlike a parse
/// failure, this surfaces mid-walk; no partial list is returned either way.
pub fn enumerate_missed<E>(
    evaluator: &E,
    window: RunWindow,
    cap: SafetyCap,
) -> Result<MissedRunSet, CatchupError>
where
    E: ScheduleEvaluator + ?Sized,
{
    if window.is_empty() {
        debug!(
            earliest = %window.earliest_time,
            now = %window.now,
            "Run window starts after now, nothing missed"
        );
        return Ok(MissedRunSet::new());
    }

    let mut missed = MissedRunSetBuilder::after(window.earliest_time);
    let mut next = evaluator.next_after(window.earliest_time);
    while let Some(t) = next.filter(|t| *t <= window.now) {
        let Some(count) = missed.push(t) else {
            return Err(CatchupError::invalid_schedule(
                evaluator.describe(),
                format!("schedule did not advance: {t} is not after the previous occurrence"),
            ));
        };
        if let Err(e) = cap.check(count) {
            warn!(
                schedule = %evaluator.describe(),
                limit = cap.limit(),
                earliest = %window.earliest_time,
                now = %window.now,
                "Too many missed start times, refusing to enumerate"
            );
            return Err(e);
        }
        next = evaluator.next_after(t);
    }

    debug!(count = missed.len(), "Enumerated missed runs");
    Ok(missed.build())
}
