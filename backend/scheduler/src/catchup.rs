//! Entry point tying the deadline window, evaluator and safety cap together.

use catchup_core::{
    CatchupError, DeadlineConstraint, JobDescriptor, MissedRunSet, RunHistory, RunWindow,
    ScheduleSpec,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::cap::SafetyCap;
use crate::deadline::run_window;
use crate::enumerator::enumerate_missed;
use crate::evaluator::CronEvaluator;

/// Outcome of one catch-up computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchupReport {
    pub window: RunWindow,
    pub missed: MissedRunSet,
}

/// Computes the unmet schedule times of a job.
///
/// Pure and synchronous: `now` is always supplied by the caller and no state
/// is kept between calls. Callers must not run two computations for the same
/// job concurrently with different `now` values, and `now` is assumed not to
/// move backwards between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissedRunCalculator {
    time_zone: Tz,
    cap: SafetyCap,
}

impl Default for MissedRunCalculator {
    fn default() -> Self {
        Self::new(chrono_tz::UTC, SafetyCap::default())
    }
}

impl MissedRunCalculator {
    /// `time_zone` is the wall clock schedule expressions are read in.
    pub fn new(time_zone: Tz, cap: SafetyCap) -> Self {
        Self { time_zone, cap }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn cap(&self) -> SafetyCap {
        self.cap
    }

    pub fn evaluator(&self, schedule: &ScheduleSpec) -> Result<CronEvaluator, CatchupError> {
        CronEvaluator::parse(schedule, self.time_zone)
    }

    /// Parse the schedule, then enumerate the occurrences missed since the
    /// last known start (bounded by the starting deadline).
    pub fn compute(
        &self,
        schedule: &ScheduleSpec,
        history: &RunHistory,
        deadline: Option<&DeadlineConstraint>,
        now: DateTime<Utc>,
    ) -> Result<CatchupReport, CatchupError> {
        let evaluator = self.evaluator(schedule)?;
        let window = run_window(history, deadline, now);
        debug!(
            schedule = %schedule.schedule_expression,
            earliest = %window.earliest_time,
            %now,
            "Computing unmet schedule times"
        );
        let missed = enumerate_missed(&evaluator, window, self.cap)?;
        Ok(CatchupReport { window, missed })
    }

    pub fn unmet_schedule_times(
        &self,
        schedule: &ScheduleSpec,
        history: &RunHistory,
        deadline: Option<&DeadlineConstraint>,
        now: DateTime<Utc>,
    ) -> Result<MissedRunSet, CatchupError> {
        self.compute(schedule, history, deadline, now)
            .map(|report| report.missed)
    }

    pub fn for_job(
        &self,
        job: &JobDescriptor,
        now: DateTime<Utc>,
    ) -> Result<CatchupReport, CatchupError> {
        self.compute(
            &job.schedule_spec(),
            &job.run_history(),
            job.deadline().as_ref(),
            now,
        )
    }
}
