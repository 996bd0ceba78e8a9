use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// The schedule a job runs on, as written in its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSpec {
    pub schedule_expression: String,
}

impl ScheduleSpec {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            schedule_expression: expression.into(),
        }
    }
}

/// What the caller knows about previous executions of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHistory {
    pub last_schedule_time: Option<DateTime<Utc>>,
    pub creation_time: DateTime<Utc>,
}

impl RunHistory {
    pub fn new(creation_time: DateTime<Utc>) -> Self {
        Self {
            last_schedule_time: None,
            creation_time,
        }
    }

    pub fn with_last_schedule_time(mut self, at: DateTime<Utc>) -> Self {
        self.last_schedule_time = Some(at);
        self
    }

    /// The last recorded run, or the creation time when the job never ran
    /// (or its status was lost).
    pub fn last_known_start(&self) -> DateTime<Utc> {
        self.last_schedule_time.unwrap_or(self.creation_time)
    }
}

/// Maximum age of a missed run that is still worth starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineConstraint {
    pub starting_deadline_seconds: u64,
}

impl DeadlineConstraint {
    pub fn seconds(starting_deadline_seconds: u64) -> Self {
        Self {
            starting_deadline_seconds,
        }
    }

    /// `now - starting_deadline_seconds`, or `None` when that instant is not
    /// representable.
    pub fn scheduling_deadline(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.starting_deadline_seconds).ok()?;
        let delta = TimeDelta::try_seconds(secs)?;
        now.checked_sub_signed(delta)
    }
}

/// The interval `(earliest_time, now]` searched for missed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunWindow {
    pub earliest_time: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl RunWindow {
    /// True when the window starts after `now`, i.e. nothing can be missed.
    pub fn is_empty(&self) -> bool {
        self.earliest_time > self.now
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t > self.earliest_time && t <= self.now
    }
}

/// Missed occurrences in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissedRunSet(Vec<DateTime<Utc>>);

impl MissedRunSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_sorted(times: Vec<DateTime<Utc>>) -> Self {
        Self(times)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The latest missed occurrence, which is the one a controller that only
    /// starts a single catch-up run would pick.
    pub fn most_recent(&self) -> Option<DateTime<Utc>> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateTime<Utc>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DateTime<Utc>] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DateTime<Utc>> {
        self.0
    }
}

impl IntoIterator for MissedRunSet {
    type Item = DateTime<Utc>;
    type IntoIter = std::vec::IntoIter<DateTime<Utc>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds a [`MissedRunSet`] one occurrence at a time, rejecting anything
/// that would break ascending order.
#[derive(Debug, Default)]
pub struct MissedRunSetBuilder {
    floor: Option<DateTime<Utc>>,
    times: Vec<DateTime<Utc>>,
}

impl MissedRunSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose entries must all come strictly after `floor`.
    pub fn after(floor: DateTime<Utc>) -> Self {
        Self {
            floor: Some(floor),
            times: Vec::new(),
        }
    }

    /// Appends `t` and returns the new count. Returns `None` (and leaves the
    /// builder untouched) if `t` does not come strictly after the previous
    /// entry, or after the floor for the first one.
    pub fn push(&mut self, t: DateTime<Utc>) -> Option<usize> {
        if self.times.last().or(self.floor.as_ref()).is_some_and(|last| *last >= t) {
            return None;
        }
        self.times.push(t);
        Some(self.times.len())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn build(self) -> MissedRunSet {
        MissedRunSet::from_sorted(self.times)
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
    fn last_known_start_falls_back_to_creation() {
        let history = RunHistory::new(at(1, 0, 0));
        assert_eq!(history.last_known_start(), at(1, 0, 0));

        let history = history.with_last_schedule_time(at(3, 0, 0));
        assert_eq!(history.last_known_start(), at(3, 0, 0));
    }

    #[test]
    fn scheduling_deadline_subtracts_seconds() {
        let deadline = DeadlineConstraint::seconds(10);
        assert_eq!(deadline.scheduling_deadline(at(3, 0, 11)), Some(at(3, 0, 1)));
    }

    #[test]
    fn scheduling_deadline_out_of_range_is_none() {
        let deadline = DeadlineConstraint::seconds(u64::MAX);
        assert_eq!(deadline.scheduling_deadline(at(3, 0, 0)), None);
    }

    #[test]
    fn window_bounds_are_open_below_closed_above() {
        let window = RunWindow {
            earliest_time: at(3, 0, 0),
            now: at(4, 0, 0),
        };
        assert!(!window.contains(at(3, 0, 0)));
        assert!(window.contains(at(4, 0, 0)));
        assert!(!window.is_empty());
    }

    #[test]
    fn builder_rejects_out_of_order_times() {
        let mut builder = MissedRunSetBuilder::new();
        assert_eq!(builder.push(at(3, 0, 0)), Some(1));
        assert_eq!(builder.push(at(3, 0, 0)), None);
        assert_eq!(builder.push(at(2, 0, 0)), None);
        assert_eq!(builder.push(at(4, 0, 0)), Some(2));

        let set = builder.build();
        assert_eq!(set.most_recent(), Some(at(4, 0, 0)));
        assert_eq!(set.as_slice(), &[at(3, 0, 0), at(4, 0, 0)]);
    }

    #[test]
    fn builder_rejects_times_at_or_before_the_floor() {
        let mut builder = MissedRunSetBuilder::after(at(3, 0, 0));
        assert_eq!(builder.push(at(2, 30, 0)), None);
        assert_eq!(builder.push(at(3, 0, 0)), None);
        assert!(builder.is_empty());
        assert_eq!(builder.push(at(3, 30, 0)), Some(1));
    }

    #[test]
    fn missed_run_set_serializes_as_list() {
        let set = MissedRunSet::from_sorted(vec![at(4, 0, 0)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["2022-07-21T04:00:00Z"]"#);
    }
}
