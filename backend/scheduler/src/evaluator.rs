//! Schedule evaluation: "when does this schedule fire next?".

use std::borrow::Cow;
use std::str::FromStr;

use catchup_core::{CatchupError, ScheduleSpec};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;

use crate::cron_parser::normalize_standard;

/// Produces the next occurrence of a schedule strictly after a given instant.
///
/// Implementations must be deterministic and return a value strictly later
/// than `after`; `None` means the schedule never fires again.
pub trait ScheduleEvaluator {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Human-readable form used in error messages.
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("custom schedule")
    }
}

impl<F> ScheduleEvaluator for F
where
    F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>>,
{
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self(after)
    }
}

/// Evaluates a standard cron expression in an explicit time reference.
///
/// Instants go in and come out as UTC; the expression's fields (hour,
/// day-of-month, ...) are matched against wall-clock time in `time_zone`.
/// A `CRON_TZ=` prefix on the expression overrides the zone given to
/// [`CronEvaluator::parse`].
#[derive(Debug, Clone)]
pub struct CronEvaluator {
    expression: String,
    time_zone: Tz,
    schedules: Vec<Schedule>,
}

impl CronEvaluator {
    pub fn parse(spec: &ScheduleSpec, time_zone: Tz) -> Result<Self, CatchupError> {
        let expression = spec.schedule_expression.as_str();
        let normalized = normalize_standard(expression)
            .map_err(|e| CatchupError::invalid_schedule(expression, e))?;

        let schedules = normalized
            .expressions
            .iter()
            .map(|e| Schedule::from_str(e))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatchupError::invalid_schedule(expression, e))?;

        Ok(Self {
            expression: expression.to_string(),
            time_zone: normalized.time_zone.unwrap_or(time_zone),
            schedules,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The zone the expression is evaluated in.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Up to `count` occurrences strictly after `after`.
    pub fn upcoming(&self, after: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        let mut times = Vec::new();
        let mut cursor = after;
        while times.len() < count {
            match self.next_after(cursor) {
                Some(next) => {
                    times.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        times
    }
}

impl ScheduleEvaluator for CronEvaluator {
    fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = after.with_timezone(&self.time_zone);
        // The `cron` crate steps through wall-clock time, so inside a repeated
        // (fall-back) hour it can hand back an instant that is not after `after`.
        self.schedules
            .iter()
            .filter_map(|schedule| {
                schedule
                    .after(&local)
                    .map(|next| next.with_timezone(&Utc))
                    .find(|next| *next > after)
            })
            .min()
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Weekday};

    fn evaluator(expr: &str) -> CronEvaluator {
        CronEvaluator::parse(&ScheduleSpec::new(expr), chrono_tz::UTC).unwrap()
    }

    #[test]
    fn hourly_next_is_top_of_next_hour() {
        let eval = evaluator("0 * * * *");
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 3, 0, 1).unwrap();
        assert_eq!(
            eval.next_after(t),
            Some(Utc.with_ymd_and_hms(2022, 7, 21, 4, 0, 0).unwrap())
        );
    }

    #[test]
    fn next_is_strictly_after_an_exact_match() {
        let eval = evaluator("0 * * * *");
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 3, 0, 0).unwrap();
        assert_eq!(
            eval.next_after(t),
            Some(Utc.with_ymd_and_hms(2022, 7, 21, 4, 0, 0).unwrap())
        );
    }

    #[test]
    fn evaluates_in_the_given_time_reference() {
        let eval = CronEvaluator::parse(
            &ScheduleSpec::new("0 3 * * *"),
            chrono_tz::America::Los_Angeles,
        )
        .unwrap();
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        // 03:00 PDT is 10:00 UTC.
        assert_eq!(
            eval.next_after(t),
            Some(Utc.with_ymd_and_hms(2022, 7, 21, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn expression_prefix_overrides_time_reference() {
        let eval = CronEvaluator::parse(
            &ScheduleSpec::new("CRON_TZ=Asia/Tokyo 0 9 * * *"),
            chrono_tz::America::Los_Angeles,
        )
        .unwrap();
        assert_eq!(eval.time_zone(), chrono_tz::Asia::Tokyo);
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        // 09:00 JST is 00:00 UTC the same day; strictly after means next day.
        assert_eq!(
            eval.next_after(t),
            Some(Utc.with_ymd_and_hms(2022, 7, 22, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn restricted_day_fields_match_either() {
        // 1st of the month OR any Monday. 2022-08-01 is itself a Monday.
        let eval = evaluator("0 0 1 * 1");
        let start = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        let times = eval.upcoming(start, 3);
        assert_eq!(
            times,
            vec![
                Utc.with_ymd_and_hms(2022, 7, 25, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2022, 8, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2022, 8, 8, 0, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn numeric_sunday_is_sunday() {
        let eval = evaluator("30 12 * * 0");
        let start = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        let next = eval.next_after(start).unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
        assert_eq!(next, Utc.with_ymd_and_hms(2022, 7, 24, 12, 30, 0).unwrap());
    }

    #[test]
    fn invalid_expression_carries_expression_and_message() {
        let err = CronEvaluator::parse(&ScheduleSpec::new("not a cron"), chrono_tz::UTC)
            .unwrap_err();
        match err {
            CatchupError::InvalidScheduleExpression { expression, message } => {
                assert_eq!(expression, "not a cron");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn closures_are_evaluators() {
        let every_minute = |t: DateTime<Utc>| Some(t + chrono::TimeDelta::minutes(1));
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        assert_eq!(every_minute.next_after(t), Some(t + chrono::TimeDelta::minutes(1)));
        assert_eq!(every_minute.describe(), "custom schedule");
    }

    #[test]
    fn fall_back_hour_never_goes_backwards() {
        // 2022-11-06 in Los Angeles: 01:00-02:00 local happens twice.
        // 09:00 UTC is the second 01:00 (PST); 08:30 UTC is the first 01:30 (PDT).
        let eval = CronEvaluator::parse(
            &ScheduleSpec::new("30 * * * *"),
            chrono_tz::America::Los_Angeles,
        )
        .unwrap();
        let after = Utc.with_ymd_and_hms(2022, 11, 6, 9, 0, 0).unwrap();
        let next = eval.next_after(after).unwrap();
        assert!(next > after, "{next} is not after {after}");
        assert!(next <= Utc.with_ymd_and_hms(2022, 11, 6, 10, 30, 0).unwrap());

        let times = eval.upcoming(Utc.with_ymd_and_hms(2022, 11, 6, 7, 0, 0).unwrap(), 6);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn upcoming_with_huge_count_stops_when_schedule_ends() {
        // February 30th never happens.
        let eval = evaluator("0 0 30 2 *");
        let t = Utc.with_ymd_and_hms(2022, 7, 21, 0, 0, 0).unwrap();
        assert!(eval.upcoming(t, usize::MAX).is_empty());
    }
}
