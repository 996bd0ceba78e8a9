//! Config validation with field paths in every message.

use thiserror::Error;

use crate::schema::CatchupConfig;

/// Above this cap a single computation may hold a very large list in memory.
pub const MAX_MISSED_RUNS_WARNING: usize = 10_000;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CatchupConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_cap(config, &mut report);
    validate_time_reference(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_cap(config: &CatchupConfig, report: &mut ValidationReport) {
    match config.max_missed_runs() {
        0 => report.error(
            "maxMissedRuns",
            "Must be at least 1; 0 would reject every missed run",
        ),
        n if n > MAX_MISSED_RUNS_WARNING => report.warn(
            "maxMissedRuns",
            format!("{n} is very large; a skewed clock could enumerate that many runs"),
        ),
        _ => {}
    }
}

fn validate_time_reference(config: &CatchupConfig, report: &mut ValidationReport) {
    if let Err(e) = config.time_zone() {
        report.error("timeReference", e.to_string());
    }
}

fn validate_logging(config: &CatchupConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if logging.level.as_deref().is_some_and(|l| l.trim().is_empty()) {
        report.error("logging.level", "Log level cannot be empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LoggingConfig;

    #[test]
    fn default_config_is_valid() {
        let report = validate(&CatchupConfig::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_cap_is_an_error() {
        let cfg = CatchupConfig {
            max_missed_runs: Some(0),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "maxMissedRuns");
    }

    #[test]
    fn huge_cap_is_a_warning() {
        let cfg = CatchupConfig {
            max_missed_runs: Some(1_000_000),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn collects_every_error() {
        let cfg = CatchupConfig {
            max_missed_runs: Some(0),
            time_reference: Some("Nowhere/Special".to_string()),
            logging: Some(LoggingConfig {
                level: Some(" ".to_string()),
                dir: None,
            }),
        };
        let paths: Vec<_> = validate(&cfg).errors.into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["maxMissedRuns", "timeReference", "logging.level"]);
    }
}
