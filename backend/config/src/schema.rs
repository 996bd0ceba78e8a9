//! Runtime configuration schema, typed for serde YAML deserialization.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use catchup_scheduler::{SafetyCap, DEFAULT_MAX_MISSED_RUNS};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_REFERENCE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchupConfig {
    /// Most missed runs a single computation may return before failing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_missed_runs: Option<usize>,

    /// IANA zone name schedule expressions are evaluated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the daily-rotated JSON log; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl CatchupConfig {
    pub fn max_missed_runs(&self) -> usize {
        self.max_missed_runs.unwrap_or(DEFAULT_MAX_MISSED_RUNS)
    }

    pub fn safety_cap(&self) -> SafetyCap {
        SafetyCap::new(self.max_missed_runs())
    }

    pub fn time_reference(&self) -> &str {
        self.time_reference
            .as_deref()
            .unwrap_or(DEFAULT_TIME_REFERENCE)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        let name = self.time_reference();
        name.parse::<Tz>()
            .map_err(|_| anyhow!("unknown time reference '{}'", name))
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }
}
