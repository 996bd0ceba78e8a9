//! Environment variable overrides for config values.
//!
//! | Variable                  | Field             |
//! |---------------------------|-------------------|
//! | `CATCHUP_MAX_MISSED_RUNS` | `maxMissedRuns`   |
//! | `CATCHUP_TIME_REFERENCE`  | `timeReference`   |
//! | `CATCHUP_LOG_LEVEL`       | `logging.level`   |
//! | `CATCHUP_LOG_DIR`         | `logging.dir`     |
//!
//! Empty values are ignored.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::schema::CatchupConfig;

pub const ENV_MAX_MISSED_RUNS: &str = "CATCHUP_MAX_MISSED_RUNS";
pub const ENV_TIME_REFERENCE: &str = "CATCHUP_TIME_REFERENCE";
pub const ENV_LOG_LEVEL: &str = "CATCHUP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATCHUP_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: CatchupConfig) -> Result<CatchupConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: CatchupConfig,
    env: &HashMap<String, String>,
) -> Result<CatchupConfig> {
    let lookup = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(raw) = lookup(ENV_MAX_MISSED_RUNS) {
        let limit: usize = raw
            .parse()
            .with_context(|| format!("{ENV_MAX_MISSED_RUNS} must be a non-negative integer, got '{raw}'"))?;
        debug!(limit, "Overriding maxMissedRuns from environment");
        config.max_missed_runs = Some(limit);
    }
    if let Some(zone) = lookup(ENV_TIME_REFERENCE) {
        config.time_reference = Some(zone.to_string());
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(Default::default).level = Some(level.to_string());
    }
    if let Some(dir) = lookup(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(Default::default).dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}
