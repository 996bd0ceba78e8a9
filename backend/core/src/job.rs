//! Serialized job object, shaped like a Kubernetes `CronJob`.
//!
//! Only the fields that feed the catch-up calculation are decoded; anything
//! else in the document is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatchupError;
use crate::types::{DeadlineConstraint, RunHistory, ScheduleSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub metadata: JobMetadata,
    pub spec: JobSpec,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_deadline_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_schedule_time: Option<DateTime<Utc>>,
}

impl JobDescriptor {
    pub fn from_json(raw: &str) -> Result<Self, CatchupError> {
        serde_json::from_str(raw).map_err(|e| CatchupError::Descriptor(e.to_string()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, CatchupError> {
        serde_yaml::from_str(raw).map_err(|e| CatchupError::Descriptor(e.to_string()))
    }

    /// Display name, falling back to `"<unnamed>"`.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("<unnamed>")
    }

    pub fn schedule_spec(&self) -> ScheduleSpec {
        ScheduleSpec::new(self.spec.schedule.clone())
    }

    pub fn run_history(&self) -> RunHistory {
        RunHistory {
            last_schedule_time: self.status.last_schedule_time,
            creation_time: self.metadata.creation_timestamp,
        }
    }

    pub fn deadline(&self) -> Option<DeadlineConstraint> {
        self.spec
            .starting_deadline_seconds
            .map(DeadlineConstraint::seconds)
    }
}
