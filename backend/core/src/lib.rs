pub mod error;
pub mod job;
pub mod types;

pub use error::CatchupError;
pub use job::{JobDescriptor, JobMetadata, JobSpec, JobStatus};
pub use types::{
    DeadlineConstraint, MissedRunSet, MissedRunSetBuilder, RunHistory, RunWindow, ScheduleSpec,
};
