use crate::events::JobStatus;
use crate::types::{JobId, JobSpec};
use std::fmt;

#[derive(Clone, Debug)]
pub enum JobOutcome {
    Finished {
        job_id: JobId,
        spec: JobSpec,
        status: JobStatus,
    },
    /// the program could not be spawned at all
    NotStarted { spec: JobSpec, error: String },
}

impl JobOutcome {
    pub fn spec(&self) -> &JobSpec {
        match self {
            JobOutcome::Finished { spec, .. } | JobOutcome::NotStarted { spec, .. } => spec,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Finished { status, .. } if status.is_success())
    }

    pub fn started(&self) -> bool {
        matches!(self, JobOutcome::Finished { .. })
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.spec())?;
        match self {
            JobOutcome::Finished { status, .. } => write!(f, "{}", status),
            JobOutcome::NotStarted { error, .. } => write!(f, "not started ({})", error),
        }
    }
}

/// Outcome of every job a runner launched, in launch order.
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub outcomes: Vec<JobOutcome>,
}

impl Report {
    pub fn new(outcomes: Vec<JobOutcome>) -> Self {
        Self { outcomes }
    }

    /// true when every job started and exited with code 0
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::is_success)
    }

    pub fn all_started(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::started)
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }
}
