use crate::types::{JobId, OutputBlob};
use std::fmt;
use std::process::ExitStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Exited { code: i32 },
    Killed { signal: i32 },
    /// the process is gone but its exit status could not be collected
    Unknown,
}

impl JobStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, JobStatus::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Exited { code: 0 })
    }
}

impl From<ExitStatus> for JobStatus {
    fn from(exit_status: ExitStatus) -> Self {
        if let Some(code) = exit_status.code() {
            return JobStatus::Exited { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = exit_status.signal() {
                return JobStatus::Killed { signal };
            }
        }
        JobStatus::Unknown
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Exited { code } => write!(f, "exited with code {}", code),
            JobStatus::Killed { signal } => write!(f, "killed by signal {}", signal),
            JobStatus::Unknown => write!(f, "exit status unknown"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A chunk of bytes read from one of a job's pipes.
#[derive(Clone, Debug)]
pub struct Output {
    pub job_id: JobId,
    pub stream: Stream,
    pub blob: OutputBlob,
}
