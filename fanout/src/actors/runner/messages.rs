use crate::error;
use crate::events::JobStatus;
use crate::report::Report;
use crate::types::{JobId, JobSpec};
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum RunnerMessage {
    StartJob {
        spec: JobSpec,
        response: oneshot::Sender<error::Result<JobId>>,
    },
    StopJob {
        job_id: JobId,
        response: oneshot::Sender<error::Result<()>>,
    },
    GetStatus {
        job_id: JobId,
        response: oneshot::Sender<error::Result<JobStatus>>,
    },
    WaitAll {
        response: oneshot::Sender<error::Result<Report>>,
    },
}
