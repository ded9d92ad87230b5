mod actor;
mod messages;

use self::{
    actor::JobRunner,
    messages::RunnerMessage::{self, GetStatus, StartJob, StopJob, WaitAll},
};
use crate::actors::relay::RelayHandle;
use crate::error::{self, Error};
use crate::events::JobStatus;
use crate::report::Report;
use crate::sinks::Sinks;
use crate::types::{JobId, JobSpec};
use tokio::sync::{mpsc, oneshot};

/// A `Runner` which launches build jobs and relays their output to a single pair of sinks.
///
/// This struct is actually an actor handle, the real work is done in the actor spawned by `Runner::spawn`,
/// but from the user perspective all that matters is that this struct provides methods for managing jobs.
/// The actor-handle abstraction allows this struct to be cloned freely in a multi-thread async context,
/// without requiring an `Arc<Mutex>` or any other means of synchronization.
#[derive(Clone)]
pub struct RunnerHandle {
    sender: mpsc::Sender<RunnerMessage>,
}

impl RunnerHandle {
    /// Spawn a new runner writing job output to `sinks`.
    ///
    /// Specify the capacity for the runner's message queue. This limits the build-up of inbound messages.
    pub fn spawn(sinks: Sinks, message_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(message_capacity);
        JobRunner::spawn(receiver, RelayHandle::spawn(sinks));
        Self { sender }
    }

    async fn request<T>(
        &self,
        msg: impl FnOnce(oneshot::Sender<error::Result<T>>) -> RunnerMessage,
    ) -> error::Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(msg(tx))
            .await
            .map_err(|_| Error::RunnerExited)?;
        rx.await.map_err(|_| Error::RunnerExited)?
    }

    /// Start one job. Returns as soon as the process has been spawned.
    pub async fn start_job(&self, spec: JobSpec) -> error::Result<JobId> {
        self.request(|response| StartJob { spec, response }).await
    }

    /// Launch every spec in order without waiting for any of them to finish.
    ///
    /// There is one entry per spec in the result. A spec whose program could not be spawned gets its
    /// `Error::Spawn`; the specs after it are still launched.
    pub async fn run_all(
        &self,
        specs: impl IntoIterator<Item = JobSpec>,
    ) -> Vec<error::Result<JobId>> {
        let mut launched = Vec::new();
        for spec in specs {
            launched.push(self.start_job(spec).await);
        }
        launched
    }

    /// Kill a running job.
    pub async fn stop_job(&self, job_id: JobId) -> error::Result<()> {
        self.request(|response| StopJob { job_id, response }).await
    }

    pub async fn get_job_status(&self, job_id: JobId) -> error::Result<JobStatus> {
        self.request(|response| GetStatus { job_id, response }).await
    }

    /// Wait for every job launched so far to exit and for all of its output to reach the sinks.
    pub async fn wait_all(&self) -> error::Result<Report> {
        self.request(|response| WaitAll { response }).await
    }
}
