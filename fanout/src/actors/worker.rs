mod actor;
mod messages;

use crate::actors::relay::RelayHandle;
use crate::error::{Error, Result};
use crate::events::JobStatus;
use crate::types::{JobId, JobSpec};
use actor::Actor;
use messages::WorkerMessage;
use std::process::Stdio;
use tokio::{
    process,
    sync::{mpsc, oneshot, watch},
};

/// Handle to one spawned job.
///
/// Dropping the handle leaves the child running; the worker keeps relaying its output until it exits.
#[derive(Clone)]
pub struct WorkerHandle {
    sender: mpsc::UnboundedSender<WorkerMessage>,
    status: watch::Receiver<JobStatus>,
}

impl WorkerHandle {
    pub fn spawn(job_id: JobId, spec: &JobSpec, relay: RelayHandle) -> Result<Self> {
        let mut command = process::Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.dir {
            command.current_dir(dir);
        }
        let child = command.spawn().map_err(|source| Error::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        let (sender, inbox) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(JobStatus::Running);
        Actor::spawn(job_id, inbox, status_tx, relay, child);
        Ok(Self { sender, status })
    }

    pub fn status(&self) -> JobStatus {
        *self.status.borrow()
    }

    /// Resolves once the process exited and both of its streams were drained.
    pub fn wait(&self) -> impl std::future::Future<Output = JobStatus> {
        let mut status = self.status.clone();
        async move {
            loop {
                let current = *status.borrow();
                if !current.is_running() {
                    return current;
                }
                if status.changed().await.is_err() {
                    // the worker went away without publishing a final status
                    let last = *status.borrow();
                    return if last.is_running() { JobStatus::Unknown } else { last };
                }
            }
        }
    }

    pub fn stop(&self, response: oneshot::Sender<Result<()>>) {
        if !self.status().is_running() {
            let _ = response.send(Err(Error::NotRunning));
            return;
        }
        if let Err(mpsc::error::SendError(WorkerMessage::Stop { response })) =
            self.sender.send(WorkerMessage::Stop { response })
        {
            let _ = response.send(Err(Error::NotRunning));
        }
    }
}
