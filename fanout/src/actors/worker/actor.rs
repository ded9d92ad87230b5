use super::messages::WorkerMessage;
use crate::actors::relay::RelayHandle;
use crate::error::Error as JobError;
use crate::events::{JobStatus, Output, Stream};
use crate::types::JobId;

use bytes::BytesMut;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Child,
    select,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error};

pub struct Actor {
    job_id: JobId,
    inbox: mpsc::UnboundedReceiver<WorkerMessage>,
    status_tx: watch::Sender<JobStatus>,
}

impl Actor {
    pub fn spawn(
        job_id: JobId,
        inbox: mpsc::UnboundedReceiver<WorkerMessage>,
        status_tx: watch::Sender<JobStatus>,
        relay: RelayHandle,
        child: Child,
    ) {
        let actor = Self {
            job_id,
            inbox,
            status_tx,
        };
        tokio::spawn(async move { actor.run(relay, child).await });
    }

    async fn run(mut self, relay: RelayHandle, mut child: Child) {
        // grab stdout and stderr, if they've been piped
        let stdout = child
            .stdout
            .take()
            .map(|stdout| pipe(stdout, self.job_id, Stream::Stdout, relay.clone()));
        let stderr = child
            .stderr
            .take()
            .map(|stderr| pipe(stderr, self.job_id, Stream::Stderr, relay));

        let mut inbox_open = true;
        let exit_status = loop {
            select! {
                maybe_msg = self.inbox.recv(), if inbox_open => {
                    match maybe_msg {
                        Some(WorkerMessage::Stop { response }) => {
                            debug!(job_id = %self.job_id, "stopping job");
                            let _ = response.send(child.start_kill().map_err(JobError::Stop));
                        }
                        // every handle dropped, the child keeps running on its own
                        None => inbox_open = false,
                    }
                }
                // wait for child pid to finish and cleanup its resources
                exit_status = child.wait() => break exit_status,
            }
        };

        // stop requests that raced with the exit
        self.inbox.close();
        while let Some(WorkerMessage::Stop { response }) = self.inbox.recv().await {
            let _ = response.send(Err(JobError::NotRunning));
        }

        // the job is only done once everything it wrote has been handed to the relay
        for reader in [stdout, stderr].into_iter().flatten() {
            let _ = reader.await;
        }

        let status = match exit_status {
            Ok(exit_status) => JobStatus::from(exit_status),
            Err(e) => {
                error!(job_id = %self.job_id, error = %e, "failed to collect exit status");
                JobStatus::Unknown
            }
        };
        debug!(job_id = %self.job_id, %status, "job finished");
        let _ = self.status_tx.send(status);
    }
}

/// Forward every read from `reader` to the relay as soon as it arrives.
fn pipe<R>(mut reader: R, job_id: JobId, stream: Stream, relay: RelayHandle) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = BytesMut::with_capacity(4096);
        loop {
            match reader.read_buf(&mut buf).await {
                Ok(n) if n > 0 => {
                    // move the bytes out of buf and into a message
                    let blob = buf.split().freeze();
                    relay.send(Output {
                        job_id,
                        stream,
                        blob,
                    });
                    buf.reserve(4096);
                }
                Ok(_) => break,
                Err(e) => {
                    error!(%job_id, ?stream, error = %e, "failed to read job output");
                    break;
                }
            }
        }
    })
}
