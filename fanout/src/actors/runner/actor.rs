use super::messages::RunnerMessage;
use crate::actors::{relay::RelayHandle, worker::WorkerHandle};
use crate::error::{self, Error};
use crate::events::JobStatus;
use crate::report::{JobOutcome, Report};
use crate::types::{JobId, JobSpec};
use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

enum Job {
    Started {
        job_id: JobId,
        spec: JobSpec,
        worker: WorkerHandle,
    },
    NotStarted {
        spec: JobSpec,
        error: String,
    },
}

pub struct JobRunner {
    inbox: mpsc::Receiver<RunnerMessage>,
    relay: RelayHandle,
    // launch order
    jobs: Vec<Job>,
}

impl JobRunner {
    pub fn spawn(inbox: mpsc::Receiver<RunnerMessage>, relay: RelayHandle) {
        let actor = Self {
            inbox,
            relay,
            jobs: Vec::new(),
        };
        tokio::spawn(async move { actor.run().await });
    }

    async fn run(mut self) {
        use self::RunnerMessage::*;
        while let Some(msg) = self.inbox.recv().await {
            match msg {
                StartJob { spec, response } => {
                    let _ = response.send(self.start_job(spec));
                }
                StopJob { job_id, response } => {
                    self.stop_job(job_id, response);
                }
                GetStatus { job_id, response } => {
                    let _ = response.send(self.get_job_status(job_id));
                }
                WaitAll { response } => {
                    self.wait_all(response);
                }
            }
        }
    }

    fn start_job(&mut self, spec: JobSpec) -> error::Result<JobId> {
        let job_id = uuid::Uuid::new_v4();
        match WorkerHandle::spawn(job_id, &spec, self.relay.clone()) {
            Ok(worker) => {
                debug!(%job_id, job = %spec, "job started");
                self.jobs.push(Job::Started {
                    job_id,
                    spec,
                    worker,
                });
                Ok(job_id)
            }
            Err(e) => {
                error!(job = %spec, error = %e, "job failed to start");
                self.jobs.push(Job::NotStarted {
                    spec,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn worker(&self, job_id: JobId) -> Option<&WorkerHandle> {
        self.jobs.iter().find_map(|job| match job {
            Job::Started {
                job_id: id, worker, ..
            } if *id == job_id => Some(worker),
            _ => None,
        })
    }

    fn stop_job(&self, job_id: JobId, response: oneshot::Sender<error::Result<()>>) {
        if let Some(worker) = self.worker(job_id) {
            worker.stop(response);
        } else {
            let _ = response.send(Err(Error::DoesNotExist));
        }
    }

    fn get_job_status(&self, job_id: JobId) -> error::Result<JobStatus> {
        self.worker(job_id)
            .map(WorkerHandle::status)
            .ok_or(Error::DoesNotExist)
    }

    /// Collect the outcome of every job launched so far without blocking the inbox.
    fn wait_all(&self, response: oneshot::Sender<error::Result<Report>>) {
        let pending: Vec<_> = self
            .jobs
            .iter()
            .map(|job| match job {
                Job::Started {
                    job_id,
                    spec,
                    worker,
                } => {
                    let job_id = *job_id;
                    let spec = spec.clone();
                    let done = worker.wait();
                    futures::future::Either::Left(async move {
                        JobOutcome::Finished {
                            job_id,
                            spec,
                            status: done.await,
                        }
                    })
                }
                Job::NotStarted { spec, error } => {
                    futures::future::Either::Right(futures::future::ready(JobOutcome::NotStarted {
                        spec: spec.clone(),
                        error: error.clone(),
                    }))
                }
            })
            .collect();
        let relay = self.relay.clone();
        tokio::spawn(async move {
            let outcomes = join_all(pending).await;
            let report = relay
                .flush()
                .await
                .map(|()| Report::new(outcomes))
                .map_err(Error::Relay);
            let _ = response.send(report);
        });
    }
}
