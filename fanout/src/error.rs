use std::path::PathBuf;
use std::{io, result};
use thiserror;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("No such job exists")]
    DoesNotExist,
    #[error("job is not running")]
    NotRunning,
    #[error("failed to stop job: {0}")]
    Stop(#[source] io::Error),
    #[error("failed to flush relayed output: {0}")]
    Relay(#[source] io::Error),
    #[error("runner exited")]
    RunnerExited,
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },
    #[error("invalid config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = result::Result<T, Error>;
