use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

pub type Program = String;
pub type Args = Vec<String>;
pub type JobId = Uuid;
pub type OutputBlob = bytes::Bytes;

/// One build-tool invocation: the program to run and its arguments.
///
/// Built once at startup and never mutated; the runner only reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSpec {
    pub program: Program,
    pub args: Args,
    /// working directory for the child, inherited from the runner when unset
    pub dir: Option<PathBuf>,
}

impl JobSpec {
    pub fn new(
        program: impl Into<Program>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
