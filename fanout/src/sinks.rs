use tokio::io::AsyncWrite;

pub type Sink = Box<dyn AsyncWrite + Send + Unpin>;

/// Where relayed job output ends up.
pub struct Sinks {
    pub stdout: Sink,
    pub stderr: Sink,
}

impl Sinks {
    pub fn new(
        stdout: impl AsyncWrite + Send + Unpin + 'static,
        stderr: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
        }
    }

    /// The runner process's own stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), tokio::io::stderr())
    }
}
