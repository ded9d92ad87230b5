use super::messages::Message;
use crate::events::{Output, Stream};
use crate::sinks::{Sink, Sinks};

use std::io;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{trace, warn};

pub struct Actor {
    inbox: mpsc::UnboundedReceiver<Message>,
    stdout: SinkState,
    stderr: SinkState,
}

struct SinkState {
    name: &'static str,
    sink: Sink,
    // set after the first write error, later chunks are dropped
    broken: bool,
}

impl SinkState {
    fn new(name: &'static str, sink: Sink) -> Self {
        Self {
            name,
            sink,
            broken: false,
        }
    }

    async fn write(&mut self, blob: &[u8]) {
        if self.broken {
            return;
        }
        let res = match self.sink.write_all(blob).await {
            Ok(()) => self.sink.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = res {
            warn!(sink = self.name, error = %e, "output sink failed, dropping further output");
            self.broken = true;
        }
    }

    async fn flush(&mut self) -> io::Result<()> {
        if self.broken {
            return Ok(());
        }
        self.sink.flush().await
    }
}

impl Actor {
    pub fn spawn(inbox: mpsc::UnboundedReceiver<Message>, sinks: Sinks) {
        let actor = Actor {
            inbox,
            stdout: SinkState::new("stdout", sinks.stdout),
            stderr: SinkState::new("stderr", sinks.stderr),
        };
        tokio::spawn(async move { actor.run().await });
    }

    async fn run(mut self) {
        while let Some(msg) = self.inbox.recv().await {
            use self::Message::*;
            match msg {
                Chunk(output) => self.relay(output).await,
                Flush { response } => {
                    let res = match self.stdout.flush().await {
                        Ok(()) => self.stderr.flush().await,
                        Err(e) => Err(e),
                    };
                    let _ = response.send(res);
                }
            }
        }
    }

    async fn relay(&mut self, output: Output) {
        trace!(
            job_id = %output.job_id,
            stream = ?output.stream,
            len = output.blob.len(),
            "relay chunk"
        );
        match output.stream {
            Stream::Stdout => self.stdout.write(&output.blob).await,
            Stream::Stderr => self.stderr.write(&output.blob).await,
        }
    }
}
