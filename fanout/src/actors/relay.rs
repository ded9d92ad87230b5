mod actor;
mod messages;

use crate::events::Output;
use crate::sinks::Sinks;
use actor::Actor;
use messages::Message;
use std::io;
use tokio::sync::{mpsc, oneshot};

/// A `Relay` which owns the output sinks and writes every job's output chunks to them.
///
/// This struct is actually an actor handle. The real work is done in the actor spawned by `RelayHandle::spawn`.
/// Every chunk and every flush request travels through the same queue, so a single task performs all writes
/// and a flush is ordered after all chunks sent before it.
#[derive(Clone)]
pub struct RelayHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl RelayHandle {
    pub fn spawn(sinks: Sinks) -> Self {
        let (sender, inbox) = mpsc::unbounded_channel();
        Actor::spawn(inbox, sinks);
        Self { sender }
    }

    pub fn send(&self, output: Output) {
        let _ = self.sender.send(Message::Chunk(output));
    }

    /// Wait until every chunk sent so far has been written and both sinks flushed.
    pub async fn flush(&self) -> io::Result<()> {
        let (response, rx) = oneshot::channel();
        self.sender
            .send(Message::Flush { response })
            .map_err(|_| relay_gone())?;
        rx.await.map_err(|_| relay_gone())?
    }
}

fn relay_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "relay exited")
}
