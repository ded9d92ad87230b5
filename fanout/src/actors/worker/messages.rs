use crate::error;
use tokio::sync::oneshot;

pub enum WorkerMessage {
    Stop {
        response: oneshot::Sender<error::Result<()>>,
    },
}
