use crate::events::Output;
use std::io;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum Message {
    Chunk(Output),
    Flush {
        response: oneshot::Sender<io::Result<()>>,
    },
}
