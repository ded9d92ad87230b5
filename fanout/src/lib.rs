mod actors;
pub mod config;
pub mod error;
mod events;
mod report;
mod sinks;
pub mod types;

#[cfg(test)]
mod testing;

// re-export the runner handle as if it is the runner itself.
pub use actors::runner::RunnerHandle as Runner;
pub use config::Config;
pub use events::{JobStatus, Stream};
pub use report::{JobOutcome, Report};
pub use sinks::{Sink, Sinks};
pub use types::JobSpec;
