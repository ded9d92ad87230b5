pub mod relay;
pub mod runner;
pub mod worker;
