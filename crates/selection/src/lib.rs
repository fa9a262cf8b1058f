pub mod client;
pub mod driver;
pub mod machine;

pub use client::{HttpPipelineClient, PipelineClient, PipelineOutcome};
pub use driver::SelectionDriver;
pub use machine::{Phase, SelectionStateMachine};
