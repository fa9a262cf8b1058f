pub mod pipeline;
pub mod routes;

pub use pipeline::{Selector, TrendsPayload, TrendsPipeline};
pub use routes::{app, AppState, PipelineResponse};
