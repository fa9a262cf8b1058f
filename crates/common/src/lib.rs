pub mod config;
pub mod error;
pub mod regions;

pub use config::{Config, SummaryConfig};
pub use error::{TrendsError, TrendsResult};
pub use regions::RegionCode;
