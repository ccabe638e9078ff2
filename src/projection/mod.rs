//! Scenario projection: stock price paths in, warrant valuations out.

pub mod config;
pub mod pipeline;
pub mod scenario;
pub mod types;

pub use config::*;
pub use pipeline::*;
pub use scenario::*;
pub use types::*;
