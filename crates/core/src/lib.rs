pub mod allocation;
pub mod compositions;
pub mod config;
pub mod engine;
pub mod errors;

pub use allocation::balanced_allocation;
pub use compositions::{bounded_compositions, AscendingCompositions, Restriction};
pub use config::{AppConfig, ConfigError, ConfigOverrides, GroupingConfig, LoadOptions};
pub use engine::GroupingEngine;
pub use errors::GroupingError;
