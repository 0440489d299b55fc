mod builder;
mod cache;
mod error;
mod exec;
mod stats;
mod tracker;
mod wheel;
pub mod ticker;

pub use builder::{CacheBuilder, DEFAULT_NUM_SLOTS, DEFAULT_TICK_INTERVAL};
pub use cache::Cache;
pub use error::ConfigError;
pub use stats::Metrics;
pub use wheel::TimingWheel;
