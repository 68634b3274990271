pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod generators;
pub mod loader;
pub mod logging;
pub mod models;
pub mod option_filter;
pub mod ranking;
pub mod report;
pub mod strategy;

// Re-exports for convenience
pub use config::{load_config, RankingConfig, ScreenerConfig};
pub use engine::StrategyEngine;
pub use error::{Result, ScreenerError};
pub use filters::{ConfigFilter, Direction, FilterRange, StrategyFilter};
pub use generators::{
    IronCondorsGenerator, SingleCallsGenerator, StraddlesGenerator, StranglesGenerator, StrategyGenerator,
};
pub use loader::{load_snapshot, load_snapshot_at, Snapshot};
pub use models::{Greeks, OptionRecord, OptionSide};
pub use option_filter::OptionFilter;
pub use ranking::{RankKey, StrategyList};
pub use report::StrategySummary;
pub use strategy::{Action, Strategy, StrategyKind};
