// Library interface for BrainRS modules
// This allows integration tests and benches to access the core functionality

pub mod baseline;
pub mod boost;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod phase;
pub mod session;
pub mod source;
pub mod timefmt;

// Re-export commonly used types for convenience
pub use baseline::{generate_baseline, generate_validated, BaselineGenerator, BaselineSeries};
pub use boost::{apply_boost, boost_multiplier, BoostTier};
pub use chart::{ChartConfig, ChartData, ChartShaper};
pub use config::AppConfig;
pub use error::{BrainRsError, Result};
pub use export::ExportFormat;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use phase::classify_phase;
pub use session::SessionContext;
pub use source::{DataSettings, DataSource, FallbackSource, FileSource, MockSource, TimelineSource};
