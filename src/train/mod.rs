pub mod epoch_log;
pub mod fit;
pub mod fit_config;
pub mod predict;
pub mod trainer;

pub use epoch_log::EpochLog;
pub use fit_config::FitConfig;
pub use predict::OutputShape;
pub use trainer::Trainer;

/// Checkpoint overwritten only on strict improvement of the tracked loss.
pub const BEST_MODEL: &str = "best_model";

/// Checkpoint overwritten unconditionally every epoch.
pub const LATEST_MODEL: &str = "latest_model";

/// Per-epoch CSV log, one row appended per completed epoch.
pub const LOG_FILE: &str = "logs.csv";
