//! Configuration system for the monitor.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

pub mod canary_config;
pub mod defaults;
pub mod drift_config;
pub mod invariant_config;
pub mod monitor_config;
pub mod review_config;

pub use canary_config::CanaryThresholds;
pub use drift_config::DriftThresholds;
pub use invariant_config::InvariantThresholds;
pub use monitor_config::{CliOverrides, MonitorConfig};
pub use review_config::HumanReviewConfig;
