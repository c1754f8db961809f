//! obra-config
//!
//! User-editable settings: the canonical category lists, chart colors
//! and the reconciliation tolerance. Persisted as JSON under the
//! platform config directory.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::SettingsManager;
pub use model::Settings;
