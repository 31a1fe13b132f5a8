//! # compass-settings
//!
//! Layered configuration for the Compass counseling backend.
//!
//! Loading flow:
//! 1. Start with compiled [`CompassSettings::default()`]
//! 2. If `~/.compass/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate ranges
//!
//! All JSON field names are camelCase; partial files are fine — missing
//! fields keep their defaults.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{ApiSettings, CompassSettings, ContextSettings, ModelSettings, TimeoutSettings};
