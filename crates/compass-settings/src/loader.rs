//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CompassSettings::default()`]
//! 2. If `~/.compass/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate ranges
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::CompassSettings;

/// Resolve the path to the settings file (`~/.compass/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".compass").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<CompassSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or an out-of-range value, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<CompassSettings> {
    let defaults = serde_json::to_value(CompassSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: CompassSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are ignored with a
/// warning, falling back to the file/default value.
pub fn apply_env_overrides(settings: &mut CompassSettings) {
    // ── Model settings ──────────────────────────────────────────────
    if let Some(v) = read_env_string("COMPASS_MODEL") {
        settings.model.model = v;
    }
    if let Some(v) = read_env_f64("COMPASS_TEMPERATURE", 0.0, 2.0) {
        settings.model.temperature = v;
    }
    if let Some(v) = read_env_u32("COMPASS_MAX_TOKENS", 1, 128_000) {
        settings.model.max_tokens = v;
    }

    // ── Context settings ────────────────────────────────────────────
    if let Some(v) = read_env_usize("COMPASS_WINDOW_SIZE", 1, 1_000) {
        settings.context.message_window_size = v;
    }
    if let Some(v) = read_env_u64("COMPASS_SUMMARY_INTERVAL", 1, 10_000) {
        settings.context.summary_interval = v;
    }

    // ── Timeouts ────────────────────────────────────────────────────
    if let Some(v) = read_env_u64("COMPASS_RESPONSE_TIMEOUT_MS", 1_000, 600_000) {
        settings.timeouts.response_ms = v;
    }
    if let Some(v) = read_env_u64("COMPASS_COMPRESSION_TIMEOUT_MS", 1_000, 600_000) {
        settings.timeouts.compression_ms = v;
    }

    // ── API settings ────────────────────────────────────────────────
    if let Some(v) = read_env_string("OPENAI_BASE_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_env_string("OPENAI_API_KEY") {
        settings.api.api_key = Some(v);
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as an `f64` within a range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_f64(name: &str, min: f64, max: f64) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_f64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid f64 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
