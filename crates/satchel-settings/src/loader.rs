//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SatchelSettings::default()`]
//! 2. If `~/.satchel/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::SatchelSettings;

/// Resolve the path to the settings file (`~/.satchel/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".satchel").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SatchelSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<SatchelSettings> {
    let defaults = serde_json::to_value(SatchelSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: SatchelSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
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
/// Each env var has strict parsing rules:
/// - Integers must be valid and within the specified range
/// - Booleans accept: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
/// - Enum selectors must match a serde value (`replace`, `fifo`, ...)
/// - Invalid values are logged and ignored (fall back to file/default)
pub fn apply_env_overrides(settings: &mut SatchelSettings) {
    // ── Discovery settings ──────────────────────────────────────────
    if let Some(v) = read_env_bool("SATCHEL_AUTO_DISCOVER") {
        settings.discovery.auto_discover = v;
    }
    if let Some(v) = read_env_string("SATCHEL_CAPABILITIES_DIR") {
        settings.discovery.root_dir = v;
    }
    if let Some(v) = read_env_string("SATCHEL_ENTRY_POINT") {
        settings.discovery.entry_point = v;
    }

    // ── Session settings ────────────────────────────────────────────
    if let Some(v) = read_env_string("SATCHEL_REDUCER_MODE") {
        if let Some(mode) = parse_selector("SATCHEL_REDUCER_MODE", &v) {
            settings.session.reducer_mode = mode;
        }
    }
    if let Some(v) = read_env_usize("SATCHEL_MAX_LOADED", 1, 1000) {
        settings.session.max_loaded = v;
    }

    // ── Registry settings ───────────────────────────────────────────
    if let Some(v) = read_env_string("SATCHEL_ON_DUPLICATE") {
        if let Some(mode) = parse_selector("SATCHEL_ON_DUPLICATE", &v) {
            settings.registry.on_duplicate = mode;
        }
    }
    if let Some(v) = read_env_bool("SATCHEL_FILTER_BY_VISIBILITY") {
        settings.registry.filter_by_visibility = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a serde enum selector (e.g. `replace`, `fifo`).
///
/// Logs a warning and returns `None` when the value matches no variant.
pub fn parse_selector<T: serde::de::DeserializeOwned>(key: &str, val: &str) -> Option<T> {
    match serde_json::from_value(Value::String(val.to_string())) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %val, "invalid selector env var, ignoring");
            None
        }
    }
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
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
