//! Engine configuration.
//!
//! The host owns settings persistence; the engine only consumes the numeric timing
//! fields. Input is parsed through a permissive raw form so malformed values are
//! clamped to safe defaults instead of being rejected.

use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::error::ConfigError;
use crate::types::{
    DEFAULT_ARR_MS, DEFAULT_DAS_MS, DEFAULT_DCD_MS, DEFAULT_GRAVITY_MS, DEFAULT_NEXT_QUEUE,
    LOCK_DELAY_MS, LOCK_RESET_LIMIT, MAX_NEXT_QUEUE,
};

/// Soft drop speed factor: a multiple of gravity, or instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoftDropFactor {
    #[default]
    Infinite,
    Factor(u32),
}

impl SoftDropFactor {
    pub fn is_infinite(&self) -> bool {
        matches!(self, SoftDropFactor::Infinite)
    }

    /// Milliseconds between soft drop steps for the given gravity, never below 1.
    pub fn interval_ms(&self, gravity_ms: u32) -> Option<u32> {
        match self {
            SoftDropFactor::Infinite => None,
            SoftDropFactor::Factor(n) => Some((gravity_ms / (*n).max(1)).max(1)),
        }
    }
}

impl Serialize for SoftDropFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SoftDropFactor::Infinite => serializer.serialize_str("inf"),
            SoftDropFactor::Factor(n) => serializer.serialize_u32(*n),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct EngineConfig {
    /// Auto repeat rate (ms). 0 shifts all the way at once.
    pub arr: u32,
    /// Delayed auto shift (ms).
    pub das: u32,
    /// Auto-shift pause after a spawn (ms).
    pub dcd: u32,
    pub sdf: SoftDropFactor,
    pub gravity_ms: u32,
    pub lock_delay_ms: u32,
    pub max_lock_resets: u8,
    /// Visible next pieces, 1..=7.
    pub next_queue_size: usize,
    pub ghost_piece_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arr: DEFAULT_ARR_MS,
            das: DEFAULT_DAS_MS,
            dcd: DEFAULT_DCD_MS,
            sdf: SoftDropFactor::Infinite,
            gravity_ms: DEFAULT_GRAVITY_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            max_lock_resets: LOCK_RESET_LIMIT,
            next_queue_size: DEFAULT_NEXT_QUEUE,
            ghost_piece_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing fields take defaults; out-of-range values are clamped.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Soft drop step interval for the current gravity, `None` when instant.
    pub fn soft_drop_interval_ms(&self) -> Option<u32> {
        self.sdf.interval_ms(self.gravity_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSdf {
    Number(f64),
    Text(String),
}

/// Permissive wire form: any number, any sign.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    arr: Option<f64>,
    das: Option<f64>,
    dcd: Option<f64>,
    sdf: Option<RawSdf>,
    #[serde(alias = "gravity", alias = "gravityMs")]
    gravity_ms: Option<f64>,
    #[serde(alias = "lockDelayMs")]
    lock_delay_ms: Option<f64>,
    #[serde(alias = "maxLockResets")]
    max_lock_resets: Option<f64>,
    #[serde(alias = "nextQueueSize")]
    next_queue_size: Option<f64>,
    #[serde(alias = "ghostPieceEnabled")]
    ghost_piece_enabled: Option<bool>,
}

fn non_negative_ms(name: &str, value: Option<f64>, default: u32) -> u32 {
    match value {
        None => default,
        Some(v) if v.is_nan() => {
            warn!(field = name, "NaN timing value, using default");
            default
        }
        Some(v) if v < 0.0 => {
            warn!(field = name, value = v, "negative timing value clamped to 0");
            0
        }
        // float to int casts saturate
        Some(v) => v.round() as u32,
    }
}

fn parse_sdf(raw: Option<RawSdf>) -> SoftDropFactor {
    match raw {
        None => SoftDropFactor::Infinite,
        Some(RawSdf::Number(v)) if v.is_finite() && v > 0.0 => {
            SoftDropFactor::Factor((v.round() as u32).max(1))
        }
        Some(RawSdf::Number(v)) => {
            if v.is_finite() {
                warn!(value = v, "non-positive sdf treated as infinite");
            }
            SoftDropFactor::Infinite
        }
        Some(RawSdf::Text(s)) => {
            let lower = s.trim().to_ascii_lowercase();
            if lower != "inf" && lower != "infinity" {
                warn!(value = %s, "unrecognized sdf, treated as infinite");
            }
            SoftDropFactor::Infinite
        }
    }
}

impl From<RawConfig> for EngineConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = EngineConfig::default();

        let gravity_ms = match raw.gravity_ms {
            Some(v) if v.is_nan() || v <= 0.0 => {
                warn!(value = v, "non-positive gravity, using default");
                defaults.gravity_ms
            }
            Some(v) => (v.round() as u32).max(1),
            None => defaults.gravity_ms,
        };

        let next_queue_size = match raw.next_queue_size {
            Some(v) if v.is_nan() => defaults.next_queue_size,
            Some(v) => {
                let clamped = (v.round().max(0.0) as usize).clamp(1, MAX_NEXT_QUEUE);
                if clamped as f64 != v {
                    warn!(value = v, clamped, "next queue size clamped");
                }
                clamped
            }
            None => defaults.next_queue_size,
        };

        let max_lock_resets = non_negative_ms(
            "max_lock_resets",
            raw.max_lock_resets,
            defaults.max_lock_resets as u32,
        )
        .min(u8::MAX as u32) as u8;

        Self {
            arr: non_negative_ms("arr", raw.arr, defaults.arr),
            das: non_negative_ms("das", raw.das, defaults.das),
            dcd: non_negative_ms("dcd", raw.dcd, defaults.dcd),
            sdf: parse_sdf(raw.sdf),
            gravity_ms,
            lock_delay_ms: non_negative_ms("lock_delay_ms", raw.lock_delay_ms, defaults.lock_delay_ms),
            max_lock_resets,
            next_queue_size,
            ghost_piece_enabled: raw.ghost_piece_enabled.unwrap_or(defaults.ghost_piece_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert!(cfg.sdf.is_infinite());
        assert_eq!(cfg.gravity_ms, 500);
        assert_eq!(cfg.max_lock_resets, 15);
    }

    #[test]
    fn malformed_values_are_clamped() {
        let cfg = EngineConfig::from_json_str(
            r#"{"gravity": -20, "das": -5, "arr": 0, "nextQueueSize": 12, "sdf": 0}"#,
        )
        .unwrap();
        assert_eq!(cfg.gravity_ms, 500);
        assert_eq!(cfg.das, 0);
        assert_eq!(cfg.arr, 0);
        assert_eq!(cfg.next_queue_size, 7);
        assert_eq!(cfg.sdf, SoftDropFactor::Infinite);

        let cfg = EngineConfig::from_json_str(r#"{"next_queue_size": 0}"#).unwrap();
        assert_eq!(cfg.next_queue_size, 1);
    }

    #[test]
    fn sdf_accepts_numbers_and_infinity_strings() {
        let cfg = EngineConfig::from_json_str(r#"{"sdf": 20, "gravityMs": 1000}"#).unwrap();
        assert_eq!(cfg.sdf, SoftDropFactor::Factor(20));
        assert_eq!(cfg.soft_drop_interval_ms(), Some(50));

        let cfg = EngineConfig::from_json_str(r#"{"sdf": "Infinity"}"#).unwrap();
        assert_eq!(cfg.soft_drop_interval_ms(), None);
    }

    #[test]
    fn soft_drop_interval_never_below_one() {
        assert_eq!(SoftDropFactor::Factor(1000).interval_ms(100), Some(1));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn serializes_infinite_sdf_as_string() {
        let json = serde_json::to_value(EngineConfig::default()).unwrap();
        assert_eq!(json["sdf"], "inf");
    }
}
