//! Serializable dataset configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a dataset build (content-addressable hash).
pub type ConfigId = String;

/// Configuration for a single tensor build.
///
/// Every option is enumerated here and validated against the aligned
/// calendar before any computation starts; nothing is clamped silently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    /// Instrument whose next-day movement is labeled.
    pub reference: String,

    /// Number of consecutive prior trading days per tensor sample.
    pub lookback: usize,

    /// First sample day (index into the aligned calendar, inclusive).
    pub sample_start: usize,

    /// One past the last sample day (exclusive).
    pub sample_end: usize,
}

impl DatasetConfig {
    /// Number of samples the build will produce.
    pub fn sample_count(&self) -> usize {
        self.sample_end.saturating_sub(self.sample_start)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two builds with identical configs share the same id, so downstream
    /// pipelines can detect re-runs of the same dataset.
    pub fn config_id(&self) -> ConfigId {
        let json = serde_json::to_string(self).expect("DatasetConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }

    /// Validate against an aligned calendar of `day_count` days.
    ///
    /// Each offset day `d - lookback` needs a prior day for the slope-based
    /// signal flags, and the correlation window must not touch the undefined
    /// return at day 0, so the start bound is `lookback + 1` rather than
    /// `lookback`. The end bound leaves one lookahead day for labeling.
    pub fn validate(&self, day_count: usize) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        if self.sample_start < self.lookback + 1 {
            return Err(ConfigError::InsufficientLookback {
                sample_start: self.sample_start,
                required: self.lookback + 1,
            });
        }
        if self.sample_end <= self.sample_start {
            return Err(ConfigError::EmptySampleRange {
                sample_start: self.sample_start,
                sample_end: self.sample_end,
            });
        }
        if day_count == 0 || self.sample_end > day_count - 1 {
            return Err(ConfigError::RangeOutOfBounds {
                sample_end: self.sample_end,
                last_usable: day_count.saturating_sub(1),
            });
        }
        Ok(())
    }
}

/// Precondition violations caught before computation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("lookback width must be positive")]
    ZeroLookback,

    #[error("sample start {sample_start} is before enough lookback history exists (need >= {required})")]
    InsufficientLookback { sample_start: usize, required: usize },

    #[error("empty sample range [{sample_start}, {sample_end})")]
    EmptySampleRange {
        sample_start: usize,
        sample_end: usize,
    },

    #[error("sample end {sample_end} exceeds the last usable day {last_usable} (one lookahead day is needed for labeling)")]
    RangeOutOfBounds {
        sample_end: usize,
        last_usable: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatasetConfig {
        DatasetConfig {
            reference: "NDX".to_string(),
            lookback: 10,
            sample_start: 50,
            sample_end: 100,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate(200).is_ok());
    }

    #[test]
    fn config_id_is_deterministic() {
        assert_eq!(config().config_id(), config().config_id());
    }

    #[test]
    fn config_id_changes_with_params() {
        let mut other = config();
        other.lookback = 20;
        assert_ne!(config().config_id(), other.config_id());
    }

    #[test]
    fn zero_lookback_rejected() {
        let mut cfg = config();
        cfg.lookback = 0;
        assert_eq!(cfg.validate(200), Err(ConfigError::ZeroLookback));
    }

    #[test]
    fn start_inside_lookback_rejected() {
        let mut cfg = config();
        cfg.sample_start = 10; // == lookback, offset day 0 has no prior day
        assert_eq!(
            cfg.validate(200),
            Err(ConfigError::InsufficientLookback {
                sample_start: 10,
                required: 11,
            })
        );
    }

    #[test]
    fn minimal_valid_start_is_lookback_plus_one() {
        let mut cfg = config();
        cfg.sample_start = 11;
        cfg.sample_end = 12;
        assert!(cfg.validate(200).is_ok());
    }

    #[test]
    fn empty_range_rejected() {
        let mut cfg = config();
        cfg.sample_end = cfg.sample_start;
        assert!(matches!(
            cfg.validate(200),
            Err(ConfigError::EmptySampleRange { .. })
        ));
    }

    #[test]
    fn end_must_leave_a_lookahead_day() {
        let cfg = config();
        // day_count == sample_end: label for day 99 would need day 100.
        assert_eq!(
            cfg.validate(100),
            Err(ConfigError::RangeOutOfBounds {
                sample_end: 100,
                last_usable: 99,
            })
        );
        assert!(cfg.validate(101).is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = config();
        let text = toml::to_string(&cfg).unwrap();
        let parsed: DatasetConfig = toml::from_str(&text).unwrap();
        assert_eq!(cfg, parsed);
    }
}
