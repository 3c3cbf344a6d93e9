//! Time-based medal scoring.
//!
//! Faster completion earns a better tier. A threshold is an inclusive upper
//! bound on elapsed seconds, so finishing exactly on the line still counts.

use serde::{Deserialize, Serialize};

use crate::api::config::ConfigError;
use crate::api::types::MedalTier;

/// Per-minigame medal time limits in seconds. Always `gold < silver < bronze`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds", into = "RawThresholds")]
pub struct MedalThresholds {
    gold_secs: f64,
    silver_secs: f64,
    bronze_secs: f64,
}

impl MedalThresholds {
    pub fn new(gold_secs: f64, silver_secs: f64, bronze_secs: f64) -> Result<Self, ConfigError> {
        let ordered = gold_secs.is_finite()
            && silver_secs.is_finite()
            && bronze_secs.is_finite()
            && 0.0 <= gold_secs
            && gold_secs < silver_secs
            && silver_secs < bronze_secs;
        if !ordered {
            return Err(ConfigError::Thresholds { gold_secs, silver_secs, bronze_secs });
        }
        Ok(Self { gold_secs, silver_secs, bronze_secs })
    }

    /// For literals already known to be ordered (presets).
    pub(crate) const fn ordered(gold_secs: f64, silver_secs: f64, bronze_secs: f64) -> Self {
        Self { gold_secs, silver_secs, bronze_secs }
    }

    pub fn gold_secs(&self) -> f64 {
        self.gold_secs
    }

    pub fn silver_secs(&self) -> f64 {
        self.silver_secs
    }

    pub fn bronze_secs(&self) -> f64 {
        self.bronze_secs
    }
}

#[derive(Serialize, Deserialize)]
struct RawThresholds {
    gold: f64,
    silver: f64,
    bronze: f64,
}

impl TryFrom<RawThresholds> for MedalThresholds {
    type Error = ConfigError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        MedalThresholds::new(raw.gold, raw.silver, raw.bronze)
    }
}

impl From<MedalThresholds> for RawThresholds {
    fn from(t: MedalThresholds) -> Self {
        RawThresholds { gold: t.gold_secs, silver: t.silver_secs, bronze: t.bronze_secs }
    }
}

/// Map an elapsed completion time to a medal tier.
pub fn evaluate(elapsed_secs: f64, thresholds: &MedalThresholds) -> MedalTier {
    if elapsed_secs <= thresholds.gold_secs {
        MedalTier::Gold
    } else if elapsed_secs <= thresholds.silver_secs {
        MedalTier::Silver
    } else if elapsed_secs <= thresholds.bronze_secs {
        MedalTier::Bronze
    } else {
        MedalTier::None
    }
}
