use tracing::debug;

use crate::config::EngineConfig;
use crate::constants::{CALIBRATION_KNEE, FUSION_TOP_N, WEAK_SIGNAL_FACTOR, round_to};
use crate::matches::Match;

use super::types::FusedScore;

/// Two-piece calibration: scores below the knee are scaled by the weak-signal
/// factor, scores at or above it pass through unchanged.
#[inline]
pub fn calibrate(raw: f64) -> f64 {
    if raw < CALIBRATION_KNEE {
        raw * WEAK_SIGNAL_FACTOR
    } else {
        raw
    }
}

/// Best score among the first [`FUSION_TOP_N`] matches, normalized to `[0, 1]`.
pub fn channel_max(matches: &[Match]) -> f64 {
    matches
        .iter()
        .take(FUSION_TOP_N)
        .map(Match::normalized)
        .fold(0.0, f64::max)
}

/// Combines per-channel results into one overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFusion {
    weight_lexical: f64,
    weight_semantic: f64,
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ScoreFusion {
    pub fn new(weight_lexical: f64, weight_semantic: f64) -> Self {
        Self {
            weight_lexical,
            weight_semantic,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.weight_lexical, config.weight_semantic)
    }

    pub fn weight_lexical(&self) -> f64 {
        self.weight_lexical
    }

    pub fn weight_semantic(&self) -> f64 {
        self.weight_semantic
    }

    /// Max-of-channels fusion.
    ///
    /// A strong signal in either channel is sufficient evidence; the weaker
    /// channel never drags the overall score down.
    pub fn fuse(&self, lexical: &[Match], semantic: &[Match]) -> FusedScore {
        let lexical_norm = channel_max(lexical);
        let semantic_norm = channel_max(semantic);

        let mut fused = FusedScore {
            overall: 0.0,
            lexical_breakdown: round_to(lexical_norm * self.weight_lexical * 100.0, 2),
            semantic_breakdown: round_to(semantic_norm * self.weight_semantic * 100.0, 2),
            lexical_norm,
            semantic_norm,
        };
        fused.overall = round_to(calibrate(fused.raw()) * 100.0, 2).clamp(0.0, 100.0);

        debug!(
            lexical_norm,
            semantic_norm,
            raw = fused.raw(),
            dominant = %fused.dominant_channel(),
            overall = fused.overall,
            "Fused channel scores"
        );

        fused
    }
}
