use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Fused channel scores for one query.
pub struct FusedScore {
    /// Calibrated overall similarity, 0-100, two decimals.
    pub overall: f64,
    /// Lexical maximum scaled by its weight, 0-100 times the weight.
    pub lexical_breakdown: f64,
    /// Semantic maximum scaled by its weight.
    pub semantic_breakdown: f64,
    /// Best lexical score in `[0, 1]`.
    pub lexical_norm: f64,
    /// Best semantic score in `[0, 1]`.
    pub semantic_norm: f64,
}

impl FusedScore {
    /// Channel that produced the overall score. Ties go to lexical.
    pub fn dominant_channel(&self) -> crate::matches::MatchType {
        if self.semantic_norm > self.lexical_norm {
            crate::matches::MatchType::Semantic
        } else {
            crate::matches::MatchType::Lexical
        }
    }

    /// Raw (pre-calibration) score in `[0, 1]`.
    pub fn raw(&self) -> f64 {
        self.lexical_norm.max(self.semantic_norm)
    }
}

impl std::fmt::Display for FusedScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "overall {:.2} (lexical {:.2}, semantic {:.2})",
            self.overall, self.lexical_breakdown, self.semantic_breakdown
        )
    }
}
