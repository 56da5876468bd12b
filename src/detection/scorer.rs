//! Risk scoring over the pattern catalog.
//!
//! Sums the weights of every matching catalog entry and clamps the result to
//! [`MAX_RISK_SCORE`]. Deterministic, side-effect free, and independent of the
//! runtime configuration.

use super::catalog::PatternCatalog;

/// Upper bound of the risk scale. Sums above this are truncated, not rejected.
pub const MAX_RISK_SCORE: u8 = 10;

/// Scores message text against the pattern catalog.
pub struct RiskScorer {
    catalog: PatternCatalog,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScorer {
    pub fn new() -> Self {
        Self {
            catalog: PatternCatalog::new(),
        }
    }

    /// Compute the risk score for `text`, always in `0..=MAX_RISK_SCORE`.
    ///
    /// Each injection entry contributes its weight independently; the urgency
    /// and encoding entries are single combined tests and contribute at most
    /// once each.
    pub fn score(&self, text: &str) -> u8 {
        let raw: u32 = self
            .catalog
            .matches(text)
            .iter()
            .map(|m| u32::from(m.weight))
            .sum();
        raw.min(u32::from(MAX_RISK_SCORE)) as u8
    }
}
