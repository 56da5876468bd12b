//! Content analysis: the pattern catalog and the risk scorer built on it.

pub mod catalog;
pub mod scorer;

pub use catalog::{CatalogMatch, PatternCatalog, PatternCategory};
pub use scorer::{RiskScorer, MAX_RISK_SCORE};
