//! Performance impact classification for plan operators.
//!
//! A pure function of `(node_type, estimated_cost)`; the thresholds are the
//! tuning knobs for the whole diagnostics layer, so they live here as named
//! constants.

use crate::explain::plan::{NodeType, PerformanceImpact};

/// Node cost above which a sort counts as high impact.
pub const SORT_COST_THRESHOLD: f64 = 1_000.0;

/// Node cost above which any operator counts as high impact.
pub const HIGH_COST_THRESHOLD: f64 = 5_000.0;

/// Node cost above which any operator counts as medium impact.
pub const MEDIUM_COST_THRESHOLD: f64 = 1_000.0;

/// Total plan cost above which the query is flagged as expensive overall.
pub const OVERALL_COST_THRESHOLD: f64 = 10_000.0;

/// Total plan cost above which a missing LIMIT triggers a recommendation.
pub const LIMIT_SUGGESTION_THRESHOLD: f64 = 5_000.0;

/// Classifies the likely performance impact of a single operator.
///
/// Rule order matters and the first match wins: full collection scans are
/// always high impact, index scans always low, sorts and joins have their
/// own rules, and everything else falls through to the cost tiers.
pub fn assess_impact(node_type: NodeType, estimated_cost: f64) -> PerformanceImpact {
    match node_type {
        NodeType::EnumerateCollection => PerformanceImpact::High,
        NodeType::Index => PerformanceImpact::Low,
        NodeType::Sort => {
            if estimated_cost > SORT_COST_THRESHOLD {
                PerformanceImpact::High
            } else {
                PerformanceImpact::Medium
            }
        }
        NodeType::Join => PerformanceImpact::High,
        _ => {
            if estimated_cost > HIGH_COST_THRESHOLD {
                PerformanceImpact::High
            } else if estimated_cost > MEDIUM_COST_THRESHOLD {
                PerformanceImpact::Medium
            } else if estimated_cost > 0.0 {
                PerformanceImpact::Low
            } else {
                PerformanceImpact::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests;
