//! Tests for the performance impact classifier

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_collection_scan_is_always_high() {
    assert_eq!(
        assess_impact(NodeType::EnumerateCollection, 0.0),
        PerformanceImpact::High
    );
    assert_eq!(
        assess_impact(NodeType::EnumerateCollection, 1.0),
        PerformanceImpact::High
    );
}

#[test]
fn test_index_scan_is_always_low() {
    assert_eq!(assess_impact(NodeType::Index, 0.0), PerformanceImpact::Low);
    // Even an expensive index scan stays low
    assert_eq!(
        assess_impact(NodeType::Index, 100_000.0),
        PerformanceImpact::Low
    );
}

#[test]
fn test_sort_depends_on_cost() {
    assert_eq!(assess_impact(NodeType::Sort, 999.0), PerformanceImpact::Medium);
    assert_eq!(
        assess_impact(NodeType::Sort, SORT_COST_THRESHOLD),
        PerformanceImpact::Medium
    );
    assert_eq!(
        assess_impact(NodeType::Sort, 1_001.0),
        PerformanceImpact::High
    );
}

#[test]
fn test_join_is_always_high() {
    assert_eq!(assess_impact(NodeType::Join, 0.0), PerformanceImpact::High);
    assert_eq!(assess_impact(NodeType::Join, 10.0), PerformanceImpact::High);
}

#[test]
fn test_default_cost_tiers() {
    assert_eq!(
        assess_impact(NodeType::Calculation, 5_001.0),
        PerformanceImpact::High
    );
    assert_eq!(
        assess_impact(NodeType::Calculation, 1_001.0),
        PerformanceImpact::Medium
    );
    assert_eq!(
        assess_impact(NodeType::Filter, 500.0),
        PerformanceImpact::Low
    );
    assert_eq!(
        assess_impact(NodeType::Return, 0.0),
        PerformanceImpact::Unknown
    );
}

#[test]
fn test_tier_boundaries_are_exclusive() {
    assert_eq!(
        assess_impact(NodeType::Limit, HIGH_COST_THRESHOLD),
        PerformanceImpact::Medium
    );
    assert_eq!(
        assess_impact(NodeType::Limit, MEDIUM_COST_THRESHOLD),
        PerformanceImpact::Low
    );
    assert_eq!(
        assess_impact(NodeType::Limit, 0.0),
        PerformanceImpact::Unknown
    );
}

#[test]
fn test_classification_is_deterministic() {
    for _ in 0..3 {
        assert_eq!(
            assess_impact(NodeType::Sort, 2_000.0),
            PerformanceImpact::High
        );
        assert_eq!(
            assess_impact(NodeType::Unknown, 0.0),
            PerformanceImpact::Unknown
        );
    }
}
