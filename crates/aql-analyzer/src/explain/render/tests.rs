//! Tests for the plan report renderer

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn indexed_scan_payload() -> Value {
    json!({
        "plan": {
            "nodes": [
                {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0},
                {
                    "id": 2,
                    "type": "IndexNode",
                    "dependencies": [1],
                    "estimatedCost": 5.0,
                    "collection": "Objects",
                    "indexes": [{"name": "size_index", "type": "persistent"}]
                },
                {"id": 3, "type": "LimitNode", "dependencies": [2], "estimatedCost": 10.0},
                {"id": 4, "type": "ReturnNode", "dependencies": [3], "estimatedCost": 15.0}
            ],
            "estimatedCost": 15.0,
            "collections": ["Objects"]
        },
        "cacheable": true,
        "warnings": ["deprecated syntax"],
        "query": "FOR obj IN Objects FILTER obj.size > 1000000 LIMIT 10 RETURN obj"
    })
}

fn plain_renderer() -> PlanRenderer {
    PlanRenderer::new().with_colorize(false)
}

#[test]
fn test_render_value_rejects_non_objects() {
    let renderer = plain_renderer();

    assert_eq!(renderer.render_value(&json!("text"), false), INVALID_PLAN_MESSAGE);
    assert_eq!(renderer.render_value(&json!(42), false), INVALID_PLAN_MESSAGE);
    assert_eq!(renderer.render_value(&json!(null), false), INVALID_PLAN_MESSAGE);
    assert_eq!(renderer.render_value(&json!([1, 2]), false), INVALID_PLAN_MESSAGE);
}

#[test]
fn test_render_full_report() {
    let report = plain_renderer().render_value(&indexed_scan_payload(), false);

    // Query section carries the literal query text
    assert!(report.contains("Query:"));
    assert!(report.contains("FOR obj IN Objects FILTER obj.size > 1000000 LIMIT 10 RETURN obj"));

    // Summary section
    assert!(report.contains("Summary:"));
    assert!(report.contains("Total cost: 15.00"));
    assert!(report.contains("Collections: Objects"));
    assert!(report.contains("Indexes: Objects.size_index (persistent)"));
    assert!(report.contains("Cacheable: true"));

    // Tree section with connectors and per-node annotations
    assert!(report.contains("Execution Plan:"));
    assert!(report.contains("Singleton [Cost: 1.00]"));
    assert!(report.contains("└─ Index on Objects using index size_index (persistent) [Cost: 5.00]"));
    assert!(report.contains("└─ Limit [Cost: 10.00]"));
    assert!(report.contains("└─ Return [Cost: 15.00]"));

    // Diagnostics sections
    assert!(report.contains("Optimizations:"));
    assert!(report.contains("✓ Using indexes: Objects.size_index (persistent)"));
    assert!(report.contains("Warnings:"));
    assert!(report.contains("⚠ deprecated syntax"));

    // Empty sections are omitted entirely
    assert!(!report.contains("Bottlenecks:"));
    assert!(!report.contains("Recommendations:"));
}

#[test]
fn test_render_bottleneck_prefixes() {
    let payload = json!({
        "plan": {
            "nodes": [
                {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0},
                {
                    "id": 2,
                    "type": "EnumerateCollectionNode",
                    "dependencies": [1],
                    "estimatedCost": 12.0,
                    "collection": "Objects"
                },
                {"id": 3, "type": "ReturnNode", "dependencies": [2], "estimatedCost": 14.0}
            ],
            "estimatedCost": 14.0,
            "collections": ["Objects"]
        },
        "query": "FOR obj IN Objects RETURN obj"
    });

    let report = plain_renderer().render_value(&payload, false);

    assert!(report.contains("Bottlenecks:"));
    assert!(report.contains("⚠ Full collection scan(s) on: Objects"));
    assert!(report.contains("Recommendations:"));
    assert!(report.contains("→ Consider adding appropriate indexes on Objects"));
}

#[test]
fn test_render_is_idempotent() {
    let plan = crate::explain::diagnostics::analyze_payload(&indexed_scan_payload());
    let renderer = plain_renderer();

    let first = renderer.render(&plan, true);
    let second = renderer.render(&plan, true);

    assert_eq!(first, second);
}

#[test]
fn test_render_omits_empty_query_section() {
    let payload = json!({
        "plan": {
            "nodes": [
                {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0}
            ],
            "estimatedCost": 1.0
        }
    });

    let report = plain_renderer().render_value(&payload, false);

    assert!(!report.contains("Query:"));
    assert!(report.contains("Summary:"));
}

#[test]
fn test_max_depth_drops_deep_nodes() {
    let report = plain_renderer()
        .with_max_depth(1)
        .render_value(&indexed_scan_payload(), false);

    assert!(report.contains("Singleton [Cost: 1.00]"));
    assert!(report.contains("[Cost: 5.00]"));
    // Limit (level 2) and Return (level 3) are silently omitted
    assert!(!report.contains("[Cost: 10.00]"));
    assert!(!report.contains("[Cost: 15.00]"));
}

#[test]
fn test_verbose_shows_truncated_expressions() {
    let long_expression =
        "obj.size > 1000000 && obj.owner == 'someone' && obj.created_at >= '2026-01-01'";
    let payload = json!({
        "plan": {
            "nodes": [
                {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0},
                {
                    "id": 2,
                    "type": "FilterNode",
                    "dependencies": [1],
                    "estimatedCost": 2.0,
                    "expression": long_expression
                }
            ],
            "estimatedCost": 2.0
        }
    });

    let renderer = plain_renderer();
    let terse = renderer.render_value(&payload, false);
    let verbose = renderer.render_value(&payload, true);

    assert!(!terse.contains("obj.size"));

    let preview: String = long_expression.chars().take(50).collect();
    assert!(verbose.contains(&format!("{preview}...")));
    assert!(!verbose.contains(long_expression));
}

#[test]
fn test_colorize_emits_ansi_codes() {
    let plain = plain_renderer().render_value(&indexed_scan_payload(), false);
    let colored = PlanRenderer::new().render_value(&indexed_scan_payload(), false);

    assert!(!plain.contains('\u{1b}'));
    assert!(colored.contains("\u{1b}["));
}

#[test]
fn test_forest_renders_every_root() {
    let payload = json!({
        "plan": {
            "nodes": [
                {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0},
                {"id": 2, "type": "ReturnNode", "dependencies": [1], "estimatedCost": 2.0},
                {"id": 10, "type": "SingletonNode", "dependencies": [], "estimatedCost": 3.0},
                {"id": 11, "type": "ReturnNode", "dependencies": [10], "estimatedCost": 4.0}
            ],
            "estimatedCost": 4.0
        }
    });

    let report = plain_renderer().render_value(&payload, false);

    assert!(report.contains("Singleton [Cost: 1.00]"));
    assert!(report.contains("Singleton [Cost: 3.00]"));
    assert!(report.contains("└─ Return [Cost: 2.00]"));
    assert!(report.contains("└─ Return [Cost: 4.00]"));
}
