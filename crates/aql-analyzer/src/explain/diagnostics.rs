//! Plan Diagnostics - Derived optimizations, bottlenecks, and recommendations
//!
//! Three independent, pure derivations over a completed [`ExecutionPlan`].
//! [`annotate`] runs all three and stores the results on the plan, which is
//! the only mutation the plan sees after parsing.

use crate::explain::impact::{
    LIMIT_SUGGESTION_THRESHOLD, OVERALL_COST_THRESHOLD, SORT_COST_THRESHOLD,
};
use crate::explain::parser;
use crate::explain::plan::{ExecutionPlan, NodeType};
use regex::Regex;
use serde_json::Value;

/// Parses a raw EXPLAIN payload and fills in the derived diagnostic lists.
pub fn analyze_payload(raw: &Value) -> ExecutionPlan {
    let mut plan = parser::parse_plan(raw);
    annotate(&mut plan);
    plan
}

/// Runs all three derivations and stores the results on the plan.
pub fn annotate(plan: &mut ExecutionPlan) {
    plan.optimizations = optimizations(plan);
    plan.bottlenecks = bottlenecks(plan);
    plan.recommendations = recommendations(plan);
}

/// Derives the list of optimizations in effect.
pub fn optimizations(plan: &ExecutionPlan) -> Vec<String> {
    let mut found = Vec::new();

    let index_nodes = plan.nodes_of_type(NodeType::Index);
    let labels: Vec<String> = index_nodes.iter().filter_map(|n| n.index_label()).collect();
    if !labels.is_empty() {
        found.push(format!("Using indexes: {}", labels.join(", ")));
    }
    if index_nodes.iter().any(|n| !n.expressions.is_empty()) {
        found.push("Filter conditions pushed down to index scan".to_string());
    }

    let half = plan.node_count() as f64 / 2.0;
    if plan
        .nodes
        .iter()
        .any(|n| n.node_type == NodeType::Limit && (n.depth as f64) < half)
    {
        found.push("Limit applied early in the execution plan".to_string());
    }

    found
}

/// Derives the list of likely bottlenecks.
pub fn bottlenecks(plan: &ExecutionPlan) -> Vec<String> {
    let mut found = Vec::new();

    if plan.has_node_type(NodeType::EnumerateCollection) {
        found.push(format!(
            "Full collection scan(s) on: {}",
            scanned_collections(plan).join(", ")
        ));
    }

    if plan
        .nodes
        .iter()
        .any(|n| n.node_type == NodeType::Sort && n.estimated_cost > SORT_COST_THRESHOLD)
    {
        found.push("Expensive sort operation(s)".to_string());
    }

    if plan.has_node_type(NodeType::Join) {
        found.push("Join operation(s) may be expensive".to_string());
    }

    if plan.total_cost > OVERALL_COST_THRESHOLD {
        found.push(format!("High overall query cost: {:.2}", plan.total_cost));
    }

    found
}

/// Derives the list of improvement recommendations.
pub fn recommendations(plan: &ExecutionPlan) -> Vec<String> {
    let mut found = Vec::new();

    for collection in scanned_collections(plan) {
        let fields = filter_fields_for(plan, &collection);
        if fields.is_empty() {
            found.push(format!("Consider adding appropriate indexes on {collection}"));
        } else {
            found.push(format!(
                "Consider adding an index on {collection} for field(s): {}",
                fields.join(", ")
            ));
        }
    }

    if plan.total_cost > LIMIT_SUGGESTION_THRESHOLD && !plan.has_node_type(NodeType::Limit) {
        found.push("Consider adding a LIMIT clause to reduce result set size".to_string());
    }

    if plan
        .nodes
        .iter()
        .any(|n| n.node_type == NodeType::Filter && n.depth > 1)
    {
        found.push("Consider restructuring filters to allow pushdown optimization".to_string());
    }

    found
}

/// Collections touched by full collection scans, first-seen order, deduped.
fn scanned_collections(plan: &ExecutionPlan) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for node in plan
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::EnumerateCollection)
    {
        if let Some(collection) = &node.collection
            && !out.contains(collection)
        {
            out.push(collection.clone());
        }
    }
    out
}

/// Extracts field names referenced as `<collection>.<field>` in filter-node
/// expressions.
///
/// Only literal collection names match; a query that filters through a bind
/// alias (e.g. `obj.size` for `FOR obj IN Objects`) yields nothing, and the
/// caller falls back to the generic index suggestion.
fn filter_fields_for(plan: &ExecutionPlan, collection: &str) -> Vec<String> {
    let Ok(re) = Regex::new(&format!(r"{}\.(\w+)", regex::escape(collection))) else {
        return Vec::new();
    };

    let mut fields: Vec<String> = Vec::new();
    for node in plan.nodes.iter().filter(|n| n.node_type == NodeType::Filter) {
        for expression in &node.expressions {
            for caps in re.captures_iter(expression) {
                if let Some(m) = caps.get(1) {
                    let field = m.as_str().to_string();
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
            }
        }
    }
    fields
}
