//! Plan Report Rendering
//!
//! Turns a parsed [`ExecutionPlan`] plus its diagnostics into a plain-text,
//! optionally ANSI-colorized report for terminal or log display. Rendering
//! never mutates the plan; two calls on the same plan produce identical
//! text.

use crate::explain::diagnostics;
use crate::explain::impact::{HIGH_COST_THRESHOLD, MEDIUM_COST_THRESHOLD};
use crate::explain::plan::{ExecutionNode, ExecutionPlan, PerformanceImpact};
use nu_ansi_term::Color;
use serde_json::Value;

/// Tree levels rendered before deeper nodes are silently dropped.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Returned when the renderer is handed a value that is not a plan payload.
pub const INVALID_PLAN_MESSAGE: &str = "Invalid execution plan";

const EXPRESSION_PREVIEW_LEN: usize = 50;

/// Renders execution plans as annotated text reports.
///
/// Holds only read-only configuration, so one renderer can serve any number
/// of plans (and threads) without coordination.
#[derive(Debug, Clone)]
pub struct PlanRenderer {
    colorize: bool,
    max_depth: usize,
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self {
            colorize: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl PlanRenderer {
    /// Creates a renderer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables ANSI color codes in the output.
    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Sets the maximum tree depth rendered.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Renders a raw EXPLAIN payload, parsing and annotating it first.
    ///
    /// Returns [`INVALID_PLAN_MESSAGE`] when the value is not a JSON object
    /// rather than failing.
    pub fn render_value(&self, raw: &Value, verbose: bool) -> String {
        if !raw.is_object() {
            return INVALID_PLAN_MESSAGE.to_string();
        }
        let plan = diagnostics::analyze_payload(raw);
        self.render(&plan, verbose)
    }

    /// Renders a parsed plan as a multi-section text report.
    ///
    /// Sections whose source data is empty are omitted entirely.
    pub fn render(&self, plan: &ExecutionPlan, verbose: bool) -> String {
        let mut sections: Vec<String> = Vec::new();

        if !plan.query.is_empty() {
            sections.push(format!("Query:\n  {}", plan.query));
        }

        sections.push(self.summary_section(plan));

        if !plan.nodes.is_empty() {
            sections.push(self.tree_section(plan, verbose));
        }

        for (header, prefix, items) in [
            ("Optimizations:", "✓ ", &plan.optimizations),
            ("Bottlenecks:", "⚠ ", &plan.bottlenecks),
            ("Recommendations:", "→ ", &plan.recommendations),
            ("Warnings:", "⚠ ", &plan.warnings),
        ] {
            if let Some(section) = list_section(header, prefix, items) {
                sections.push(section);
            }
        }

        sections.join("\n\n")
    }

    fn summary_section(&self, plan: &ExecutionPlan) -> String {
        let mut lines = vec!["Summary:".to_string()];
        lines.push(format!("  Total cost: {}", self.colorize_cost(plan.total_cost)));
        if !plan.collections_used.is_empty() {
            lines.push(format!(
                "  Collections: {}",
                plan.collections_used.join(", ")
            ));
        }
        if !plan.indexes_used.is_empty() {
            let labels: Vec<String> = plan.indexes_used.iter().map(|i| i.label()).collect();
            lines.push(format!("  Indexes: {}", labels.join(", ")));
        }
        if !plan.rules.is_empty() {
            lines.push(format!("  Optimizer rules: {}", plan.rules.join(", ")));
        }
        lines.push(format!("  Cacheable: {}", plan.cacheable));
        lines.join("\n")
    }

    fn tree_section(&self, plan: &ExecutionPlan, verbose: bool) -> String {
        let mut lines = vec!["Execution Plan:".to_string()];
        let roots = plan.roots();
        for (i, root) in roots.iter().enumerate() {
            self.render_node(
                plan,
                root,
                "",
                0,
                i + 1 == roots.len(),
                verbose,
                &mut lines,
            );
        }
        lines.join("\n")
    }

    /// Renders one node line plus its subtree.
    ///
    /// `level` is the traversal depth, which both drives the connector
    /// layout and bounds the recursion at `max_depth`.
    #[allow(clippy::too_many_arguments)]
    fn render_node(
        &self,
        plan: &ExecutionPlan,
        node: &ExecutionNode,
        prefix: &str,
        level: usize,
        is_last: bool,
        verbose: bool,
        lines: &mut Vec<String>,
    ) {
        if level > self.max_depth {
            return;
        }

        let connector = if level == 0 {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };

        let mut line = format!("  {prefix}{connector}{}", self.colorize_node(node));
        if let Some(collection) = &node.collection {
            line.push_str(&format!(" on {collection}"));
        }
        if let Some(index) = &node.index {
            match &node.index_type {
                Some(index_type) => line.push_str(&format!(" using index {index} ({index_type})")),
                None => line.push_str(&format!(" using index {index}")),
            }
        }
        line.push_str(&format!(" [Cost: {:.2}]", node.estimated_cost));
        lines.push(line);

        let child_prefix = if level == 0 {
            prefix.to_string()
        } else if is_last {
            format!("{prefix}   ")
        } else {
            format!("{prefix}│  ")
        };

        if verbose && !node.expressions.is_empty() {
            let joined = node.expressions.join("; ");
            lines.push(format!(
                "  {child_prefix}   {}",
                truncate(&joined, EXPRESSION_PREVIEW_LEN)
            ));
        }

        let children = plan.children_of(node);
        for (i, child) in children.iter().enumerate() {
            self.render_node(
                plan,
                child,
                &child_prefix,
                level + 1,
                i + 1 == children.len(),
                verbose,
                lines,
            );
        }
    }

    /// Formats a cost to two decimals, color-coded by the cost tiers.
    fn colorize_cost(&self, cost: f64) -> String {
        let text = format!("{cost:.2}");
        if !self.colorize {
            return text;
        }
        let color = if cost > HIGH_COST_THRESHOLD {
            Color::Red
        } else if cost > MEDIUM_COST_THRESHOLD {
            Color::Yellow
        } else {
            Color::Green
        };
        color.paint(text).to_string()
    }

    /// Colorizes a node's type label by its performance impact.
    fn colorize_node(&self, node: &ExecutionNode) -> String {
        let label = node.node_type.label();
        if !self.colorize {
            return label.to_string();
        }
        match node.performance_impact {
            PerformanceImpact::High => Color::Red.paint(label).to_string(),
            PerformanceImpact::Medium => Color::Yellow.paint(label).to_string(),
            PerformanceImpact::Low => Color::Green.paint(label).to_string(),
            PerformanceImpact::Unknown => label.to_string(),
        }
    }
}

fn list_section(header: &str, prefix: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut lines = vec![header.to_string()];
    for item in items {
        lines.push(format!("  {prefix}{item}"));
    }
    Some(lines.join("\n"))
}

/// Truncates to `max` characters, appending an ellipsis when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests;
