//! AQL EXPLAIN Parser
//!
//! Converts a raw EXPLAIN payload into a typed [`ExecutionPlan`] and
//! reconstructs the operator tree from per-node dependency lists.
//!
//! The public entry point is lenient: malformed input degrades to an empty
//! plan instead of an error, so callers can always render *something*. A
//! strict variant exposes the typed failure for callers that want it.
//!
//! # Examples
//!
//! ```
//! use aql_analyzer::explain::parser::parse_plan_str;
//!
//! let payload = r#"{
//!   "plan": {
//!     "nodes": [
//!       {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0}
//!     ],
//!     "estimatedCost": 1.0
//!   }
//! }"#;
//!
//! let plan = parse_plan_str(payload).unwrap();
//! assert_eq!(plan.nodes.len(), 1);
//! ```

use crate::explain::impact::assess_impact;
use crate::explain::plan::{ExecutionNode, ExecutionPlan, IndexRef, NodeType};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when parsing an EXPLAIN payload strictly
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing plan object in EXPLAIN payload")]
    MissingPlan,
}

/// Result type for EXPLAIN parsing
pub type Result<T> = std::result::Result<T, PlanParseError>;

/// Which dependency becomes a node's `parent_id` when the payload lists
/// more than one.
///
/// The planner tooling this analyzer was built against overwrites the parent
/// link on every dependency it visits, so the last one listed wins. That is
/// almost certainly unintentional upstream, but it is the observed behavior
/// and therefore the default here; `FirstDependency` is the obvious
/// alternative reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParentLinkPolicy {
    /// The last dependency listed becomes the parent (observed behavior)
    #[default]
    LastDependency,
    /// The first dependency listed becomes the parent
    FirstDependency,
}

/// Parses raw EXPLAIN payloads into [`ExecutionPlan`] values.
#[derive(Debug, Clone, Default)]
pub struct PlanParser {
    parent_link: ParentLinkPolicy,
}

impl PlanParser {
    /// Creates a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parent-link policy for multi-dependency nodes.
    pub fn with_parent_link_policy(mut self, policy: ParentLinkPolicy) -> Self {
        self.parent_link = policy;
        self
    }

    /// Parses a raw EXPLAIN payload, never failing.
    ///
    /// Missing or malformed plan data yields an empty plan with zero nodes
    /// and zero cost.
    pub fn parse_plan(&self, raw: &Value) -> ExecutionPlan {
        match self.try_parse_plan(raw) {
            Ok(plan) => plan,
            Err(error) => {
                warn!(%error, "malformed EXPLAIN payload, returning empty plan");
                ExecutionPlan::default()
            }
        }
    }

    /// Strict variant of [`PlanParser::parse_plan`].
    ///
    /// Accepts either a direct payload (`{plan: {...}, cacheable, warnings,
    /// query}`) or one wrapped a level deeper under `raw_result`.
    pub fn try_parse_plan(&self, raw: &Value) -> Result<ExecutionPlan> {
        let plan_obj = raw
            .get("plan")
            .or_else(|| raw.pointer("/raw_result/plan"))
            .and_then(Value::as_object)
            .ok_or(PlanParseError::MissingPlan)?;

        let mut plan = ExecutionPlan {
            total_cost: plan_obj
                .get("estimatedCost")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            collections_used: collection_names(plan_obj.get("collections")),
            rules: string_list(plan_obj.get("rules")),
            query: raw
                .get("query")
                .or_else(|| raw.pointer("/raw_result/query"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            cacheable: raw
                .get("cacheable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            warnings: normalize_warnings(raw.get("warnings")),
            ..ExecutionPlan::default()
        };

        let mut dependencies: Vec<(i64, Vec<i64>)> = Vec::new();
        if let Some(nodes) = plan_obj.get("nodes").and_then(Value::as_array) {
            for value in nodes {
                let Some(obj) = value.as_object() else {
                    continue;
                };
                let node = parse_node(obj, &mut plan.indexes_used);
                dependencies.push((node.id, dependency_ids(obj)));
                plan.nodes.push(node);
            }
        }

        self.link_tree(&mut plan, &dependencies);
        assign_depths(&mut plan);

        debug!(nodes = plan.nodes.len(), total_cost = plan.total_cost, "parsed execution plan");
        Ok(plan)
    }

    /// Builds `parent_id` and `children_ids` from the dependency lists.
    ///
    /// A node is recorded as a child of every dependency it lists, while the
    /// single parent link follows the configured [`ParentLinkPolicy`].
    fn link_tree(&self, plan: &mut ExecutionPlan, dependencies: &[(i64, Vec<i64>)]) {
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut parents: HashMap<i64, i64> = HashMap::new();

        for (id, deps) in dependencies {
            for dep in deps {
                children.entry(*dep).or_default().push(*id);
                match self.parent_link {
                    ParentLinkPolicy::LastDependency => {
                        parents.insert(*id, *dep);
                    }
                    ParentLinkPolicy::FirstDependency => {
                        parents.entry(*id).or_insert(*dep);
                    }
                }
            }
        }

        for node in &mut plan.nodes {
            node.parent_id = parents.get(&node.id).copied();
            node.children_ids = children.remove(&node.id).unwrap_or_default();
        }
    }
}

/// Parses a raw EXPLAIN payload with the default parser, never failing.
pub fn parse_plan(raw: &Value) -> ExecutionPlan {
    PlanParser::new().parse_plan(raw)
}

/// Strict variant of [`parse_plan`].
pub fn try_parse_plan(raw: &Value) -> Result<ExecutionPlan> {
    PlanParser::new().try_parse_plan(raw)
}

/// Parses an EXPLAIN payload from its raw JSON text.
pub fn parse_plan_str(payload: &str) -> Result<ExecutionPlan> {
    let value: Value = serde_json::from_str(payload)?;
    PlanParser::new().try_parse_plan(&value)
}

/// Parses a single node object from the payload.
///
/// Index references found on the node are also appended to the plan-level
/// `indexes_used` list.
fn parse_node(obj: &Map<String, Value>, indexes_used: &mut Vec<IndexRef>) -> ExecutionNode {
    let id = obj.get("id").and_then(Value::as_i64).unwrap_or(0);
    let node_type = obj
        .get("type")
        .and_then(Value::as_str)
        .map(NodeType::from_type_str)
        .unwrap_or(NodeType::Unknown);

    let mut node = ExecutionNode::new(id, node_type);
    node.estimated_cost = obj
        .get("estimatedCost")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    node.collection = obj
        .get("collection")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(expression) = obj.get("expression") {
        node.expressions.push(stringify_expression(expression));
    }

    if let Some(first) = obj
        .get("indexes")
        .and_then(Value::as_array)
        .and_then(|indexes| indexes.first())
        .and_then(Value::as_object)
    {
        node.index = first.get("name").and_then(Value::as_str).map(str::to_string);
        node.index_type = first.get("type").and_then(Value::as_str).map(str::to_string);
        if let Some(name) = &node.index {
            indexes_used.push(IndexRef {
                name: name.clone(),
                index_type: node.index_type.clone(),
                collection: node.collection.clone(),
            });
        }
    }

    node.performance_impact = assess_impact(node.node_type, node.estimated_cost);
    node.raw_data = obj.clone();
    node
}

/// Assigns depths by depth-first traversal from each root.
///
/// Already-visited nodes are skipped, which keeps malformed payloads with
/// dependency cycles from looping.
fn assign_depths(plan: &mut ExecutionPlan) {
    let index_by_id: HashMap<i64, usize> = plan
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();

    let mut stack: Vec<(i64, usize)> = plan
        .nodes
        .iter()
        .rev()
        .filter(|n| n.is_root())
        .map(|n| (n.id, 0))
        .collect();
    let mut visited: HashSet<i64> = HashSet::new();

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(&i) = index_by_id.get(&id) else {
            continue;
        };
        plan.nodes[i].depth = depth;
        for &child in plan.nodes[i].children_ids.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

fn dependency_ids(obj: &Map<String, Value>) -> Vec<i64> {
    obj.get("dependencies")
        .and_then(Value::as_array)
        .map(|deps| deps.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

/// Stringifies a node expression: strings pass through verbatim, anything
/// else is encoded as compact JSON.
fn stringify_expression(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads `plan.collections`, accepting bare strings or `{name}` objects.
fn collection_names(value: Option<&Value>) -> Vec<String> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes warnings: entries may be bare strings or objects carrying a
/// `message` field.
fn normalize_warnings(value: Option<&Value>) -> Vec<String> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}
