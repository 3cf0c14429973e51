//! Execution Plan Model - Data structures for representing AQL execution plans
//!
//! This module defines the typed model the parser produces from a raw
//! EXPLAIN payload: plan-level metadata plus one [`ExecutionNode`] per
//! operator, linked into a tree through parent/children ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type of operation performed by a plan node.
///
/// Mirrors the planner's node vocabulary; anything the planner emits that is
/// not listed here parses as `Unknown` rather than failing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Singleton,
    EnumerateCollection,
    Index,
    EnumerateList,
    Filter,
    Sort,
    Limit,
    Return,
    Calculation,
    Subquery,
    Join,
    Traversal,
    Scatter,
    Gather,
    Distribute,
    Remote,
    NoResults,
    Insert,
    Update,
    Replace,
    Remove,
    Upsert,
    Unknown,
}

impl NodeType {
    /// Parses a node type from the planner's `type` string.
    ///
    /// The planner emits names like `"EnumerateCollectionNode"`; the trailing
    /// `Node` suffix is optional, so `"Sort"` and `"SortNode"` both parse.
    /// Unrecognized strings map to `Unknown`, never an error.
    pub fn from_type_str(s: &str) -> Self {
        let name = s.strip_suffix("Node").unwrap_or(s);
        match name {
            "Singleton" => Self::Singleton,
            "EnumerateCollection" => Self::EnumerateCollection,
            "Index" => Self::Index,
            "EnumerateList" => Self::EnumerateList,
            "Filter" => Self::Filter,
            "Sort" => Self::Sort,
            "Limit" => Self::Limit,
            "Return" => Self::Return,
            "Calculation" => Self::Calculation,
            "Subquery" => Self::Subquery,
            "Join" => Self::Join,
            "Traversal" => Self::Traversal,
            "Scatter" => Self::Scatter,
            "Gather" => Self::Gather,
            "Distribute" => Self::Distribute,
            "Remote" => Self::Remote,
            "NoResults" => Self::NoResults,
            "Insert" => Self::Insert,
            "Update" => Self::Update,
            "Replace" => Self::Replace,
            "Remove" => Self::Remove,
            "Upsert" => Self::Upsert,
            _ => Self::Unknown,
        }
    }

    /// Returns the coarser operation category for this node type.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::EnumerateCollection | Self::EnumerateList => OperationType::Scan,
            Self::Index => OperationType::IndexScan,
            Self::Filter => OperationType::Filter,
            Self::Sort => OperationType::Sort,
            Self::Limit => OperationType::Limit,
            Self::Return => OperationType::Return,
            Self::Calculation => OperationType::Calculation,
            Self::Join => OperationType::Join,
            Self::Traversal => OperationType::Traversal,
            Self::Insert | Self::Update | Self::Replace | Self::Remove | Self::Upsert => {
                OperationType::Modification
            }
            Self::Singleton
            | Self::Subquery
            | Self::Scatter
            | Self::Gather
            | Self::Distribute
            | Self::Remote
            | Self::NoResults
            | Self::Unknown => OperationType::Unknown,
        }
    }

    /// Returns the label used when rendering this node type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::EnumerateCollection => "EnumerateCollection",
            Self::Index => "Index",
            Self::EnumerateList => "EnumerateList",
            Self::Filter => "Filter",
            Self::Sort => "Sort",
            Self::Limit => "Limit",
            Self::Return => "Return",
            Self::Calculation => "Calculation",
            Self::Subquery => "Subquery",
            Self::Join => "Join",
            Self::Traversal => "Traversal",
            Self::Scatter => "Scatter",
            Self::Gather => "Gather",
            Self::Distribute => "Distribute",
            Self::Remote => "Remote",
            Self::NoResults => "NoResults",
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Replace => "Replace",
            Self::Remove => "Remove",
            Self::Upsert => "Upsert",
            Self::Unknown => "Unknown",
        }
    }
}

/// Coarse operation category derived from [`NodeType`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Scan,
    IndexScan,
    Filter,
    Sort,
    Limit,
    Return,
    Calculation,
    Join,
    Traversal,
    Modification,
    Unknown,
}

/// Heuristic classification of how costly an operator is likely to be.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceImpact {
    High,
    Medium,
    Low,
    Unknown,
}

impl PerformanceImpact {
    /// Returns the impact level as a display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

/// An index referenced by the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexRef {
    /// Index name
    pub name: String,
    /// Index type (e.g. `persistent`, `hash`), if reported
    pub index_type: Option<String>,
    /// Collection the index belongs to, if known
    pub collection: Option<String>,
}

impl IndexRef {
    /// Formats the reference as `collection.name (type)`, dropping whichever
    /// parts are absent.
    pub fn label(&self) -> String {
        match (&self.collection, &self.index_type) {
            (Some(collection), Some(index_type)) => {
                format!("{collection}.{} ({index_type})", self.name)
            }
            (None, Some(index_type)) => format!("{} ({index_type})", self.name),
            (Some(collection), None) => format!("{collection}.{}", self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// Represents a single operator in the execution plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionNode {
    /// Node id, unique within a plan
    pub id: i64,
    /// Type of operation this node performs
    pub node_type: NodeType,
    /// Coarse operation category, derived from `node_type`
    pub operation_type: OperationType,
    /// Collection this node operates on (if applicable)
    pub collection: Option<String>,
    /// Index name used (for index scans)
    pub index: Option<String>,
    /// Index type (for index scans)
    pub index_type: Option<String>,
    /// Estimated cost reported by the planner
    pub estimated_cost: f64,
    /// Stringified filter/condition expressions attached to this node
    pub expressions: Vec<String>,
    /// Heuristic performance classification
    pub performance_impact: PerformanceImpact,
    /// Parent node id; `None` for roots
    pub parent_id: Option<i64>,
    /// Ids of the nodes that depend on this node
    pub children_ids: Vec<i64>,
    /// Distance from the root (roots sit at depth 0)
    pub depth: usize,
    /// Original node payload, preserved verbatim
    pub raw_data: Map<String, Value>,
}

impl ExecutionNode {
    /// Creates a new node with the given id and type.
    pub fn new(id: i64, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            operation_type: node_type.operation_type(),
            collection: None,
            index: None,
            index_type: None,
            estimated_cost: 0.0,
            expressions: Vec::new(),
            performance_impact: PerformanceImpact::Unknown,
            parent_id: None,
            children_ids: Vec::new(),
            depth: 0,
            raw_data: Map::new(),
        }
    }

    /// Sets the collection name
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Sets the estimated cost
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = cost;
        self
    }

    /// Sets the index name and type
    pub fn with_index(mut self, name: impl Into<String>, index_type: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self.index_type = Some(index_type.into());
        self
    }

    /// Appends an expression
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expressions.push(expression.into());
        self
    }

    /// Sets the tree depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Returns true if this node is a root of the plan tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Formats the node's index as `collection.name (type)`, dropping
    /// whichever parts are absent. `None` when the node uses no index.
    pub fn index_label(&self) -> Option<String> {
        let name = self.index.as_ref()?;
        Some(match (&self.collection, &self.index_type) {
            (Some(collection), Some(index_type)) => {
                format!("{collection}.{name} ({index_type})")
            }
            (None, Some(index_type)) => format!("{name} ({index_type})"),
            (Some(collection), None) => format!("{collection}.{name}"),
            (None, None) => name.clone(),
        })
    }
}

/// Represents a complete, parsed execution plan.
///
/// Constructed once per analysis call and treated as immutable afterward;
/// the diagnostics lists are filled in after node/tree construction and
/// rendering never mutates the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPlan {
    /// All operator nodes; tree structure is carried via parent/children ids
    pub nodes: Vec<ExecutionNode>,
    /// Total estimated cost of the query
    pub total_cost: f64,
    /// Collections touched by the plan
    pub collections_used: Vec<String>,
    /// Indexes referenced by the plan
    pub indexes_used: Vec<IndexRef>,
    /// Optimizer rules applied to the plan
    pub rules: Vec<String>,
    /// Original query text
    pub query: String,
    /// Whether the result is cacheable
    pub cacheable: bool,
    /// Warnings reported by the planner
    pub warnings: Vec<String>,
    /// Optimizations in effect, derived by the diagnostics pass
    pub optimizations: Vec<String>,
    /// Likely bottlenecks, derived by the diagnostics pass
    pub bottlenecks: Vec<String>,
    /// Improvement recommendations, derived by the diagnostics pass
    pub recommendations: Vec<String>,
}

impl ExecutionPlan {
    /// Looks up a node by id.
    pub fn node(&self, id: i64) -> Option<&ExecutionNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns the root nodes in insertion order.
    ///
    /// A well-formed plan has exactly one root; malformed input may yield
    /// zero (empty plan) or several (forest).
    pub fn roots(&self) -> Vec<&ExecutionNode> {
        self.nodes.iter().filter(|n| n.is_root()).collect()
    }

    /// Resolves a node's children, preserving their recorded order.
    pub fn children_of(&self, node: &ExecutionNode) -> Vec<&ExecutionNode> {
        node.children_ids
            .iter()
            .filter_map(|id| self.node(*id))
            .collect()
    }

    /// Returns all nodes of the given type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&ExecutionNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .collect()
    }

    /// Returns true if the plan contains at least one node of the given type.
    pub fn has_node_type(&self, node_type: NodeType) -> bool {
        self.nodes.iter().any(|n| n.node_type == node_type)
    }

    /// Returns the total number of nodes in the plan.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
