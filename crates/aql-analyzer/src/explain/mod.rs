//! AQL EXPLAIN Analysis Module
//!
//! This module turns the JSON-shaped output of the query planner's EXPLAIN
//! into a typed execution plan, derives diagnostics over it, and renders an
//! annotated text report:
//! - `plan` - the execution plan data model
//! - `parser` - raw payload to [`ExecutionPlan`] conversion
//! - `impact` - per-operator performance classification
//! - `diagnostics` - optimizations, bottlenecks, and recommendations
//! - `render` - plan report rendering
//!
//! # Example
//!
//! ```
//! use aql_analyzer::explain::{analyze_payload, PlanRenderer};
//!
//! let payload = serde_json::json!({
//!     "plan": {
//!         "nodes": [
//!             {"id": 1, "type": "SingletonNode", "dependencies": [], "estimatedCost": 1.0},
//!             {"id": 2, "type": "ReturnNode", "dependencies": [1], "estimatedCost": 2.0}
//!         ],
//!         "estimatedCost": 2.0,
//!         "collections": []
//!     },
//!     "query": "RETURN 1"
//! });
//!
//! let plan = analyze_payload(&payload);
//! assert_eq!(plan.total_cost, 2.0);
//!
//! let report = PlanRenderer::new().with_colorize(false).render(&plan, false);
//! assert!(report.contains("RETURN 1"));
//! ```

pub mod diagnostics;
pub mod impact;
pub mod parser;
pub mod plan;
pub mod render;

pub use diagnostics::{analyze_payload, annotate, bottlenecks, optimizations, recommendations};
pub use impact::{
    HIGH_COST_THRESHOLD, LIMIT_SUGGESTION_THRESHOLD, MEDIUM_COST_THRESHOLD,
    OVERALL_COST_THRESHOLD, SORT_COST_THRESHOLD, assess_impact,
};
pub use parser::{
    ParentLinkPolicy, PlanParseError, PlanParser, parse_plan, parse_plan_str, try_parse_plan,
};
pub use plan::{
    ExecutionNode, ExecutionPlan, IndexRef, NodeType, OperationType, PerformanceImpact,
};
pub use render::{DEFAULT_MAX_DEPTH, INVALID_PLAN_MESSAGE, PlanRenderer};
