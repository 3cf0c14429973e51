//! AQL Analyzer - EXPLAIN plan parsing, diagnostics, and rendering
//!
//! This crate provides functionality for:
//! - Parsing AQL EXPLAIN payloads into a typed execution-plan tree
//! - Classifying the performance impact of each plan operator
//! - Deriving optimizations, bottlenecks, and improvement recommendations
//! - Rendering an annotated, optionally colorized plan report

pub mod explain;

pub use explain::*;
