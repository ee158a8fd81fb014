//! Import/export bindings across modules.
//!
//! - [`binding_extractor`]: import and export statements of one module
//! - [`binding_graph`]: transitive resolution of every binding to the enum
//!   declaration it names

pub mod binding_extractor;
pub mod binding_graph;

pub use binding_extractor::{extract_bindings, ExportStmt, ImportBinding, ImportStmt};
pub use binding_graph::BindingGraph;
