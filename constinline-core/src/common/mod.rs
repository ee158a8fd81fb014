//! Common utilities shared across analyzer modules.
//!
//! Canonical module identities, the composite keys built on them, and the
//! work-list propagation used by both the binding graph and the member
//! evaluator.

mod graph_trait;
mod keys;
mod module_id;

pub use graph_trait::Propagation;
pub use keys::{Binding, DeclKey, DefKey};
pub use module_id::{
    is_identifier, module_id, normalize_lexical, normalize_path_string, path_to_normalized_string,
    strip_source_extension, strip_specifier_extension,
};
