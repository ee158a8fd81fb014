//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use constinline_core::prelude::*;
//! ```

// Core analysis types
pub use crate::error::{InlineError, InlineResult};
pub use crate::parse::ModuleInfo;

// Builder API and session
pub use crate::builder::ConstInline;
pub use crate::session::{Session, SessionStats};

// Output
pub use crate::table::ReplacementTable;

// Configuration
pub use crate::config::{load_config, InlineConfig};
