//! constinline-core: cross-module const enum inlining for TypeScript builds
//!
//! TypeScript only inlines `const enum` members when the enum is imported
//! directly inside one compilation unit. Re-exports, renamed imports and
//! barrel files silently defeat it. This library analyzes a whole project
//! once, follows every import/export chain to the declaring module, computes
//! each member's literal value, and exposes a source-load hook that rewrites
//! `Enum.Member` references into literals before a bundler sees the file.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use constinline_core::prelude::*;
//!
//! let session = ConstInline::from_config("/path/to/project")?.analyze()?;
//!
//! if let Some(code) = session.transform(id, &source) {
//!     // hand `code` to the bundler instead of `source`
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: Parallel file discovery with glob matching
//! - [`parse`]: TypeScript (and markup script block) parsing
//! - [`tsconfig`] / [`resolve`]: Import specifier resolution with `paths` aliases
//! - [`enums`]: Const enum declarations and member evaluation
//! - [`bindings`]: Transitive import/export resolution
//! - [`table`]: Per-file replacement table
//! - [`transform`]: The source-load hook
//! - [`session`] / [`builder`]: One analysis run and its fluent configuration
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `markup` (default): Analyze `<script lang="ts">` blocks of `.vue` and
//!   `.svelte` files

pub mod bindings;
pub mod builder;
pub mod common;
pub mod config;
pub mod enums;
pub mod error;
pub mod logging;
pub mod parse;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod session;
pub mod table;
pub mod transform;
pub mod tsconfig;

// Common trait re-exports
pub use common::Propagation;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{InlineError, InlineResult, IoResultExt};

// Builder API and session
pub use builder::ConstInline;
pub use session::{Session, SessionOptions, SessionStats};

// Configuration
pub use config::{load_config, InlineConfig, CONFIG_FILE};
pub use tsconfig::{load_tsconfig, PathMapping, TsConfigPaths};

// Keys and module ids
pub use common::{module_id, Binding, DeclKey, DefKey};

// Logging
pub use logging::{init_logging, init_structured_logging, log_phase, LogFormat};

// Parsing and scanning
pub use parse::{parse_modules, parse_single_module, parse_source, ModuleInfo, ParseResult};
pub use scan::{gather_source_files, DEFAULT_FILE_PATTERN, EXCLUDED_DIRS};

// Analysis phases
pub use bindings::BindingGraph;
pub use enums::{DeclarationIndex, EnumDecl, EnumValues, MemberInit, MemberValue};
pub use resolve::Resolver;

// Output and hook
pub use report::{render_json, render_plain};
pub use table::{FileEntries, ReplacementTable};
pub use transform::{replace_tokens, SourceHook};

#[cfg(test)]
mod tests;
