//! Builder pattern API for constinline analysis.
//!
//! Provides a fluent interface for configuring and running an analysis:
//!
//! ```rust,ignore
//! use constinline_core::prelude::*;
//!
//! let session = ConstInline::new("/path/to/project")
//!     .file_pattern("src/**/*.{ts,tsx}")
//!     .tsconfig("tsconfig.app.json")
//!     .inline_local(false)
//!     .analyze()?;
//!
//! let code = session.transform("/path/to/project/src/app.ts", source);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{load_config, InlineConfig};
use crate::error::{InlineResult, IoResultExt};
use crate::scan::{DEFAULT_FILE_PATTERN, EXCLUDED_DIRS};
use crate::session::{Session, SessionOptions};

/// Default tsconfig looked up at the project root.
const DEFAULT_TSCONFIG: &str = "tsconfig.json";

/// Vendor directories the hook skips by default.
const DEFAULT_VENDOR_DIRS: &[&str] = &["node_modules"];

/// Builder for configuring an analysis session.
///
/// # Example
///
/// ```rust,ignore
/// let session = ConstInline::new("/my/project").analyze()?;
/// println!("{}", session.table().to_json_pretty()?);
/// ```
#[derive(Debug, Clone)]
pub struct ConstInline {
    /// Project root; relative settings resolve against it
    root: PathBuf,

    /// Directory scanned for sources (defaults to the root)
    source_dir: Option<PathBuf>,

    /// Glob matched against source-dir-relative paths
    file_pattern: String,

    /// Explicitly configured tsconfig
    tsconfig: Option<PathBuf>,

    /// Directory names pruned while scanning
    exclude_dirs: Vec<String>,

    /// Directory names the hook never rewrites
    vendor_dirs: Vec<String>,

    /// Substitute same-file references too
    inline_local: bool,
}

impl ConstInline {
    /// Create a new analysis builder for the given project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_dir: None,
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            tsconfig: None,
            exclude_dirs: EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            vendor_dirs: DEFAULT_VENDOR_DIRS.iter().map(|s| s.to_string()).collect(),
            inline_local: true,
        }
    }

    /// Create a builder seeded from `constinline.toml` at `root`, if present.
    pub fn from_config(root: impl Into<PathBuf>) -> InlineResult<Self> {
        let builder = Self::new(root);
        Ok(match load_config(&builder.root)? {
            Some(cfg) => builder.apply_config(cfg),
            None => builder,
        })
    }

    /// Overlay every field set in `cfg`.
    pub fn apply_config(mut self, cfg: InlineConfig) -> Self {
        if let Some(dir) = cfg.source_dir {
            self.source_dir = Some(PathBuf::from(dir));
        }
        if let Some(pattern) = cfg.file_pattern {
            self.file_pattern = pattern;
        }
        if let Some(tsconfig) = cfg.tsconfig_path {
            self.tsconfig = Some(PathBuf::from(tsconfig));
        }
        if let Some(excludes) = cfg.exclude_dirs {
            self.exclude_dirs = excludes;
        }
        if let Some(vendors) = cfg.vendor_dirs {
            self.vendor_dirs = vendors;
        }
        if let Some(inline_local) = cfg.inline_local {
            self.inline_local = inline_local;
        }
        self
    }

    /// Directory scanned for sources, relative to the root unless absolute.
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Glob for source files.
    pub fn file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// tsconfig to read `paths` from; it must exist.
    pub fn tsconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.tsconfig = Some(path.into());
        self
    }

    /// Replace the excluded directory names.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the vendor directory names.
    pub fn vendor_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.vendor_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable same-file substitution.
    pub fn inline_local(mut self, enabled: bool) -> Self {
        self.inline_local = enabled;
        self
    }

    /// Resolve paths against the canonical root.
    pub fn options(&self) -> InlineResult<SessionOptions> {
        let root = fs::canonicalize(&self.root).with_path(&self.root)?;

        let source_dir = match &self.source_dir {
            Some(dir) => {
                let joined = join_root(&root, dir);
                fs::canonicalize(&joined).with_path(&joined)?
            }
            None => root.clone(),
        };

        let (tsconfig, tsconfig_required) = match &self.tsconfig {
            Some(path) => (join_root(&root, path), true),
            None => (root.join(DEFAULT_TSCONFIG), false),
        };

        Ok(SessionOptions {
            root,
            source_dir,
            file_pattern: self.file_pattern.clone(),
            tsconfig: Some(tsconfig),
            tsconfig_required,
            exclude_dirs: self.exclude_dirs.clone(),
            vendor_dirs: self.vendor_dirs.clone(),
            inline_local: self.inline_local,
        })
    }

    /// Run the analysis and return the finished session.
    pub fn analyze(&self) -> InlineResult<Session> {
        Session::analyze(&self.options()?)
    }
}

fn join_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
