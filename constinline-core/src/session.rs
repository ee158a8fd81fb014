//! One complete analysis run.
//!
//! A [`Session`] runs every phase once, in order, and owns everything they
//! produce. It is immutable afterwards; hook calls are pure lookups. A
//! rebuild (watch mode, changed tsconfig) constructs a new session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::bindings::BindingGraph;
use crate::enums::{DeclarationIndex, EnumValues};
use crate::error::{InlineError, InlineResult, IoResultExt};
use crate::logging::log_phase;
use crate::parse::parse_modules;
use crate::resolve::Resolver;
use crate::scan::{gather_source_files, index_paths};
use crate::table::ReplacementTable;
use crate::transform::SourceHook;
use crate::tsconfig::{load_tsconfig, TsConfigPaths};

/// Fully resolved inputs of one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Canonical project root
    pub root: PathBuf,
    /// Directory scanned for sources
    pub source_dir: PathBuf,
    pub file_pattern: String,
    /// tsconfig to read aliases from
    pub tsconfig: Option<PathBuf>,
    /// Fail when `tsconfig` does not exist instead of running without aliases
    pub tsconfig_required: bool,
    pub exclude_dirs: Vec<String>,
    pub vendor_dirs: Vec<String>,
    pub inline_local: bool,
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub files: usize,
    pub modules: usize,
    pub declarations: usize,
    pub bindings: usize,
    pub members: usize,
    pub table_files: usize,
    pub table_entries: usize,
}

/// Immutable result of an analysis.
#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    vendor_dirs: Vec<String>,
    paths_by_id: HashMap<String, PathBuf>,
    index: DeclarationIndex,
    bindings: BindingGraph,
    values: EnumValues,
    table: ReplacementTable,
    stats: SessionStats,
}

fn load_aliases(options: &SessionOptions) -> InlineResult<TsConfigPaths> {
    let Some(path) = &options.tsconfig else {
        return Ok(TsConfigPaths::default());
    };
    if path.exists() {
        return load_tsconfig(path);
    }
    if options.tsconfig_required {
        return Err(InlineError::config(path, "tsconfig not found"));
    }
    debug!(path = %path.display(), "no tsconfig, running without aliases");
    Ok(TsConfigPaths::default())
}

impl Session {
    /// Runs all phases. Any fatal error aborts the whole run.
    pub fn analyze(options: &SessionOptions) -> InlineResult<Self> {
        let aliases = load_aliases(options)?;
        log_phase("tsconfig", aliases.mappings.len());

        let files =
            gather_source_files(&options.source_dir, &options.file_pattern, &options.exclude_dirs)?;
        log_phase("scan", files.len());

        let modules = parse_modules(&files)?;
        log_phase("parse", modules.len());

        let paths_by_id = index_paths(&modules);
        let resolver = Resolver::new(
            paths_by_id.keys().cloned().collect(),
            aliases.mappings,
            aliases.base_url,
        );

        let index = DeclarationIndex::collect(&modules);
        log_phase("declarations", index.len());

        let bindings = BindingGraph::build(&modules, &resolver, &index);
        log_phase("bindings", bindings.len());

        let values = EnumValues::evaluate(&index, &bindings)?;
        log_phase("members", values.len());

        let table = ReplacementTable::build(
            &modules,
            &index,
            &bindings,
            &values,
            options.inline_local,
        );
        log_phase("table", table.len());

        let stats = SessionStats {
            files: files.len(),
            modules: modules.len(),
            declarations: index.len(),
            bindings: bindings.len(),
            members: values.len(),
            table_files: table.len(),
            table_entries: table.entry_count(),
        };
        info!(
            root = %options.root.display(),
            files = stats.files,
            entries = stats.table_entries,
            "analysis complete"
        );

        Ok(Self {
            root: options.root.clone(),
            vendor_dirs: options.vendor_dirs.clone(),
            paths_by_id,
            index,
            bindings,
            values,
            table,
            stats,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table(&self) -> &ReplacementTable {
        &self.table
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn declarations(&self) -> &DeclarationIndex {
        &self.index
    }

    pub fn bindings(&self) -> &BindingGraph {
        &self.bindings
    }

    pub fn values(&self) -> &EnumValues {
        &self.values
    }

    /// Real path of a module id (first path when several files share it).
    pub fn module_path(&self, id: &str) -> Option<&Path> {
        self.paths_by_id.get(id).map(PathBuf::as_path)
    }

    /// Source-load hook: the rewritten code, or `None` to pass through.
    pub fn transform(&self, id: &str, code: &str) -> Option<String> {
        SourceHook::new(&self.table, &self.vendor_dirs).transform(id, code)
    }

    /// Reads `path` and applies [`Session::transform`].
    pub fn transform_file(&self, path: &Path) -> InlineResult<Option<String>> {
        let code = fs::read_to_string(path).with_path(path)?;
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().with_path(path)?.join(path)
        };
        let id = fs::canonicalize(&absolute).unwrap_or(absolute);
        Ok(self.transform(&id.to_string_lossy(), &code))
    }
}
