//! Parallel, deterministic source discovery with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel glob matching via Rayon's `par_bridge`
//! - Sorted output regardless of traversal order

use globset::{GlobBuilder, GlobMatcher};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::path_to_normalized_string;
use crate::error::{InlineError, InlineResult};
use crate::parse::ModuleInfo;

/// Default glob for source files, relative to the source root.
pub const DEFAULT_FILE_PATTERN: &str = "**/*.{ts,tsx,mts,cts,vue,svelte}";

/// Directories excluded by default.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "target"];

/// Checks if a directory entry should be pruned (excluded from traversal).
///
/// The root itself is never pruned, even when its name is excluded.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Compiles a file pattern; `*` does not cross `/`, `**` does.
pub fn compile_pattern(pattern: &str, root: &Path) -> InlineResult<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| InlineError::config(root, format!("invalid file pattern '{}': {}", pattern, e)))
}

/// Gathers every file under `root` whose root-relative path matches `pattern`.
///
/// `excludes` are directory names pruned anywhere below the root. The
/// result is sorted.
pub fn gather_source_files(
    root: &Path,
    pattern: &str,
    excludes: &[String],
) -> InlineResult<Vec<PathBuf>> {
    let matcher = compile_pattern(pattern, root)?;
    let excludes: HashSet<&str> = excludes.iter().map(String::as_str).collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                if !e.file_type().is_file() {
                    return None;
                }
                let relative = e.path().strip_prefix(root).unwrap_or(e.path());
                let relative = path_to_normalized_string(relative);
                matcher
                    .is_match(relative.as_str())
                    .then(|| Ok(e.path().to_path_buf()))
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                let message = e.to_string();
                Some(Err(match e.into_io_error() {
                    Some(io) => InlineError::io(path, io),
                    None => InlineError::Io {
                        path,
                        message,
                        source: None,
                    },
                }))
            }
        })
        .collect::<InlineResult<Vec<_>>>()?;

    files.sort();
    Ok(files)
}

/// Maps each module id to its real path; with several files per id the
/// first in path order wins.
pub fn index_paths(modules: &[ModuleInfo]) -> HashMap<String, PathBuf> {
    let mut paths = HashMap::with_capacity(modules.len());
    for module in modules {
        paths
            .entry(module.id.clone())
            .or_insert_with(|| module.path.clone());
    }
    paths
}
