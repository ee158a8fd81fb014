//! tsconfig `paths` alias loading.
//!
//! Only `compilerOptions.baseUrl` and `compilerOptions.paths` matter here.
//! Files may carry comments and trailing commas. Relative `extends` chains
//! are followed and merged child-over-base; package `extends` (resolved
//! through `node_modules`) are ignored.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::{normalize_lexical, path_to_normalized_string};
use crate::error::{InlineError, InlineResult, IoResultExt};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    paths: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    extends: Option<Extends>,
    compiler_options: Option<RawCompilerOptions>,
}

/// `paths` and `baseUrl` after merging, each with the directory of the file
/// that defined it.
#[derive(Debug, Default)]
struct Merged {
    base_url: Option<String>,
    paths: Option<(BTreeMap<String, Vec<String>>, String)>,
}

/// One `paths` entry with targets made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    pub pattern: String,
    prefix: String,
    suffix: String,
    /// Absolute target patterns, tried in order
    pub targets: Vec<String>,
}

impl PathMapping {
    pub fn new(pattern: impl Into<String>, targets: Vec<String>) -> Self {
        let pattern = pattern.into().trim().replace('\\', "/");
        let (prefix, suffix) = match pattern.find('*') {
            Some(star) => (pattern[..star].to_string(), pattern[star + 1..].to_string()),
            None => (pattern.clone(), String::new()),
        };
        Self {
            pattern,
            prefix,
            suffix,
            targets,
        }
    }

    fn is_wildcard(&self) -> bool {
        self.pattern.contains('*')
    }

    /// The text matched by `*`, or `""` for an exact pattern.
    pub fn match_specifier<'a>(&self, specifier: &'a str) -> Option<&'a str> {
        if !self.is_wildcard() {
            return (self.pattern == specifier).then_some("");
        }
        let rest = specifier.strip_prefix(self.prefix.as_str())?;
        let captured = rest.strip_suffix(self.suffix.as_str())?;
        Some(captured)
    }

    pub fn specificity(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    /// Target paths with `*` replaced by the captured text.
    pub fn substitute(&self, captured: &str) -> Vec<String> {
        self.targets
            .iter()
            .map(|target| target.replacen('*', captured, 1))
            .collect()
    }
}

/// Aliases and bare-specifier base directory from a tsconfig chain.
#[derive(Debug, Clone, Default)]
pub struct TsConfigPaths {
    /// Absolute `baseUrl`
    pub base_url: Option<String>,
    /// Most specific pattern first
    pub mappings: Vec<PathMapping>,
}

fn parse_raw(source: &str, path: &Path) -> InlineResult<RawTsConfig> {
    if source.trim().is_empty() {
        return Ok(RawTsConfig::default());
    }
    json5::from_str(source).map_err(|e| InlineError::config(path, e.to_string()))
}

fn dir_of(path: &Path) -> String {
    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    normalize_lexical(&path_to_normalized_string(parent))
}

fn join(dir: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    if relative.starts_with('/') {
        normalize_lexical(&relative)
    } else {
        normalize_lexical(&format!("{}/{}", dir, relative))
    }
}

fn resolve_extends(current: &Path, extends: &str) -> Option<PathBuf> {
    let is_relative = extends.starts_with("./") || extends.starts_with("../");
    if !is_relative && !Path::new(extends).is_absolute() {
        debug!(extends, "ignoring package tsconfig extends");
        return None;
    }
    let mut candidate = PathBuf::from(extends);
    if !extends.ends_with(".json") {
        candidate = PathBuf::from(format!("{}.json", extends));
    }
    if candidate.is_absolute() {
        Some(candidate)
    } else {
        current.parent().map(|dir| dir.join(candidate))
    }
}

fn load_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> InlineResult<Merged> {
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        return Err(InlineError::config(path, "tsconfig extends cycle detected"));
    }

    let source = fs::read_to_string(path).with_path(path)?;
    let raw = parse_raw(&source, path)?;

    let mut merged = Merged::default();
    let bases = match raw.extends {
        Some(Extends::One(one)) => vec![one],
        Some(Extends::Many(many)) => many,
        None => Vec::new(),
    };
    for base in &bases {
        if let Some(base_path) = resolve_extends(path, base) {
            let inherited = load_inner(&base_path, visited)?;
            merged.base_url = inherited.base_url.or(merged.base_url);
            merged.paths = inherited.paths.or(merged.paths);
        }
    }

    let dir = dir_of(path);
    if let Some(options) = raw.compiler_options {
        if let Some(base_url) = options.base_url {
            merged.base_url = Some(join(&dir, &base_url));
        }
        if let Some(paths) = options.paths {
            merged.paths = Some((paths, dir));
        }
    }

    visited.remove(&canonical);
    Ok(merged)
}

/// Sorts mappings so exact patterns come first, then longer fixed parts.
fn sort_mappings(mappings: &mut [PathMapping]) {
    mappings.sort_by(|left, right| {
        left.is_wildcard()
            .cmp(&right.is_wildcard())
            .then_with(|| right.specificity().cmp(&left.specificity()))
            .then_with(|| left.pattern.cmp(&right.pattern))
    });
}

/// Loads aliases from a tsconfig file and its `extends` chain.
pub fn load_tsconfig(path: &Path) -> InlineResult<TsConfigPaths> {
    let mut visited = HashSet::new();
    let merged = load_inner(path, &mut visited)?;

    let mut mappings = Vec::new();
    if let Some((paths, paths_dir)) = merged.paths {
        let target_base = merged.base_url.clone().unwrap_or(paths_dir);
        for (pattern, targets) in paths {
            if pattern.matches('*').count() > 1 {
                return Err(InlineError::config(
                    path,
                    format!("paths pattern '{}' has more than one '*'", pattern),
                ));
            }
            if targets.is_empty() {
                continue;
            }
            let targets = targets.iter().map(|t| join(&target_base, t)).collect();
            mappings.push(PathMapping::new(pattern, targets));
        }
    }
    sort_mappings(&mut mappings);

    debug!(aliases = mappings.len(), path = %path.display(), "tsconfig loaded");
    Ok(TsConfigPaths {
        base_url: merged.base_url,
        mappings,
    })
}
