//! Import specifier resolution.
//!
//! Maps `(specifier, importing module id)` to a module id without touching
//! the filesystem: only ids of scanned modules count as existing.

use std::collections::HashSet;

use crate::common::{normalize_lexical, strip_specifier_extension};
use crate::parse::ModuleInfo;
use crate::tsconfig::PathMapping;

/// Resolves import specifiers against the scanned module set.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    known: HashSet<String>,
    aliases: Vec<PathMapping>,
    base_url: Option<String>,
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn parent_of(id: &str) -> &str {
    id.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

impl Resolver {
    /// `aliases` must already be ordered most specific first.
    pub fn new(known: HashSet<String>, aliases: Vec<PathMapping>, base_url: Option<String>) -> Self {
        Self {
            known,
            aliases,
            base_url,
        }
    }

    /// Resolver over the ids of `modules`, without a `baseUrl`.
    pub fn for_modules(modules: &[ModuleInfo], aliases: Vec<PathMapping>) -> Self {
        let known = modules.iter().map(|m| m.id.clone()).collect();
        Self::new(known, aliases, None)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// Normalizes, strips the extension, and falls back to a directory index.
    fn finish(&self, path: &str) -> String {
        let normalized = normalize_lexical(path);
        let id = strip_specifier_extension(&normalized).to_string();
        if !self.is_known(&id) {
            let index = format!("{}/index", id);
            if self.is_known(&index) {
                return index;
            }
        }
        id
    }

    fn resolve_alias(&self, specifier: &str) -> Option<String> {
        let (mapping, captured) = self
            .aliases
            .iter()
            .find_map(|m| m.match_specifier(specifier).map(|c| (m, c)))?;

        let candidates: Vec<String> = mapping
            .substitute(captured)
            .iter()
            .map(|target| self.finish(target))
            .collect();

        candidates
            .iter()
            .find(|id| self.is_known(id))
            .or_else(|| candidates.first())
            .cloned()
    }

    /// Resolves `specifier` as imported from module `importer`.
    ///
    /// Specifiers that are neither relative, absolute, aliased nor found
    /// under `baseUrl` are returned unchanged (external packages).
    pub fn resolve(&self, specifier: &str, importer: &str) -> String {
        if is_relative(specifier) {
            return self.finish(&format!("{}/{}", parent_of(importer), specifier));
        }
        if specifier.starts_with('/') {
            return self.finish(specifier);
        }
        if let Some(aliased) = self.resolve_alias(specifier) {
            return aliased;
        }
        if let Some(base) = &self.base_url {
            let candidate = self.finish(&format!("{}/{}", base, specifier));
            if self.is_known(&candidate) {
                return candidate;
            }
        }
        specifier.to_string()
    }
}
