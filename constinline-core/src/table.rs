//! Replacement table construction.
//!
//! The table maps each real file path to the `"Local.Member"` tokens that
//! may appear in it and the literal text each one becomes. Both levels are
//! ordered maps, so serializing the same analysis always yields the same
//! bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

use crate::bindings::BindingGraph;
use crate::common::{is_identifier, normalize_lexical, path_to_normalized_string, DeclKey};
use crate::enums::{DeclarationIndex, EnumDecl, EnumValues};
use crate::error::{InlineError, InlineResult};
use crate::parse::ModuleInfo;

/// Token → literal text for one file.
pub type FileEntries = BTreeMap<String, String>;

/// Per-file substitution table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable {
    files: BTreeMap<String, FileEntries>,
}

/// Table key for a real path.
pub fn table_key(path: &Path) -> String {
    normalize_lexical(&path_to_normalized_string(path))
}

fn add_declaration(
    entries: &mut FileEntries,
    local: &str,
    key: &DeclKey,
    decl: &EnumDecl,
    values: &EnumValues,
) {
    for (member, value) in values.members_of(key, decl) {
        // Only `Local.Member` can be written as a plain member access
        if is_identifier(member) {
            entries.insert(format!("{}.{}", local, member), value.to_literal_text());
        }
    }
}

impl ReplacementTable {
    /// Builds the table from a finished analysis.
    ///
    /// With `inline_local`, each file first gets its own declarations under
    /// their declared names; resolved imports are added after.
    pub fn build(
        modules: &[ModuleInfo],
        index: &DeclarationIndex,
        bindings: &BindingGraph,
        values: &EnumValues,
        inline_local: bool,
    ) -> Self {
        let mut files = BTreeMap::new();

        for module in modules {
            let mut entries = FileEntries::new();

            if inline_local {
                for own in &module.enums {
                    let key = DeclKey::new(module.id.clone(), own.name.clone());
                    if let Some(decl) = index.get(&key) {
                        add_declaration(&mut entries, &own.name, &key, decl, values);
                    }
                }
            }

            for (local, target) in bindings.imports_of(&module.id) {
                if let Some(decl) = index.get(target) {
                    add_declaration(&mut entries, local, target, decl, values);
                }
            }

            if !entries.is_empty() {
                files.insert(table_key(&module.path), entries);
            }
        }

        Self { files }
    }

    /// Entries for a table key (normalized real path).
    pub fn entries_for(&self, key: &str) -> Option<&FileEntries> {
        self.files.get(key)
    }

    /// Entries for a real path.
    pub fn entries_for_path(&self, path: &Path) -> Option<&FileEntries> {
        self.files.get(&table_key(path))
    }

    /// Files and their entries in path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileEntries)> {
        self.files.iter().map(|(path, entries)| (path.as_str(), entries))
    }

    /// Number of files with at least one entry.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total entries across all files.
    pub fn entry_count(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    /// Compact JSON text.
    pub fn to_json(&self) -> InlineResult<String> {
        serde_json::to_string(self)
            .map_err(|e| InlineError::internal(format!("table serialization failed: {}", e)))
    }

    /// Indented JSON text.
    pub fn to_json_pretty(&self) -> InlineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InlineError::internal(format!("table serialization failed: {}", e)))
    }

    /// SHA-256 hex digest of the compact JSON text.
    pub fn digest(&self) -> InlineResult<String> {
        let mut sha = Sha256::new();
        sha.update(self.to_json()?.as_bytes());
        Ok(format!("{:x}", sha.finalize()))
    }
}
