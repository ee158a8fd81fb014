//! Canonical module identities.
//!
//! A module id is an absolute, `/`-separated, lexically normalized path with
//! the source extension removed, so `colors.ts` and `colors.tsx` collapse to
//! the same identity. No filesystem access happens here.

use std::path::Path;

/// Extensions stripped from real source files, longest first so `.d.ts`
/// wins over `.ts`.
const SOURCE_EXTENSIONS: &[&str] = &[
    ".d.mts", ".d.cts", ".d.ts", ".tsx", ".mts", ".cts", ".ts", ".svelte", ".vue",
];

/// Extensions an import specifier may carry in addition to the source ones
/// (ESM-style `./colors.js` imports pointing at `colors.ts`).
const SPECIFIER_EXTENSIONS: &[&str] = &[".jsx", ".mjs", ".cjs", ".js"];

/// Normalize a path string to use forward slashes consistently.
#[inline]
pub fn normalize_path_string(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a Path to a normalized string (forward slashes).
#[inline]
pub fn path_to_normalized_string(path: &Path) -> String {
    normalize_path_string(&path.display().to_string())
}

/// Resolves `.` and `..` segments without touching the filesystem.
///
/// `..` above the root of an absolute path is dropped; on a relative path
/// it is kept.
pub fn normalize_lexical(path: &str) -> String {
    let path = normalize_path_string(path);
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Strips a trailing source extension (`.ts`, `.tsx`, `.d.ts`, `.vue`, ...).
pub fn strip_source_extension(path: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        .unwrap_or(path)
}

/// Strips a trailing source or script extension from an import specifier.
pub fn strip_specifier_extension(path: &str) -> &str {
    let stripped = strip_source_extension(path);
    if stripped.len() != path.len() {
        return stripped;
    }
    SPECIFIER_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        .unwrap_or(path)
}

/// Canonical module id for a real file path.
pub fn module_id(path: &Path) -> String {
    let normalized = normalize_lexical(&path_to_normalized_string(path));
    strip_source_extension(&normalized).to_string()
}

/// Whether `name` can appear after a `.` in a member access.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
