//! Source-load hook.
//!
//! Given a module id as a bundler reports it and the file text, rewrites
//! every `Local.Member` token listed for that file into its literal. A
//! token only matches as a whole member access: it must not continue an
//! identifier or a longer property chain on the left (`x.Color.Red`), and
//! must not run into more identifier characters on the right
//! (`Color.RedDark`).

use crate::common::normalize_lexical;
use crate::table::{FileEntries, ReplacementTable};

/// Strips a `?query` or `#hash` suffix from a bundler module id.
pub fn clean_id(id: &str) -> &str {
    match id.find(&['?', '#'][..]) {
        Some(end) => &id[..end],
        None => id,
    }
}

/// Whether any directory segment of `path` is a vendor directory.
pub fn is_vendor_path(path: &str, vendor_dirs: &[String]) -> bool {
    path.split(&['/', '\\'][..])
        .any(|segment| vendor_dirs.iter().any(|dir| dir == segment))
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Byte offset just past the identifier characters starting at `start`.
fn ident_end(code: &str, start: usize) -> usize {
    code[start..]
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(offset, _)| start + offset)
        .unwrap_or(code.len())
}

/// End of `.Member` directly after an identifier ending at `end`.
fn member_end(code: &str, end: usize) -> Option<usize> {
    let rest = code[end..].strip_prefix('.')?;
    let first = rest.chars().next()?;
    if !is_ident_start(first) {
        return None;
    }
    Some(ident_end(code, end + 1))
}

/// Whether a `.` right before `pos` is a property access rather than a spread.
fn follows_member_dot(code: &str, pos: usize) -> bool {
    let before = &code[..pos];
    before.ends_with('.') && !before.ends_with("...")
}

/// Whether `text` must be parenthesized to keep its meaning between
/// `before` and `after`: `0.toString()`, `a--1` and `-1 ** 2` do not parse.
fn needs_parens(before: &str, text: &str, after: &str) -> bool {
    let signed = text.starts_with(&['-', '+'][..]);
    let digit_lead = text
        .trim_start_matches(&['-', '+'][..])
        .starts_with(|c: char| c.is_ascii_digit());

    if after.starts_with('.') && (digit_lead || signed) {
        return true;
    }
    signed
        && (after.trim_start().starts_with("**")
            || before.trim_end().ends_with(&['-', '+'][..]))
}

/// Replaces every boundary-respecting token of `entries` in `code`.
///
/// Identifiers are consumed whole, so the longest `Local.Member` at a
/// position is the only candidate.
pub fn replace_tokens(code: &str, entries: &FileEntries) -> String {
    let mut out = String::with_capacity(code.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(c) = code[pos..].chars().next() {
        if !is_ident_char(c) {
            pos += c.len_utf8();
            continue;
        }

        let end = ident_end(code, pos);
        if is_ident_start(c) && !follows_member_dot(code, pos) {
            if let Some(token_end) = member_end(code, end) {
                if let Some(text) = entries.get(&code[pos..token_end]) {
                    out.push_str(&code[last..pos]);
                    if needs_parens(&code[..pos], text, &code[token_end..]) {
                        out.push('(');
                        out.push_str(text);
                        out.push(')');
                    } else {
                        out.push_str(text);
                    }
                    last = token_end;
                    pos = token_end;
                    continue;
                }
            }
        }

        pos = end;
    }

    out.push_str(&code[last..]);
    out
}

/// The hook over a finished table.
#[derive(Debug, Clone, Copy)]
pub struct SourceHook<'a> {
    table: &'a ReplacementTable,
    vendor_dirs: &'a [String],
}

impl<'a> SourceHook<'a> {
    pub fn new(table: &'a ReplacementTable, vendor_dirs: &'a [String]) -> Self {
        Self { table, vendor_dirs }
    }

    /// `None` means pass the file through untouched.
    pub fn transform(&self, id: &str, code: &str) -> Option<String> {
        let path = clean_id(id);
        if is_vendor_path(path, self.vendor_dirs) {
            return None;
        }
        let key = normalize_lexical(path);
        let entries = self.table.entries_for(&key)?;
        Some(replace_tokens(code, entries))
    }
}
