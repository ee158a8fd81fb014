//! Output formatting - plaintext and JSON.

use crate::error::InlineResult;
use crate::table::ReplacementTable;

/// Renders the table as an indented listing, one file per block.
pub fn render_plain(table: &ReplacementTable) -> String {
    if table.is_empty() {
        return "No const enum references to inline.\n".to_string();
    }

    let mut out = format!(
        "REPLACEMENTS ({} files, {} entries):\n",
        table.len(),
        table.entry_count()
    );
    for (path, entries) in table.files() {
        out.push_str(&format!("{}\n", path));
        for (token, text) in entries {
            out.push_str(&format!("  {} => {}\n", token, text));
        }
    }
    out
}

/// Renders the table as pretty JSON.
pub fn render_json(table: &ReplacementTable) -> InlineResult<String> {
    table.to_json_pretty()
}
