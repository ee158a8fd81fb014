//! Module parsing.
//!
//! Each source file is parsed once with the TypeScript parser and reduced
//! immediately to a [`ModuleInfo`]: its const enum declarations plus its
//! import and export statements. The syntax tree itself never leaves the
//! worker thread.
//!
//! Markup files (`.vue`, `.svelte`) contribute only their
//! `<script lang="ts">` / `<script lang="tsx">` blocks. Everything outside
//! those blocks is blanked with spaces so reported line numbers still match
//! the original file.

use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use swc_common::{sync::Lrc, FileName, SourceMap, Spanned, GLOBALS};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use tracing::warn;

use crate::bindings::{extract_bindings, ExportStmt, ImportStmt};
use crate::common::module_id;
use crate::enums::{extract_enums, EnumDecl};
use crate::error::{InlineError, InlineResult, IoResultExt};

/// Maximum file size to parse (10 MB).
const MAX_FILE_SIZE: usize = 10_000_000;

/// Everything later phases need from one source file.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    /// Real path of the file
    pub path: PathBuf,
    /// Canonical module id
    pub id: String,
    /// Top-level const enum declarations
    pub enums: Vec<EnumDecl>,
    /// Import statements, in statement order
    pub imports: Vec<ImportStmt>,
    /// Export statements, in statement order
    pub exports: Vec<ExportStmt>,
}

impl ModuleInfo {
    /// Creates an empty ModuleInfo for `path`.
    pub fn new(path: PathBuf) -> Self {
        let id = module_id(&path);
        Self {
            path,
            id,
            enums: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    fn from_module(path: &Path, module: &Module) -> Self {
        let mut info = Self::new(path.to_path_buf());
        info.enums = extract_enums(module);
        let (imports, exports) = extract_bindings(module);
        info.imports = imports;
        info.exports = exports;
        info
    }
}

/// Result of parsing a single file.
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed module
    Parsed(ModuleInfo),
    /// File holds no TypeScript (markup without a `lang="ts"` script block)
    Skipped(PathBuf, String),
}

enum SourceKind {
    Script { tsx: bool },
    Markup,
}

fn source_kind(path: &Path) -> SourceKind {
    match path.extension().and_then(|e| e.to_str()) {
        Some("vue") | Some("svelte") => SourceKind::Markup,
        Some("tsx") => SourceKind::Script { tsx: true },
        _ => SourceKind::Script { tsx: false },
    }
}

/// Parses TypeScript source into a module syntax tree.
///
/// The first syntax error (fatal or recovered) fails the parse and is
/// reported with its 1-indexed line and column.
pub fn parse_typescript(path: &Path, source: &str, tsx: bool) -> InlineResult<Module> {
    let cm: Lrc<SourceMap> = Default::default();

    GLOBALS.set(&Default::default(), || {
        let fm = cm.new_source_file(FileName::Real(path.to_path_buf()).into(), source.to_string());
        let lexer = Lexer::new(
            Syntax::Typescript(TsSyntax {
                tsx,
                ..Default::default()
            }),
            EsVersion::latest(),
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);

        let report = |err: swc_ecma_parser::error::Error| {
            let loc = cm.lookup_char_pos(err.span().lo);
            InlineError::parse_at(path, err.kind().msg().to_string(), loc.line, loc.col.0 + 1)
        };

        let parsed = parser.parse_module();
        let recovered = parser.take_errors();
        match parsed {
            Ok(module) => match recovered.into_iter().next() {
                None => Ok(module),
                Some(err) => Err(report(err)),
            },
            Err(err) => Err(report(err)),
        }
    })
}

/// Extracts `<script lang="ts">` blocks, blanking everything else.
///
/// Returns `None` when the file has no TypeScript script block. The second
/// value is true when any block is `lang="tsx"`.
#[cfg(feature = "markup")]
pub fn extract_script_blocks(source: &str) -> Option<(String, bool)> {
    use regex::Regex;
    use std::sync::OnceLock;

    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static LANG: OnceLock<Regex> = OnceLock::new();
    // Hardcoded patterns
    let script = SCRIPT.get_or_init(|| {
        Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid script pattern")
    });
    let lang = LANG.get_or_init(|| {
        Regex::new(r#"(?i)\blang\s*=\s*["']?(tsx?)["']?"#).expect("valid lang pattern")
    });

    let mut ranges = Vec::new();
    let mut tsx = false;
    for caps in script.captures_iter(source) {
        let (Some(attrs), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if let Some(kind) = lang.captures(attrs.as_str()).and_then(|c| c.get(1)) {
            tsx |= kind.as_str().eq_ignore_ascii_case("tsx");
            ranges.push(body.range());
        }
    }

    if ranges.is_empty() {
        return None;
    }

    let mut blanked = String::with_capacity(source.len());
    let mut next = ranges.iter().peekable();
    for (offset, ch) in source.char_indices() {
        while next.peek().is_some_and(|r| offset >= r.end) {
            next.next();
        }
        let inside = next.peek().is_some_and(|r| r.contains(&offset));
        if inside || ch == '\n' {
            blanked.push(ch);
        } else {
            blanked.push(' ');
        }
    }

    Some((blanked, tsx))
}

/// Parses already-read source text; markup dispatch happens on the extension.
pub fn parse_source_text(path: &Path, source: &str) -> InlineResult<ParseResult> {
    match source_kind(path) {
        SourceKind::Script { tsx } => {
            let module = parse_typescript(path, source, tsx)?;
            Ok(ParseResult::Parsed(ModuleInfo::from_module(path, &module)))
        }
        #[cfg(feature = "markup")]
        SourceKind::Markup => match extract_script_blocks(source) {
            Some((script, tsx)) => {
                let module = parse_typescript(path, &script, tsx)?;
                Ok(ParseResult::Parsed(ModuleInfo::from_module(path, &module)))
            }
            None => Ok(ParseResult::Skipped(
                path.to_path_buf(),
                "no lang=\"ts\" script block".to_string(),
            )),
        },
        #[cfg(not(feature = "markup"))]
        SourceKind::Markup => Ok(ParseResult::Skipped(
            path.to_path_buf(),
            "markup support disabled".to_string(),
        )),
    }
}

/// Like [`parse_source_text`], with skipped files as `None`.
pub fn parse_source(path: &Path, source: &str) -> InlineResult<Option<ModuleInfo>> {
    match parse_source_text(path, source)? {
        ParseResult::Parsed(info) => Ok(Some(info)),
        ParseResult::Skipped(_, _) => Ok(None),
    }
}

/// Parses a single file. This is the atomic unit of work for parallel processing.
pub fn parse_single_module(path: &Path) -> InlineResult<ParseResult> {
    let metadata = fs::metadata(path).with_path(path)?;
    if metadata.len() > MAX_FILE_SIZE as u64 {
        return Err(InlineError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "file too large ({} bytes, max {})",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
            ),
        ));
    }

    let content = fs::read_to_string(path).with_path(path)?;
    parse_source_text(path, &content)
}

/// Parses all files in parallel, failing on the first error.
///
/// Skipped files are logged. The result is sorted by path.
pub fn parse_modules(files: &[PathBuf]) -> InlineResult<Vec<ModuleInfo>> {
    let results: Vec<InlineResult<ParseResult>> = files
        .par_iter()
        .map(|path| parse_single_module(path))
        .collect();

    let mut modules = Vec::with_capacity(results.len());
    for result in results {
        match result? {
            ParseResult::Parsed(info) => modules.push(info),
            ParseResult::Skipped(path, reason) => {
                warn!(path = %path.display(), reason = %reason, "skipping file");
            }
        }
    }

    modules.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(modules)
}
