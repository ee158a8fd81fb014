//! constinline CLI - cross-module const enum inlining for TypeScript builds.
//!
//! Hosts the analysis for pipelines that cannot link the library:
//! - `table` prints the replacement table (plain or JSON)
//! - `transform` applies the source-load hook to files
//! - `digest` prints the table digest for cache keys

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

use constinline_core::{
    init_structured_logging, render_json, render_plain, ConstInline, Session,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inline TypeScript const enum members across modules")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a project and print its replacement table
    Table {
        /// Project root (constinline.toml and tsconfig.json are read from here)
        #[arg(default_value = ".")]
        root: String,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output the table as JSON
        #[arg(long)]
        json: bool,

        /// Write the output to FILE (relative path) instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },

    /// Rewrite const enum references in files
    Transform {
        /// Files to transform
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Project root
        #[arg(long, default_value = ".")]
        root: String,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Rewrite files in place instead of printing them
        #[arg(long)]
        write: bool,
    },

    /// Print the SHA-256 digest of the replacement table
    Digest {
        /// Project root
        #[arg(default_value = ".")]
        root: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

/// Settings that override constinline.toml.
#[derive(clap::Args, Debug, Default)]
struct AnalysisArgs {
    /// Glob for source files, relative to the source directory
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// tsconfig providing `paths` aliases
    #[arg(long, value_name = "FILE")]
    tsconfig: Option<PathBuf>,

    /// Do not substitute references to enums declared in the same file
    #[arg(long)]
    no_inline_local: bool,
}

fn analyze(root: &str, args: &AnalysisArgs) -> Result<Session> {
    let mut builder = ConstInline::from_config(root)
        .with_context(|| format!("Failed to load configuration from: {}", root))?;
    if let Some(pattern) = &args.pattern {
        builder = builder.file_pattern(pattern.clone());
    }
    if let Some(tsconfig) = &args.tsconfig {
        builder = builder.tsconfig(tsconfig.clone());
    }
    if args.no_inline_local {
        builder = builder.inline_local(false);
    }
    builder
        .analyze()
        .with_context(|| format!("Analysis failed for: {}", root))
}

/// Validates an output path to prevent path traversal attacks.
///
/// Returns the validated PathBuf or an error.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    // Security: Check for null bytes (path injection)
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);

    if p.is_absolute() {
        return Err(anyhow!(
            "Output path must be relative, not absolute: {}",
            path
        ));
    }

    for component in p.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(anyhow!(
                "Path traversal (..) not allowed in output paths: {}",
                path
            ));
        }
    }

    Ok(p)
}

fn run_table(session: &Session, json: bool, out: Option<&str>) -> Result<()> {
    let text = if json {
        let mut text = render_json(session.table())?;
        text.push('\n');
        text
    } else {
        render_plain(session.table())
    };

    match out {
        Some(out) => {
            let path = validate_output_path(out)?;
            fs::write(&path, text)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            eprintln!("Table written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Transformed text of each file, `None` when the hook passes it through.
fn transform_files(session: &Session, files: &[PathBuf]) -> Result<Vec<(PathBuf, Option<String>)>> {
    files
        .par_iter()
        .map(|file| {
            let out = session
                .transform_file(file)
                .with_context(|| format!("Failed to transform: {}", file.display()))?;
            Ok((file.clone(), out))
        })
        .collect()
}

fn run_transform(session: &Session, files: &[PathBuf], write: bool) -> Result<()> {
    let results = transform_files(session, files)?;

    if write {
        let mut rewritten = 0;
        for (path, out) in &results {
            let Some(out) = out else { continue };
            let original = fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            if *out != original {
                fs::write(path, out)
                    .with_context(|| format!("Failed to write: {}", path.display()))?;
                rewritten += 1;
            }
        }
        eprintln!("Rewrote {} of {} files", rewritten, results.len());
        return Ok(());
    }

    let many = results.len() > 1;
    for (path, out) in results {
        let text = match out {
            Some(text) => text,
            None => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read: {}", path.display()))?,
        };
        if many {
            println!("==> {} <==", path.display());
        }
        print!("{}", text);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] constinline internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 101.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Table {
            root,
            analysis,
            json,
            out,
        } => {
            let session = analyze(&root, &analysis)?;
            run_table(&session, json, out.as_deref())
        }
        Command::Transform {
            files,
            root,
            analysis,
            write,
        } => {
            let session = analyze(&root, &analysis)?;
            run_transform(&session, &files, write)
        }
        Command::Digest { root, analysis } => {
            let session = analyze(&root, &analysis)?;
            println!("{}", session.table().digest()?);
            Ok(())
        }
    }
}
