//! lua-doc-extractor: generate Lua declaration stubs from `/***` doc comments.
//!
//! Two modes:
//!
//! - **stdin mode**: `lua-doc-extractor < file.cpp`
//! - **file mode**: `lua-doc-extractor -o library src/*.cpp [--file lib.lua] [--repo URL]`

mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use lua_doc_extractor::{add_header, format_docs, get_docs, process_docs, Diagnostics, Doc};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "lua-doc-extractor",
    version,
    about = "Generate Lua declaration stubs from doc comments in C/C++ source files",
    after_help = "Run from the root of your project so that source paths in headers and repository links are correct."
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long, visible_alias = "dest")]
    output: Option<PathBuf>,

    /// Write all docs into a single file with this name inside the output
    /// directory, merging tables across inputs.
    #[arg(long)]
    file: Option<String>,

    /// Repository root URL used for source links, e.g.
    /// https://github.com/<user>/<repository>/blob/<commit>/
    #[arg(long)]
    repo: Option<String>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one source from stdin, write the Lua library to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let docs = extract(&input, "stdin").context("failed to extract docs from stdin")?;
    print!("{}", render(docs, cli.repo.as_deref(), &[]));
    Ok(())
}

/// file mode: extract every input, then write one library per input or a
/// single merged library.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    let mut extracted: Vec<(String, Vec<Doc>)> = Vec::new();
    let mut failed = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let source = path.to_string_lossy().replace('\\', "/");
        match extract(&content, &source) {
            Some(docs) => extracted.push((source, docs)),
            None => failed.push(source),
        }
    }

    let repo = cli.repo.as_deref();
    match &cli.file {
        Some(name) => {
            let sources: Vec<String> = extracted.iter().map(|(s, _)| s.clone()).collect();
            let docs: Vec<Doc> = extracted.into_iter().flat_map(|(_, docs)| docs).collect();
            write_library(&output_dir.join(name), &render(docs, repo, &sources))?;
        }
        None => {
            for (source, docs) in extracted {
                let out_path = output_dir.join(format!("{}.lua", derive_output_name(&source)));
                let lua = render(docs, repo, std::slice::from_ref(&source));
                write_library(&out_path, &lua)?;
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("failed to extract docs from: {}", failed.join(", "));
    }
    Ok(())
}

/// Extract the docs of one source, logging its problems.
///
/// Returns `None` when the file could not be scanned at all.
fn extract(source: &str, path: &str) -> Option<Vec<Doc>> {
    let mut diagnostics = Diagnostics::new();
    let result = get_docs(source, path, &mut diagnostics);
    let mut problems = report(Some(path), &mut diagnostics);

    match result {
        Err(e) => {
            error!("✘ {}: {}", path, e);
            None
        }
        Ok(file) => {
            for e in &file.errors {
                warn!("{}: {}", path, e);
            }
            problems += file.errors.len();
            if problems == 0 {
                info!("✔ {}", path);
            } else {
                warn!("⚠ {} ({} problem(s))", path, problems);
            }
            Some(file.docs)
        }
    }
}

/// Process and format docs into a complete Lua library file.
fn render(docs: Vec<Doc>, repo: Option<&str>, sources: &[String]) -> String {
    let mut diagnostics = Diagnostics::new();
    let docs = process_docs(docs, repo, &mut diagnostics);
    report(None, &mut diagnostics);
    add_header(&format_docs(&docs), sources)
}

fn write_library(out_path: &Path, lua: &str) -> Result<()> {
    fs::write(out_path, lua)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    info!("wrote {}", out_path.display());
    Ok(())
}

/// Log collected warnings; returns how many there were.
fn report(path: Option<&str>, diagnostics: &mut Diagnostics) -> usize {
    let warnings = diagnostics.drain();
    for warning in &warnings {
        match path {
            Some(path) => warn!("{}: {}", path, warning),
            None => warn!("{}", warning),
        }
    }
    warnings.len()
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c", "h", "hpp", "hh", "hxx"];

/// Resolve every input argument to source files, sorted and deduplicated.
///
/// An argument may name a file, a directory (its C/C++ sources, one level
/// deep) or a glob pattern.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        files.extend(resolve_input(pattern)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn resolve_input(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        return sources_in(path);
    }

    let matches: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .flatten()
        .filter(|p| p.is_file())
        .collect();
    if matches.is_empty() {
        warn!("no files matched: {}", pattern);
    }
    Ok(matches)
}

fn sources_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_supported_extension(p))
        .collect())
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Output file name (without extension) for a source path.
/// "src/LuaUnsyncedCtrl.cpp" → "LuaUnsyncedCtrl"
fn derive_output_name(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}
