//! # Indigo
//!
//! The command line driver of the translator: it discovers source files,
//! runs the indented-form parser, and writes canonical-form output next to
//! the input or under `--dest`.

mod cli;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use walkdir::WalkDir;

use cli::*;
use indigo::error::ErrorList;
use indigo::formatter;
use indigo::parser::{self, ALL_ERRORS, DECLARATION_ERRORS, PARSE_COMMENTS, TRACE};
use indigo::token::FileSet;

/// Extension of indented-form sources; translation swaps it for `.go`.
const SOURCE_SUFFIX: &str = "igo";

fn main() -> anyhow::Result<()> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let failed = match &args.command {
        Commands::Compile(t) => translate(t)?,
        Commands::Build(t) => {
            let failed = translate(t)?;
            if !failed {
                info!("sources translated; build with the host toolchain");
            }
            failed
        }
        Commands::Parse(p) => parse_only(p)?,
    };

    if failed {
        std::process::exit(2);
    }
    Ok(())
}

/// Expand files and directories into the list of indented-form sources.
fn collect_sources(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
                let p = entry.path();
                if p.is_file() && p.extension().map(|e| e == SOURCE_SUFFIX).unwrap_or(false) {
                    sources.push(p.to_path_buf());
                }
            }
        } else {
            sources.push(path.clone());
        }
    }
    sources
}

/// Where the canonical form of `source` goes: same place with the suffix
/// swapped, rerooted under `dest` when given.
fn output_path(source: &Path, dest: Option<&Path>) -> PathBuf {
    let out = source.with_extension("go");
    match dest {
        None => out,
        Some(dest) => {
            let relative: PathBuf = out
                .components()
                .filter(|c| matches!(c, std::path::Component::Normal(_)))
                .collect();
            dest.join(relative)
        }
    }
}

fn report_errors(errors: &ErrorList, src: &str) {
    for err in errors {
        error!("{err}");
        debug!("\n{}", err.render(src));
    }
}

fn translate(args: &TranslateArgs) -> anyhow::Result<bool> {
    let fset = FileSet::new();
    let mut failed = false;

    for source in collect_sources(&args.paths) {
        info!("translating {}", source.display());
        let src = fs::read_to_string(&source)?;

        let mut mode = DECLARATION_ERRORS;
        if args.comments {
            mode |= PARSE_COMMENTS;
        }
        if args.trace {
            mode |= TRACE;
        }

        let (file, errors) = parser::parse_file(&fset, &source.to_string_lossy(), &src, mode);
        if !errors.is_empty() {
            report_errors(&errors, &src);
            failed = true;
            continue;
        }
        let Some(file) = file else {
            failed = true;
            continue;
        };

        let indent_unit = if args.tabs {
            "\t".to_string()
        } else {
            " ".repeat(args.tabwidth)
        };
        let output = formatter::format_file_with(&file, &indent_unit)
            .map_err(|e| anyhow::anyhow!("formatting error: {e}"))?;

        let out_path = output_path(&source, args.dest.as_deref());
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, output)?;
        info!("wrote {}", out_path.display());
    }

    Ok(failed)
}

fn parse_only(args: &ParseArgs) -> anyhow::Result<bool> {
    let fset = FileSet::new();
    let mut failed = false;

    for source in collect_sources(&args.paths) {
        info!("parsing {}", source.display());
        let src = fs::read_to_string(&source)?;

        let mut mode = PARSE_COMMENTS | DECLARATION_ERRORS | ALL_ERRORS;
        if args.trace {
            mode |= TRACE;
        }

        let (file, errors) = parser::parse_file(&fset, &source.to_string_lossy(), &src, mode);
        if !errors.is_empty() {
            report_errors(&errors, &src);
            failed = true;
        }
        if let Some(file) = file {
            debug!("parsed {} declarations", file.decls.len());
        }
    }

    if args.dump_fileset {
        println!("{}", serde_json::to_string_pretty(&fset.write())?);
    }

    Ok(failed)
}
