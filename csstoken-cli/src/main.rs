//! Command-line interface for csstoken
//! Builds the token index from the configured declaration files and checks, fixes or
//! searches stylesheets against it.
//!
//! Usage:
//!   csstoken [--root `<dir>`] [--config `<file>`] index            - Print the index as JSON
//!   csstoken ... check `<paths>...`                               - Report duplicated colors
//!   csstoken ... fix `<paths>...` [--write]                       - Replace them with tokens
//!   csstoken ... search [`<query>`]                               - List matching tokens

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use csstoken::range::SourceLocation;
use csstoken::{
    apply_edits, auto_replace_edits, load_variables, scan_literals, DeclarationSources,
    DocumentKind, VariableMapping,
};
use csstoken_config::{ConfigError, Loader};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot serialize index: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot determine working directory: {0}")]
    CurrentDir(#[source] io::Error),
}

fn cli() -> Command {
    let paths = Arg::new("paths")
        .help("Stylesheets or components to process")
        .required(true)
        .num_args(1..)
        .value_parser(clap::value_parser!(PathBuf));

    Command::new("csstoken")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find hard-coded CSS values that duplicate design tokens")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .global(true)
                .help("Root that declaration paths are relative to [default: current directory]")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Settings file layered over the project's .csstoken.toml")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand(Command::new("index").about("Print the index as JSON"))
        .subcommand(
            Command::new("check")
                .about("Report color literals that already have a token")
                .arg(paths.clone()),
        )
        .subcommand(
            Command::new("fix")
                .about("Replace duplicated color literals with their first token")
                .arg(paths)
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Rewrite files in place instead of printing the result")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("List tokens whose name or value contains the query")
                .arg(Arg::new("query").help("Case-insensitive filter").index(1)),
        )
}

fn main() {
    csstoken::logging::init_tracing();
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<i32, CliError> {
    let root = match matches.get_one::<PathBuf>("root") {
        Some(root) => root.clone(),
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };
    let sources = load_sources(&root, matches.get_one::<PathBuf>("config"))?;
    if !sources.is_configured() {
        warn!("no declaration sources configured; set variables_files or variables_directory");
    }
    let mapping = load_variables(&sources.resolve());
    debug!(values = mapping.len(), "token index built");

    match matches.subcommand() {
        Some(("index", _)) => handle_index_command(&mapping),
        Some(("check", sub)) => handle_check_command(&mapping, paths(sub)),
        Some(("fix", sub)) => handle_fix_command(&mapping, paths(sub), sub.get_flag("write")),
        Some(("search", sub)) => {
            let query = sub.get_one::<String>("query").map(String::as_str);
            handle_search_command(&mapping, query.unwrap_or_default());
            Ok(0)
        }
        _ => Ok(2),
    }
}

fn load_sources(root: &Path, config: Option<&PathBuf>) -> Result<DeclarationSources, CliError> {
    let mut loader = Loader::new().with_project_file(root);
    if let Some(config) = config {
        loader = loader.with_file(config);
    }
    let settings = loader.build()?;
    Ok(settings.sources(Some(root.to_path_buf())))
}

fn paths(matches: &ArgMatches) -> Vec<PathBuf> {
    matches
        .get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default()
}

fn document_kind(path: &Path) -> Option<DocumentKind> {
    let kind = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentKind::from_extension);
    if kind.is_none() {
        eprintln!("Skipping {}: unsupported file type", path.display());
    }
    kind
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Handle the index command
fn handle_index_command(mapping: &VariableMapping) -> Result<i32, CliError> {
    println!("{}", serde_json::to_string_pretty(mapping)?);
    Ok(0)
}

/// Handle the check command: exit code 1 when any literal is reported
fn handle_check_command(mapping: &VariableMapping, paths: Vec<PathBuf>) -> Result<i32, CliError> {
    let mut total = 0;
    for path in paths {
        let Some(kind) = document_kind(&path) else {
            continue;
        };
        let text = read(&path)?;
        let report = scan_literals(&text, kind, mapping);
        if let Some(halt) = &report.halted {
            debug!(path = %path.display(), line = halt.line, value = %halt.value, "scan halted");
        }
        let locator = SourceLocation::new(&text);
        for found in &report.matches {
            let position = locator.byte_to_position(found.span.start);
            println!(
                "{}:{}:{}: {}",
                path.display(),
                position.line + 1,
                position.column + 1,
                found.message()
            );
        }
        total += report.matches.len();
    }
    Ok(if total > 0 { 1 } else { 0 })
}

/// Handle the fix command
fn handle_fix_command(
    mapping: &VariableMapping,
    paths: Vec<PathBuf>,
    write: bool,
) -> Result<i32, CliError> {
    for path in paths {
        let Some(kind) = document_kind(&path) else {
            continue;
        };
        let text = read(&path)?;
        let edits = auto_replace_edits(&text, kind, mapping);
        let fixed = apply_edits(&text, &edits);
        if !write {
            print!("{}", fixed);
            continue;
        }
        if !edits.is_empty() {
            fs::write(&path, fixed).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
        }
        println!("{}: {} replaced", path.display(), edits.len());
    }
    Ok(0)
}

/// Handle the search command
fn handle_search_command(mapping: &VariableMapping, query: &str) {
    for entry in mapping.search(query) {
        println!("{}\t{}", entry.name, entry.value);
    }
}
