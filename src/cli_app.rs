//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use folio::catalog::ProjectCatalog;
use folio::core::config::Config;
use folio::core::errors::FolioError;
use folio::logger::{ActivitySink, JsonlConfig, JsonlWriter, MemorySink};
use folio::storage::{FileStore, KeyValueStore, MemoryStore, ThemeLoad, load_theme, persist_theme};
use folio::ui::gallery::{CategoryFilter, GalleryView, SearchPanel, SortMode};
use folio::ui::render::{RecordingSurface, RenderOp};
use folio::ui::runtime::Session;
use folio::ui::script::{Step, parse_script};

/// folio: portfolio page interaction engine.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    author,
    version,
    about = "Portfolio page interaction engine",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override catalog file path.
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List catalog projects.
    Catalog,
    /// Show the gallery's visible set for a query.
    Search(SearchArgs),
    /// Replay an event script against a recording session.
    Replay(ReplayArgs),
    /// Show or flip the persisted theme preference.
    Theme(ThemeArgs),
    /// Print the effective configuration.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct SearchArgs {
    /// Case-insensitive search text.
    query: String,
    /// Category filter (`all` for every category).
    #[arg(long, default_value = "all", value_name = "CATEGORY")]
    category: String,
    /// Title ordering: none, asc, or desc.
    #[arg(long, default_value = "none", value_parser = parse_sort_mode)]
    sort: SortMode,
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Script file, one event per line.
    script: PathBuf,
    /// Fixed seed for shuffle.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Theme store file; in-memory when omitted.
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
    /// Print the activity log after the render ops.
    #[arg(long)]
    log: bool,
    /// Append activity entries to a JSONL file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ThemeArgs {
    /// Flip and persist the theme.
    #[arg(long)]
    toggle: bool,
    /// Theme store file; defaults to the configured storage path.
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<FolioError> for CliError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::Io { .. } | FolioError::StorageUnavailable { .. } => {
                Self::Runtime(err.to_string())
            }
            FolioError::Serialization { .. } => Self::Internal(err.to_string()),
            _ => Self::User(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Catalog => run_catalog(cli),
        Command::Search(args) => run_search(cli, args),
        Command::Replay(args) => run_replay(cli, args),
        Command::Theme(args) => run_theme(cli, args),
        Command::Config => run_config(cli),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn parse_sort_mode(raw: &str) -> Result<SortMode, String> {
    SortMode::parse(raw).ok_or_else(|| format!("expected none, asc, or desc; got {raw:?}"))
}

// ──────────────────── loading ────────────────────

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Ok(Config::load(cli.config.as_deref())?)
}

/// Explicit `--catalog` must exist; the configured default may be absent,
/// in which case the catalog is empty.
fn load_catalog(cli: &Cli, config: &Config) -> Result<ProjectCatalog, CliError> {
    match &cli.catalog {
        Some(path) => Ok(ProjectCatalog::load(path)?),
        None if config.paths.catalog_file.exists() => {
            Ok(ProjectCatalog::load(&config.paths.catalog_file)?)
        }
        None => Ok(ProjectCatalog::empty()),
    }
}

// ──────────────────── commands ────────────────────

fn run_catalog(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let catalog = load_catalog(cli, &config)?;

    match output_mode(cli) {
        OutputMode::Human => {
            if catalog.is_empty() {
                println!("{}", "catalog is empty".dimmed());
            }
            for (index, project) in catalog.iter().enumerate() {
                println!(
                    "{index:>3}  {:<16} {}",
                    project.category.cyan(),
                    project.title.bold()
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "catalog",
                "projects": catalog.as_slice(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_search(cli: &Cli, args: &SearchArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let catalog = load_catalog(cli, &config)?;

    let mut view = GalleryView::new(catalog.len(), &config.search);
    view.apply_category(CategoryFilter::from_label(&args.category), &catalog);
    view.apply_query(&args.query, &catalog);
    view.sort(args.sort, &catalog);
    let visible = view.visible(&catalog);
    let panel = view.search_panel(&catalog);

    match output_mode(cli) {
        OutputMode::Human => {
            if visible.is_empty() {
                println!("{}", "No results".yellow());
            }
            for index in &visible {
                if let Some(project) = catalog.get(*index) {
                    println!("{index:>3}  {}", project.title.bold());
                }
            }
            if let SearchPanel::Hits(hits) = &panel {
                println!();
                println!("{}", "search results".underline());
                for hit in hits {
                    println!("{:>3}  {}  {}", hit.index, hit.title, hit.excerpt.dimmed());
                }
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "search",
                "query": args.query,
                "category": args.category,
                "sort": args.sort.as_str(),
                "visible": visible,
                "panel": panel,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_replay(cli: &Cli, args: &ReplayArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let catalog = load_catalog(cli, &config)?;
    let source = fs::read_to_string(&args.script)
        .map_err(|source| CliError::from(FolioError::io(&args.script, source)))?;
    let steps = parse_script(&source)?;

    let sink = match &args.store {
        Some(path) => replay_with(cli, args, &config, catalog, FileStore::new(path), &steps)?,
        None => replay_with(cli, args, &config, catalog, MemoryStore::new(), &steps)?,
    };

    if let Some(path) = &args.log_file {
        let mut writer = JsonlWriter::open(JsonlConfig::at(path));
        for entry in sink.entries() {
            writer.record(entry.clone());
        }
        writer.flush();
    }

    if args.log {
        match output_mode(cli) {
            OutputMode::Human => {
                for entry in sink.entries() {
                    println!("{}", serde_json::to_string(entry)?.dimmed());
                }
            }
            OutputMode::Json => {
                for entry in sink.entries() {
                    write_json_line(&json!({ "log": entry }))?;
                }
            }
        }
    }
    Ok(())
}

fn replay_with<K: KeyValueStore>(
    cli: &Cli,
    args: &ReplayArgs,
    config: &Config,
    catalog: ProjectCatalog,
    store: K,
    steps: &[Step],
) -> Result<MemorySink, CliError> {
    let surface = RecordingSurface::new();
    let sink = MemorySink::new();
    let mut session = match args.seed {
        Some(seed) => Session::with_seed(catalog, config, surface, store, sink, seed),
        None => Session::new(catalog, config, surface, store, sink),
    };
    let mode = output_mode(cli);

    session.start();
    print_ops(mode, session.now(), &session.surface_mut().take())?;
    for step in steps {
        match step {
            Step::Dispatch(msg) => session.dispatch(msg.clone()),
            Step::Wait(duration) => session.advance(*duration),
        }
        print_ops(mode, session.now(), &session.surface_mut().take())?;
    }

    let (_, _, sink) = session.into_parts();
    Ok(sink)
}

fn print_ops(mode: OutputMode, at: Duration, ops: &[RenderOp]) -> Result<(), CliError> {
    let at_ms = u64::try_from(at.as_millis()).unwrap_or(u64::MAX);
    for op in ops {
        match mode {
            OutputMode::Human => {
                let value = serde_json::to_value(op)?;
                let name = value
                    .get("op")
                    .and_then(Value::as_str)
                    .unwrap_or("op")
                    .to_string();
                println!(
                    "{:>7}  {:<16} {}",
                    format!("{at_ms}ms").dimmed(),
                    name.green(),
                    op_fields(&value)
                );
            }
            OutputMode::Json => write_json_line(&json!({ "t_ms": at_ms, "op": op }))?,
        }
    }
    Ok(())
}

/// Compact rendering of an op's payload without the tag.
fn op_fields(value: &Value) -> String {
    match value.as_object() {
        Some(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "op")
            .map(|(key, field)| format!("{key}={field}"))
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

fn run_theme(cli: &Cli, args: &ThemeArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let path = args
        .store
        .clone()
        .unwrap_or_else(|| config.storage.path.clone());
    let mut store = FileStore::new(&path);
    let key = config.storage.theme_key.as_str();

    let loaded = load_theme(&store, key);
    if let ThemeLoad::Unavailable { details } = &loaded {
        return Err(CliError::Runtime(format!(
            "theme store {} unreadable: {details}",
            path.display()
        )));
    }
    let mut theme = loaded.theme();
    if args.toggle {
        theme = theme.toggled();
        persist_theme(&mut store, key, theme)?;
    }

    match output_mode(cli) {
        OutputMode::Human => {
            let label = if theme.is_dark() {
                theme.as_str().bright_white().on_black()
            } else {
                theme.as_str().black().on_white()
            };
            println!("{label}");
            if let ThemeLoad::Invalid { raw } = &loaded {
                eprintln!("{} ignored stored value {raw:?}", "warning:".yellow());
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "theme",
                "store": path.to_string_lossy(),
                "theme": theme,
                "toggled": args.toggle,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_config(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    match output_mode(cli) {
        OutputMode::Human => println!("{}", config.to_toml()?),
        OutputMode::Json => {
            let payload = json!({
                "command": "config",
                "config": serde_json::to_value(&config)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

// ──────────────────── output ────────────────────

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("FOLIO_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
