//! pinout-docs: text pinout documents from KiCad symbol libraries
//!
//! Reads the configured symbol repositories and writes one document per
//! component and package, or reports on what the libraries contain.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use pinout_docs::analyze::{Census, OutputFormat, ReportKind};
use pinout_docs::catalog::{load_library, Catalog, Repository, UNKNOWN_REVISION};
use pinout_docs::config::{self, Config};
use pinout_docs::error::error_chain;
use pinout_docs::part::Provenance;
use pinout_docs::render::Renderer;
use pinout_docs::resolver::ComponentResolver;

type CliResult = Result<ExitCode, Box<dyn Error>>;

/// Generate readable pinout documents from KiCad symbol libraries.
#[derive(Parser, Debug)]
#[command(name = "pinout-docs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a document for every part in every configured repository
    Generate {
        /// Output directory (overrides the configuration)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Resolve and list document paths without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the entries of a library
    List {
        /// Library path, or library name in a configured repository
        library: String,
    },

    /// Resolve one library entry and print its parts as JSON
    Show {
        /// Library path, or library name in a configured repository
        library: String,

        /// Entry name
        part: String,
    },

    /// Find an entry in any repository and print its raw record as JSON
    Inspect {
        /// Entry name
        part: String,
    },

    /// Print a census report over every library
    Analyze {
        /// Report to produce
        #[arg(value_enum)]
        report: ReportKind,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config_or_default(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if let Some(source) = e.source() {
                eprintln!("  caused by: {source}");
            }
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        repositories = cfg.repositories.len(),
        "Configuration loaded"
    );

    let result = match args.command {
        Command::Generate { output, dry_run } => run_generate(&cfg, output, dry_run),
        Command::List { library } => run_list(&cfg, &library),
        Command::Show { library, part } => run_show(&cfg, &library, &part),
        Command::Inspect { part } => run_inspect(&cfg, &part),
        Command::Analyze { report, format } => run_analyze(&cfg, report, format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn configured_catalog(cfg: &Config) -> Result<Catalog, Box<dyn Error>> {
    if cfg.repositories.is_empty() {
        let hint = config::default_config_path()
            .map(|p| format!(" (expected in {})", p.display()))
            .unwrap_or_default();
        return Err(format!("no repositories configured{hint}").into());
    }
    Ok(Catalog::from_config(cfg))
}

fn run_generate(cfg: &Config, output: Option<PathBuf>, dry_run: bool) -> CliResult {
    let registry = cfg.registry()?;
    let catalog = configured_catalog(cfg)?;
    let renderer = Renderer::from_config(&cfg.output)?;
    let directory = output.unwrap_or_else(|| cfg.output.directory.clone());

    let report = catalog.resolve_all(&registry);
    let batch = &report.batch;

    let mut written = 0_usize;
    let mut render_failures = 0_usize;
    for part in &batch.parts {
        if dry_run {
            println!("{}", renderer.document_path(&directory, part).display());
            continue;
        }

        match renderer.write(&directory, part) {
            Ok(path) => {
                debug!(path = %path.display(), "Document written");
                written += 1;
            }
            Err(e) => {
                warn!(part = %part.part_id, error = %error_chain(&e), "Document not written");
                render_failures += 1;
            }
        }
    }

    info!(directory = %directory.display(), "Generation finished");
    println!(
        "{} parts: {written} written, {} skipped, {} failed, {} overridden, \
         {} unreadable libraries, {} unreadable repositories",
        batch.parts.len(),
        batch.skipped,
        batch.failures.len() + report.collisions.len() + render_failures,
        report.overridden,
        report.broken_libraries.len(),
        report.unreadable_repositories.len(),
    );

    Ok(if render_failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_list(cfg: &Config, library: &str) -> CliResult {
    let catalog = Catalog::from_config(cfg);
    let path = catalog.locate_library(library)?;
    let lib = load_library(&path)?;

    let mut out = std::io::stdout().lock();
    for name in lib.names() {
        writeln!(out, "{name}")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_show(cfg: &Config, library: &str, part: &str) -> CliResult {
    let registry = cfg.registry()?;
    let catalog = Catalog::from_config(cfg);
    let path = catalog.locate_library(library)?;
    let lib = load_library(&path)?;

    let symbol = lib
        .get(part)
        .ok_or_else(|| format!("'{part}' is not in {}", path.display()))?;

    let resolver = ComponentResolver::new(&registry, provenance_for(&catalog, &path));
    let parts = resolver.resolve(symbol, &lib)?;
    if parts.is_empty() {
        eprintln!("'{part}' has no registered package or no meaningful pin labels");
    }

    println!("{}", serde_json::to_string_pretty(&parts)?);
    Ok(ExitCode::SUCCESS)
}

fn run_inspect(cfg: &Config, part: &str) -> CliResult {
    let catalog = configured_catalog(cfg)?;
    let Some((path, symbol)) = catalog.find_symbol(part)? else {
        return Err(format!("'{part}' not found in any repository").into());
    };

    eprintln!("Found in {}", path.display());
    println!("{}", serde_json::to_string_pretty(&symbol)?);
    Ok(ExitCode::SUCCESS)
}

fn run_analyze(cfg: &Config, report: ReportKind, format: OutputFormat) -> CliResult {
    let catalog = configured_catalog(cfg)?;
    let mut census = Census::new();

    for repo in catalog.repositories() {
        let paths = match repo.library_paths() {
            Ok(paths) => paths,
            Err(e) => {
                warn!(error = %error_chain(&e), "Skipping repository");
                continue;
            }
        };
        for path in paths {
            match load_library(&path) {
                Ok(lib) => census.add_library(&library_stem(&path), &lib),
                Err(e) => warn!(error = %error_chain(&e), "Skipping library"),
            }
        }
    }

    census
        .report(report)
        .write(format, std::io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}

/// Provenance for a library, from its repository when it lives in one.
fn provenance_for(catalog: &Catalog, library: &Path) -> Provenance {
    catalog.repository_of(library).map_or_else(
        || Provenance::new(library.display().to_string(), "", UNKNOWN_REVISION),
        Repository::provenance,
    )
}

fn library_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
