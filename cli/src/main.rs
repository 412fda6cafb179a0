use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use netlog_cli::commands::{self, SplitOptions, SplitRange};
use netlog_types::SplitMode;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Split and filter network combat logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every zone change in a log
    Zones {
        file: PathBuf,
        /// Extra TOML definitions (file or directory)
        #[arg(long)]
        registry: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Extract one encounter into a self-contained log
    Split {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Zone ordinal as listed by `zones`
        #[arg(long, conflicts_with_all = ["start_line", "stop_line"])]
        zone: Option<usize>,
        /// 1-based line number of the first line
        #[arg(long, requires = "stop_line")]
        start_line: Option<usize>,
        /// 1-based line number of the last line (inclusive)
        #[arg(long, requires = "start_line")]
        stop_line: Option<usize>,
        /// Keep only lines useful for encounter analysis
        #[arg(long)]
        analysis: bool,
        /// Do not carry global lines into the excerpt
        #[arg(long)]
        no_globals: bool,
        #[arg(long)]
        registry: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Run the analysis filter over whole files
    Filter {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Defaults to the configured output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        registry: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Write the active line definitions to a TOML file
    Defs {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        registry: Option<PathBuf>,
    },
    /// Show or change persisted defaults
    Config {
        #[arg(long)]
        mode: Option<Mode>,
        #[arg(long)]
        include_globals: Option<bool>,
        #[arg(long)]
        definitions_dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    Replay,
    Analysis,
}

impl From<Mode> for SplitMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Replay => SplitMode::Replay,
            Mode::Analysis => SplitMode::Analysis,
        }
    }
}

/// Log to stderr, `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match respond(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn respond(cli: Cli) -> Result<(), String> {
    let mut settings = netlog_cli::load_settings();

    match cli.command {
        Commands::Zones {
            file,
            registry,
            json,
        } => {
            let registry = commands::load_registry(&settings, registry.as_deref())?;
            commands::list_zones(&file, &registry, json)
        }
        Commands::Split {
            file,
            output,
            zone,
            start_line,
            stop_line,
            analysis,
            no_globals,
            registry,
            json,
        } => {
            let range = match (zone, start_line, stop_line) {
                (Some(ordinal), _, _) => SplitRange::Zone(ordinal),
                (None, Some(start), Some(stop)) => SplitRange::Lines { start, stop },
                _ => SplitRange::Whole,
            };
            let options = SplitOptions::from_settings(range, &settings, analysis, no_globals);
            let registry = commands::load_registry(&settings, registry.as_deref())?;
            commands::split(&file, &output, &options, Arc::new(registry), json)
        }
        Commands::Filter {
            files,
            out_dir,
            registry,
            json,
        } => {
            let out_dir = out_dir
                .or_else(|| settings.output_dir.clone())
                .ok_or("no --out-dir given and no output directory configured")?;
            let registry = commands::load_registry(&settings, registry.as_deref())?;
            commands::filter_files(&files, &out_dir, Arc::new(registry), json)
        }
        Commands::Defs { output, registry } => {
            let registry = commands::load_registry(&settings, registry.as_deref())?;
            commands::dump_definitions(&registry, &output)
        }
        Commands::Config {
            mode,
            include_globals,
            definitions_dir,
            output_dir,
        } => {
            let changed = mode.is_some()
                || include_globals.is_some()
                || definitions_dir.is_some()
                || output_dir.is_some();
            if let Some(mode) = mode {
                settings.mode = mode.into();
            }
            if let Some(include_globals) = include_globals {
                settings.include_globals = include_globals;
            }
            if definitions_dir.is_some() {
                settings.custom_definitions_dir = definitions_dir;
            }
            if output_dir.is_some() {
                settings.output_dir = output_dir;
            }
            if changed {
                netlog_cli::store_settings(&settings)?;
            }
            commands::show_settings(&settings)
        }
    }
}
