//! genf: password-based file encryption into `.ge` containers
//!
//! Commands:
//!   encrypt <paths>...  - encrypt files (directories are scanned recursively)
//!   decrypt <paths>...  - decrypt `.ge` containers
//!   run [paths]...      - drag-and-drop mode: classify by suffix, confirm, go
//!   menu [dir]          - interactive menu over a working directory
//!   config show         - display current configuration
//!
//! With no command, genf opens the menu on the configured working directory.

mod menu;
mod progress;
mod prompt;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use genf_batch::resolve_args;
use genf_core::config::{expand_tilde, GenfConfig};
use genf_core::Direction;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::session::Session;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "genf",
    version,
    about = "Encrypt and decrypt files with a password",
    long_about = "genf: chunked XChaCha20-Poly1305 file encryption with Argon2id password hashing"
)]
struct Cli {
    /// Path to config.toml
    #[arg(
        long,
        short = 'c',
        env = "GENF_CONFIG",
        default_value = "~/.config/genf/config.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "GENF_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "GENF_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt files into `<name>.ge` containers next to them
    Encrypt {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Decrypt `.ge` containers back to their original names
    Decrypt {
        /// Containers or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Encrypt plain files and decrypt `.ge` files in one go
    ///
    /// A directory argument becomes the working directory. Without any file
    /// arguments this opens the interactive menu there.
    Run { paths: Vec<PathBuf> },

    /// Interactive menu over a directory
    Menu {
        /// Working directory (default: config `batch.work_dir`, else current dir)
        dir: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);
    let config = GenfConfig::load(&config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = match &cli.log_format {
        Some(f) => f.clone(),
        None if config.log.format.eq_ignore_ascii_case("json") => LogFormat::Json,
        None => LogFormat::Text,
    };
    init_logging(&level, &format);
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "genf starting"
    );

    match cli.command {
        Some(Commands::Config {
            action: ConfigAction::Show,
        }) => cmd_config_show(&config, &config_path),
        Some(Commands::Encrypt { paths }) => {
            cmd_direct(&Session::new(config)?, &paths, Direction::Encrypt)
        }
        Some(Commands::Decrypt { paths }) => {
            cmd_direct(&Session::new(config)?, &paths, Direction::Decrypt)
        }
        Some(Commands::Run { paths }) => cmd_run(&Session::new(config)?, &paths),
        Some(Commands::Menu { dir }) => {
            let session = Session::new(config)?;
            let dir = session.work_dir(dir.as_deref());
            menu::run(&session, &dir)
        }
        None => {
            let session = Session::new(config)?;
            let dir = session.work_dir(None);
            menu::run(&session, &dir)
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so they never interleave with prompts on stdout
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── `genf config show` ────────────────────────────────────────────────────────

fn cmd_config_show(config: &GenfConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!(
            "# Configuration: defaults (no file at {})",
            config_path.display()
        );
    }
    println!();
    let rendered = config.to_toml().context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

// ── `genf encrypt` / `genf decrypt` ───────────────────────────────────────────

fn cmd_direct(session: &Session, paths: &[PathBuf], direction: Direction) -> Result<()> {
    let plan = session.gather(paths, direction)?;
    let summary = session.process(&plan, false)?;
    session::fail_on_errors(&summary)
}

// ── `genf run` ────────────────────────────────────────────────────────────────

fn cmd_run(session: &Session, paths: &[PathBuf]) -> Result<()> {
    let resolved = resolve_args(paths, session.scan_options());
    let plan = genf_batch::plan_jobs(&resolved.files);
    let dir = session.work_dir(resolved.work_dir.as_deref());

    if plan.is_empty() {
        return menu::run(session, &dir);
    }

    println!("{}", menu::title(&dir));
    let summary = session.process(&plan, true)?;
    if summary.succeeded + summary.failed > 0 {
        println!("Done.");
    }
    session::fail_on_errors(&summary)
}
