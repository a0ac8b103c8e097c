use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpm_tui::config::Config;
use gpm_tui::transport::{cli, OutputFormat};

#[derive(Parser)]
#[command(name = "gpm")]
#[command(author, version, about = "Gatekeeper Policy Manager - terminal dashboard for constraints and violations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Policy manager base URL (overrides config and GPM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Cluster context to use
    #[arg(long, global = true)]
    context: Option<String>,

    /// Path to an alternative config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive constraints dashboard (default)
    Dashboard {
        /// Start route, optionally with a fragment (e.g. /constraints#my-constraint)
        #[arg(long)]
        route: Option<String>,

        /// Constraint to scroll to once loaded
        #[arg(long)]
        anchor: Option<String>,
    },

    /// Print the constraints of a context
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Download the HTML violations report
    Report {
        /// Destination file (default: gpm-violations-<timestamp>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End the backend session
    Logout,

    /// List available cluster contexts
    Contexts,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(context) = &cli.context {
        config.contexts.current = context.clone();
    }
    Ok(config)
}

/// Log to a file while the dashboard owns the terminal, to stderr otherwise
fn init_logging(verbose: bool, dashboard: bool) -> Result<()> {
    let filter = if verbose {
        "gpm_tui=debug,gpm=debug"
    } else {
        "gpm_tui=info,gpm=info"
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if dashboard {
        let log_path = Config::log_dir()?.join("gpm.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dashboard = matches!(cli.command, None | Some(Commands::Dashboard { .. }));
    init_logging(cli.verbose, dashboard)?;
    let config = load_config(&cli)?;

    match cli.command {
        None => cli::run_dashboard(&config, None, None).await?,
        Some(Commands::Dashboard { route, anchor }) => {
            cli::run_dashboard(&config, route, anchor).await?;
        }
        Some(Commands::List { format }) => cli::run_list(&config, format).await?,
        Some(Commands::Report { output }) => cli::run_report(&config, output).await?,
        Some(Commands::Logout) => cli::run_logout(&config).await?,
        Some(Commands::Contexts) => cli::run_contexts(&config).await?,
    }

    Ok(())
}
