mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use produksi::{session, AppConfig, CompletionMode, Config, HttpProductionApi};

#[derive(Parser)]
#[command(name = "produksi")]
#[command(about = "Record and correct the finished output of production runs", long_about = None)]
struct Cli {
    /// API base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (overrides API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a production run with its materials and employee outputs
    Show {
        /// Production run id
        id: u64,
    },
    /// Record output weights and finished stock, closing the run
    Complete(commands::complete::SubmitArgs),
    /// Correct the recorded output of a completed run
    Correct(commands::complete::SubmitArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let root = std::env::current_dir().context("cannot read the current directory")?;
    let mut config = Config::init(&root)?;
    init_tracing(&config.app);

    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }
    if let Some(token) = cli.token {
        config.api.token = Some(token);
    }
    config.api.validate()?;

    let api = HttpProductionApi::new(&config.api, session::from_config(&config.api))?;

    match cli.command {
        Commands::Show { id } => commands::show::run(&api, id).await,
        Commands::Complete(args) => {
            commands::complete::run(&api, CompletionMode::Finalize, args).await
        }
        Commands::Correct(args) => {
            commands::complete::run(&api, CompletionMode::Correct, args).await
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the configured default
fn init_tracing(app: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| app.default_log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
