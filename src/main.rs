use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use sprint_planner::planner::{fallback_plan, DeepSeekClient};
use sprint_planner::{generate_plan, AppConfig, Context, Result, TeamData, TeamDataStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprint-planner")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sprint planning service with AI-generated plans", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML config file (default: ./sprint-planner.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that touches the data file
#[derive(Args)]
struct DataArgs {
    /// Team data JSON file (overrides config)
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Listen address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a sprint plan once and print it as JSON
    Plan {
        #[command(flatten)]
        data: DataArgs,

        /// Skip the DeepSeek call and print the local fallback plan
        #[arg(long)]
        offline: bool,
    },

    /// Print the effective configuration (API key masked)
    Config,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sprint_planner=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_async(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { data, host, port } => {
            apply_data_args(&mut config, data);
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            println!(
                "{}",
                format!(
                    "✓ Serving sprint planner on http://{}:{}",
                    config.server.host, config.server.port
                )
                .green()
            );
            println!(
                "{}",
                format!("  Data file: {}", config.server.data_file.display()).cyan()
            );
            sprint_planner::server::start_server(&config).await?;
        }

        Commands::Plan { data, offline } => {
            apply_data_args(&mut config, data);
            run_plan(&config, offline).await?;
        }

        Commands::Config => {
            let rendered = toml::to_string_pretty(&config.redacted())
                .context("Failed to render configuration")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn apply_data_args(config: &mut AppConfig, data: DataArgs) {
    if let Some(path) = data.data_file {
        config.server.data_file = path;
    }
}

async fn run_plan(config: &AppConfig, offline: bool) -> Result<()> {
    let store = TeamDataStore::new(&config.server.data_file);
    let document = store.load_document().await?;

    let output = if offline {
        let team = TeamData::from_document(&document)?;
        serde_json::to_value(fallback_plan(&team)?)?
    } else {
        let client = DeepSeekClient::new(config.deepseek.clone(), config.ai.clone())?;
        let outcome = generate_plan(&client, &document).await?;
        if let Some(note) = &outcome.note {
            eprintln!("{}", format!("⚠ {}", note).yellow());
        }
        outcome.plan
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
