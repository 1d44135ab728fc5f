mod config;
mod generate_cmd;
mod serve_cmd;
mod tui;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use evplan_core::client::PlanClient;
use evplan_core::service::PlanService;
use evplan_core::source::{FallbackChain, GeminiConfig};

use config::{CliOverrides, EvplanConfig};

#[derive(Parser)]
#[command(name = "evplan", about = "Budget-aware event planning assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write an evplan config file
    Init {
        /// Gemini API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Serve POST /api/generate over HTTP
    Serve {
        /// Address to bind (overrides EVPLAN_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides EVPLAN_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a single plan and print it
    Generate {
        /// Event type, e.g. "Birthday Party"
        event_type: String,
        /// Target budget in INR
        #[arg(long)]
        budget: Option<f64>,
        /// Use the built-in mock plan instead of the model
        #[arg(long)]
        offline: bool,
        /// Print the JSON response envelope
        #[arg(long)]
        json: bool,
    },
    /// Launch the interactive planner
    Plan {
        /// Plan server URL (overrides EVPLAN_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
        /// Generate plans in-process with the mock generator
        #[arg(long)]
        offline: bool,
    },
}

/// Execute the `evplan init` command: write config file.
fn cmd_init(api_key: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        model: config::ModelSection {
            api_key: api_key.map(str::to_string),
            name: Some(GeminiConfig::DEFAULT_MODEL.to_string()),
            base_url: Some(GeminiConfig::DEFAULT_BASE_URL.to_string()),
            timeout_secs: Some(GeminiConfig::DEFAULT_TIMEOUT_SECS),
        },
        server: config::ServerSection {
            bind: Some(config::DEFAULT_BIND.to_string()),
            port: Some(config::DEFAULT_PORT),
        },
        client: config::ClientSection {
            server_url: Some(config::DEFAULT_SERVER_URL.to_string()),
            timeout_secs: Some(config::DEFAULT_CLIENT_TIMEOUT_SECS),
        },
        mock: config::MockSection { delay_ms: Some(0) },
    };

    config::save_config_to(&cfg, &path)?;

    println!("Config written to {}", path.display());
    match api_key {
        Some(key) => println!("  model.api_key = {}", mask_secret(key)),
        None => println!("  model.api_key not set (plans will come from the mock generator)"),
    }
    println!("  server = {}:{}", config::DEFAULT_BIND, config::DEFAULT_PORT);
    println!();
    println!("Next: run `evplan serve`, then `evplan plan` in another terminal.");

    Ok(())
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Build the request handler: `[gemini, mock]`, or mock only when offline.
fn build_service(config: &EvplanConfig, offline: bool) -> anyhow::Result<PlanService> {
    let chain = if offline {
        FallbackChain::offline(config.mock_delay)
    } else {
        if !config.has_api_key() {
            tracing::warn!(
                "{} is not set; every plan will come from the mock generator",
                config::ENV_API_KEY
            );
        }
        FallbackChain::production(config.gemini.clone(), config.mock_delay)
            .context("failed to build HTTP client for the model provider")?
    };
    Ok(PlanService::new(chain))
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_path = config::load_dotenv();
    let cli = Cli::parse();

    // The interactive client shares the terminal with its logs.
    init_tracing(match cli.command {
        Commands::Plan { .. } => "warn",
        _ => "info",
    });
    if let Some(path) = dotenv_path {
        tracing::debug!("loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key.as_deref(), force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = EvplanConfig::resolve(&CliOverrides {
                bind,
                port,
                ..CliOverrides::default()
            })?;
            let service = build_service(&resolved, false)?;
            serve_cmd::run_serve(Arc::new(service), &resolved.bind, resolved.port).await?;
        }
        Commands::Generate {
            event_type,
            budget,
            offline,
            json,
        } => {
            let resolved = EvplanConfig::resolve(&CliOverrides::default())?;
            let service = build_service(&resolved, offline)?;
            generate_cmd::run_generate(&service, &event_type, budget, json).await?;
        }
        Commands::Plan { server, offline } => {
            let resolved = EvplanConfig::resolve(&CliOverrides {
                server_url: server,
                ..CliOverrides::default()
            })?;
            let fetcher = if offline {
                tui::Fetcher::Local(build_service(&resolved, true)?)
            } else {
                let client = PlanClient::new(resolved.server_url.clone(), resolved.client_timeout)
                    .context("failed to build HTTP client")?;
                tui::Fetcher::Remote(client)
            };
            tui::run_planner(fetcher).await?;
        }
    }

    Ok(())
}
