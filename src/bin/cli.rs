//! PGRKAM CLI
//!
//! One-shot commands against the analytics backend and the local
//! identity store:
//! - Print the overview
//! - Show or clear the anonymous identifier
//! - Send the identify/track reports
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use pgrkam_dashboard::config::generate_default_config;
use pgrkam_dashboard::identity::STORE_FILE_NAME;
use pgrkam_dashboard::{
    forget_identity, logging, render_dashboard, reporting, resolve_identity, AnalyticsClient,
    Config, DashboardSession, FileStore, RenderOptions, Reporter,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pgrkam")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "PGRKAM analytics from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Analytics backend URL
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the analytics overview
    Overview {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the anonymous identifier, creating it if needed
    Whoami,

    /// Clear the stored identifier
    Forget,

    /// Send the demographic profile for this identifier
    Identify,

    /// Send a page view for this identifier
    Track {
        /// Page label (default: from config)
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default(cli.config.as_deref()).context("loading config")?;
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    logging::init(&config.logging);

    let store = FileStore::in_dir(config.identity.data_path());
    let key = config.identity.storage_key.as_str();

    match cli.command {
        Commands::Overview { format } => {
            let client = Arc::new(AnalyticsClient::new(config.client_config())?);
            let user_id = resolve_identity(&store, key)?;
            let mut session = DashboardSession::new(user_id, client);

            let overview = match session.refresh().await {
                Ok(overview) => overview,
                Err(e) => {
                    eprintln!("Failed to fetch overview from {}", config.backend_url());
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(overview)?),
                _ => {
                    let options = RenderOptions {
                        bar_width: config.dashboard.bar_width,
                    };
                    print!("{}", render_dashboard(&session, &options));
                }
            }
        }

        Commands::Whoami => {
            let user_id = resolve_identity(&store, key)?;
            println!("{}", user_id);
        }

        Commands::Forget => {
            forget_identity(&store, key)?;
            println!(
                "Cleared identifier from {}",
                config.identity.data_path().join(STORE_FILE_NAME).display()
            );
        }

        Commands::Identify => {
            let client = AnalyticsClient::new(config.client_config())?;
            let user_id = resolve_identity(&store, key)?;
            let reporter = Reporter::new(Arc::new(client.clone()), config.profile.clone());

            // Best-effort like the dashboard; failures only show in the log
            reporting::identify(&client, &reporter.profile_for(&user_id)).await;
            println!("Identify sent for {}", user_id);
        }

        Commands::Track { page } => {
            let client = AnalyticsClient::new(config.client_config())?;
            let user_id = resolve_identity(&store, key)?;

            let mut profile = config.profile.clone();
            if let Some(page) = page {
                profile.page = page;
            }
            let reporter = Reporter::new(Arc::new(client.clone()), profile);

            let event = reporter.page_view_for(&user_id);
            reporting::track(&client, &event).await;
            println!("Tracked {} on {} for {}", event.event_type, event.page, user_id);
        }

        Commands::Config { output } => {
            let content = generate_default_config();

            if let Some(path) = output {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                std::fs::write(&path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}
