//! PGRKAM Analytics Dashboard
//!
//! Interactive terminal dashboard. Opens the dashboard once (identity,
//! reports, first snapshot) and then refreshes on demand.
//!
//! Commands read from stdin:
//! - `r` refresh the overview
//! - `q` quit

use anyhow::Context;
use clap::Parser;
use pgrkam_dashboard::{
    logging, render_dashboard, AnalyticsClient, Config, DashboardSession, FileStore,
    KeyValueStore, MemoryStore, RenderOptions, Reporter,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "pgrkam-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Real-time view of user channels, demographics, and pages accessed")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analytics backend URL (overrides config and PGRKAM_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Refresh automatically every N seconds
    #[arg(short, long)]
    watch: Option<u64>,

    /// Keep the identifier in memory only, like a private browsing session
    #[arg(long)]
    ephemeral: bool,

    /// Skip the identify and track reports
    #[arg(long)]
    no_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_default(args.config.as_deref()).context("loading config")?;
    if let Some(url) = args.backend_url {
        config.backend.url = url;
    }
    if let Some(secs) = args.watch {
        config.dashboard.refresh_interval_secs = secs;
    }

    logging::init(&config.logging);
    tracing::info!("PGRKAM dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Analytics backend: {}", config.backend_url());

    let client = Arc::new(
        AnalyticsClient::new(config.client_config()).context("building HTTP client")?,
    );
    let reporter = Reporter::new(Arc::clone(&client), config.profile.clone());

    let store: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let store = FileStore::in_dir(config.identity.data_path());
        tracing::debug!("Identity store: {:?}", store.path());
        Box::new(store)
    };

    let mounted = DashboardSession::mount(
        store.as_ref(),
        &config.identity.storage_key,
        client,
        (!args.no_report).then_some(&reporter),
    )
    .await
    .context("resolving anonymous identifier")?;

    // Reports run on their own; the view never waits for them
    let mut session = mounted.session;
    drop(mounted.reports);

    let options = RenderOptions {
        bar_width: config.dashboard.bar_width,
    };
    draw(&session, &options);

    let mut ticker = match config.dashboard.refresh_interval_secs {
        0 => None,
        secs => {
            let mut interval = tokio::time::interval(Duration::from_secs(secs));
            // First tick completes immediately; the mount already fetched
            interval.tick().await;
            Some(interval)
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // One listener for the whole loop so a Ctrl+C during a refresh is not lost
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let tick = async {
            match ticker.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            line = lines.next_line() => {
                match line.context("reading command")? {
                    None => break,
                    Some(line) => match line.trim() {
                        "r" | "refresh" => {
                            let _ = session.refresh().await;
                            draw(&session, &options);
                        }
                        "q" | "quit" | "exit" => break,
                        "" => {}
                        other => eprintln!("Unknown command: {} (r = refresh, q = quit)", other),
                    },
                }
            }
            _ = tick => {
                let _ = session.refresh().await;
                draw(&session, &options);
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    tracing::info!("Dashboard closed");
    Ok(())
}

fn draw(session: &DashboardSession, options: &RenderOptions) {
    println!("{}", render_dashboard(session, options));
    println!("[r] refresh  [q] quit");
}
