//! # PGRKAM Analytics Dashboard
//!
//! Terminal dashboard for an analytics backend: user channels,
//! demographics, and pages accessed, rendered as proportion bars.
//!
//! ## Modules
//!
//! - [`identity`]: Persistent anonymous identifier per storage scope
//! - [`client`]: REST client for the analytics backend
//! - [`reporting`]: Fire-and-forget identify/track reports on mount
//! - [`session`]: Dashboard view state and refresh
//! - [`render`]: Proportion bars and the full text view
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pgrkam_dashboard::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = Arc::new(AnalyticsClient::new(config.client_config())?);
//!     let reporter = Reporter::new(Arc::clone(&client), config.profile.clone());
//!     let store = FileStore::in_dir(config.identity.data_path());
//!
//!     let mounted =
//!         DashboardSession::mount(&store, &config.identity.storage_key, client, Some(&reporter))
//!             .await?;
//!
//!     print!("{}", render_dashboard(&mounted.session, &RenderOptions::default()));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod identity;
pub mod logging;
pub mod render;
pub mod reporting;
pub mod session;

pub use client::{
    AnalyticsClient, ClientConfig, ClientError, CountMap, Demographics, Overview, Samples,
    TrackEvent, UserProfile,
};

pub use config::{
    BackendConfig, Config, ConfigError, DashboardConfig, IdentityConfig, LoggingConfig,
    ProfileConfig,
};

pub use identity::{
    forget_identity, resolve_identity, AnonymousId, FileStore, KeyValueStore, MemoryStore,
    StoreError,
};

pub use render::{proportions, render_bars, render_dashboard, Proportions, RenderOptions, Share};

pub use reporting::{MountReports, Reporter};

pub use session::{DashboardSession, Mounted};
