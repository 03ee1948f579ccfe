//! Dashboard Session
//!
//! View state for one open dashboard: the resolved identifier, the most
//! recent snapshot, and the outcome of the last fetch.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::client::{AnalyticsClient, ClientError, Overview};
use crate::identity::{resolve_identity, AnonymousId, KeyValueStore, StoreResult};
use crate::reporting::{MountReports, Reporter};

/// State rendered by the dashboard view
#[derive(Debug)]
pub struct DashboardSession {
    user_id: AnonymousId,
    client: Arc<AnalyticsClient>,
    overview: Option<Overview>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// A freshly mounted session and its in-flight reports
#[derive(Debug)]
pub struct Mounted {
    pub session: DashboardSession,
    /// `None` when reporting was disabled
    pub reports: Option<MountReports>,
}

impl DashboardSession {
    /// Session for an already resolved identifier, nothing loaded yet
    pub fn new(user_id: AnonymousId, client: Arc<AnalyticsClient>) -> Self {
        Self {
            user_id,
            client,
            overview: None,
            loaded_at: None,
            last_error: None,
        }
    }

    /// Open the dashboard
    ///
    /// Resolves the identifier, dispatches the identify and track reports
    /// without waiting on them, then loads the first snapshot. A failed
    /// first load is recorded on the session rather than returned.
    pub async fn mount(
        store: &dyn KeyValueStore,
        storage_key: &str,
        client: Arc<AnalyticsClient>,
        reporter: Option<&Reporter>,
    ) -> StoreResult<Mounted> {
        let user_id = resolve_identity(store, storage_key)?;
        let reports = reporter.map(|r| r.report_mount(&user_id));

        let mut session = Self::new(user_id, client);
        // Already logged and recorded on the session
        let _ = session.refresh().await;

        Ok(Mounted { session, reports })
    }

    /// Fetch a new snapshot
    ///
    /// Success replaces the displayed snapshot wholesale. Failure keeps the
    /// previous snapshot on screen and records the error for display.
    pub async fn refresh(&mut self) -> Result<&Overview, ClientError> {
        match self.client.fetch_overview().await {
            Ok(overview) => {
                tracing::info!(
                    events = ?overview.samples.events,
                    users = ?overview.samples.users,
                    channels = overview.channels.len(),
                    "Overview loaded"
                );
                self.loaded_at = Some(Utc::now());
                self.last_error = None;
                Ok(&*self.overview.insert(overview))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch overview");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn user_id(&self) -> &AnonymousId {
        &self.user_id
    }

    /// Latest snapshot, `None` until the first successful fetch
    pub fn overview(&self) -> Option<&Overview> {
        self.overview.as_ref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Message from the most recent failed fetch, cleared on success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.overview.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::identity::MemoryStore;

    fn unreachable_client() -> Arc<AnalyticsClient> {
        Arc::new(
            AnalyticsClient::new(ClientConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                request_timeout_ms: 2_000,
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_mount_with_backend_down() {
        let store = MemoryStore::new();
        let mounted = DashboardSession::mount(&store, "pgrkam_uid", unreachable_client(), None)
            .await
            .unwrap();

        let session = mounted.session;
        assert!(mounted.reports.is_none());
        assert!(!session.is_loaded());
        assert!(session.last_error().is_some());
        assert!(session.loaded_at().is_none());
        assert_eq!(
            store.get("pgrkam_uid").unwrap().as_deref(),
            Some(session.user_id().as_str())
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_error() {
        let user: AnonymousId = serde_json::from_str("\"anon_0a1b2c3d\"").unwrap();
        let mut session = DashboardSession::new(user, unreachable_client());
        assert!(session.refresh().await.is_err());
        assert!(session.overview().is_none());
    }
}
