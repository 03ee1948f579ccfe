//! Identify + Track Reporting
//!
//! Fire-and-forget reports sent once when the dashboard mounts. Failures
//! are logged and swallowed; nothing here ever reaches the view.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::client::{AnalyticsClient, TrackEvent, UserProfile};
use crate::config::ProfileConfig;
use crate::identity::AnonymousId;

/// Submit a profile, logging instead of returning any failure
pub async fn identify(client: &AnalyticsClient, profile: &UserProfile) {
    match client.identify(profile).await {
        Ok(()) => tracing::debug!(user_id = %profile.user_id, "identify sent"),
        Err(e) => tracing::warn!(user_id = %profile.user_id, error = %e, "identify error"),
    }
}

/// Submit an event, logging instead of returning any failure
pub async fn track(client: &AnalyticsClient, event: &TrackEvent) {
    match client.track(event).await {
        Ok(()) => tracing::debug!(
            user_id = %event.user_id,
            event_type = %event.event_type,
            "track sent"
        ),
        Err(e) => tracing::warn!(
            user_id = %event.user_id,
            event_type = %event.event_type,
            error = %e,
            "track error"
        ),
    }
}

/// Dispatches the mount reports for an identifier
#[derive(Debug, Clone)]
pub struct Reporter {
    client: Arc<AnalyticsClient>,
    profile: ProfileConfig,
}

/// Handles to the two independently running report tasks
#[derive(Debug)]
pub struct MountReports {
    pub identify: JoinHandle<()>,
    pub track: JoinHandle<()>,
}

impl MountReports {
    /// Wait for both reports to finish
    pub async fn wait(self) {
        for (name, handle) in [("identify", self.identify), ("track", self.track)] {
            if let Err(e) = handle.await {
                tracing::warn!(report = name, error = %e, "report task did not complete");
            }
        }
    }
}

impl Reporter {
    pub fn new(client: Arc<AnalyticsClient>, profile: ProfileConfig) -> Self {
        Self { client, profile }
    }

    /// The demographic profile reported for an identifier
    pub fn profile_for(&self, user_id: &AnonymousId) -> UserProfile {
        UserProfile {
            user_id: user_id.clone(),
            gender: self.profile.gender.clone(),
            location: self.profile.location.clone(),
            education: self.profile.education.clone(),
            skills: self.profile.skills.clone(),
            channel: self.profile.channel.clone(),
        }
    }

    /// The page view reported for an identifier
    pub fn page_view_for(&self, user_id: &AnonymousId) -> TrackEvent {
        TrackEvent::page_view(user_id.clone(), &self.profile.page, &self.profile.channel)
    }

    /// Spawn the identify and track reports without waiting on either
    pub fn report_mount(&self, user_id: &AnonymousId) -> MountReports {
        let profile = self.profile_for(user_id);
        let client = Arc::clone(&self.client);
        let identify_task = tokio::spawn(async move { identify(&client, &profile).await });

        let event = self.page_view_for(user_id);
        let client = Arc::clone(&self.client);
        let track_task = tokio::spawn(async move { track(&client, &event).await });

        MountReports {
            identify: identify_task,
            track: track_task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    fn unreachable_reporter() -> Reporter {
        let client = AnalyticsClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 2_000,
        })
        .unwrap();
        Reporter::new(Arc::new(client), ProfileConfig::default())
    }

    fn user() -> AnonymousId {
        serde_json::from_str("\"anon_0a1b2c3d\"").unwrap()
    }

    #[test]
    fn test_profile_uses_config() {
        let reporter = unreachable_reporter();
        let profile = reporter.profile_for(&user());
        assert_eq!(profile.user_id, user());
        assert_eq!(profile.gender, "prefer_not_to_say");
        assert_eq!(profile.location, "Demo City");
        assert_eq!(profile.education, "Graduate");
        assert_eq!(profile.channel, "Website");
    }

    #[test]
    fn test_page_view_event() {
        let reporter = unreachable_reporter();
        let event = reporter.page_view_for(&user());
        assert_eq!(event.event_type, "page_view");
        assert_eq!(event.page, "dashboard");
        assert_eq!(event.properties.channel, "Website");
    }

    #[tokio::test]
    async fn test_unreachable_reports_complete_quietly() {
        let reporter = unreachable_reporter();
        let reports = reporter.report_mount(&user());

        // Both tasks finish normally even though every request fails
        assert!(reports.identify.await.is_ok());
        assert!(reports.track.await.is_ok());
    }
}
