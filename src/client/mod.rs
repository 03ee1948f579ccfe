//! Analytics Backend Client
//!
//! - **dto**: Request and response bodies
//! - **http**: REST client for identify, track, and overview calls

mod dto;
mod http;

pub use dto::{CountMap, Demographics, EventProperties, Overview, Samples, TrackEvent, UserProfile};
pub use http::{AnalyticsClient, ClientConfig, ClientError};
