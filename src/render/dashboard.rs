//! Dashboard View
//!
//! Text rendering of a [`DashboardSession`]: stat cards, channel and page
//! breakdowns, then demographics.

use crate::client::Overview;
use crate::render::proportion::render_bars;
use crate::session::DashboardSession;

pub const TITLE: &str = "PGRKAM Analytics";
pub const SUBTITLE: &str = "Real-time view of user channels, demographics, and pages accessed.";

/// Placeholder for a stat that has not loaded
const MISSING: &str = "-";

/// Rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width of each proportion bar in characters
    pub bar_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { bar_width: 30 }
    }
}

/// Render the full dashboard
pub fn render_dashboard(session: &DashboardSession, options: &RenderOptions) -> String {
    let overview = session.overview();
    let mut out = String::new();

    out.push_str(TITLE);
    out.push('\n');
    out.push_str(SUBTITLE);
    out.push_str("\n\n");

    let events = overview
        .and_then(|o| o.samples.events)
        .map(|n| n.to_string())
        .unwrap_or_else(|| MISSING.to_string());
    let users = overview
        .and_then(|o| o.samples.users)
        .map(|n| n.to_string())
        .unwrap_or_else(|| MISSING.to_string());

    out.push_str(&format!("{:<10}{}\n", "User ID", session.user_id()));
    out.push_str(&format!("{:<10}{}\n", "Events", events));
    out.push_str(&format!("{:<10}{}\n", "Users", users));

    match session.loaded_at() {
        Some(at) => out.push_str(&format!(
            "{:<10}{}\n",
            "Updated",
            at.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => out.push_str(&format!("{:<10}{}\n", "Updated", MISSING)),
    }

    if let Some(error) = session.last_error() {
        out.push_str(&format!("\n! Could not load overview: {}\n", error));
    }

    let empty = Overview::default();
    let overview = overview.unwrap_or(&empty);
    let width = options.bar_width;

    section(&mut out, "Acquisition Channels", &render_bars(&overview.channels, width));
    section(&mut out, "Pages Viewed", &render_bars(&overview.pages, width));

    out.push_str("\n== Demographics ==\n");
    let demographics = &overview.demographics;
    subsection(&mut out, "Gender", &render_bars(&demographics.gender, width));
    subsection(&mut out, "Education", &render_bars(&demographics.education, width));
    subsection(&mut out, "Location", &render_bars(&demographics.location, width));
    subsection(&mut out, "Age", &render_bars(&demographics.age_buckets, width));

    out
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("\n== {} ==\n", title));
    out.push_str(body);
}

fn subsection(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("\n-- {} --\n", title));
    out.push_str(body);
}
