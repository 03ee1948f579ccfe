//! Text Rendering
//!
//! - **proportion**: Share computation and proportion bars
//! - **dashboard**: Full dashboard view of a session

mod dashboard;
mod proportion;

pub use dashboard::{render_dashboard, RenderOptions, SUBTITLE, TITLE};
pub use proportion::{proportions, render_bars, Proportions, Share, NO_DATA};
