//! Terminal UI module using ratatui
//!
//! Read-only repository viewer with:
//! - Commit graph pane
//! - Working-tree status pane
//! - Periodic and on-demand refresh

mod app;
mod event;
pub mod theme;
pub mod widgets;

pub use app::*;
pub use event::*;
