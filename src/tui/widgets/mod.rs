//! TUI widgets
//!
//! Custom ratatui widgets for the application:
//! - `GraphView` - Lane-colored commit graph
//! - `StatusList` - Aggregated working-tree status
//! - `ScrollState` - Shared pane scrolling

mod graph_view;
mod scroll;
mod status_list;

pub use graph_view::*;
pub use scroll::*;
pub use status_list::*;
