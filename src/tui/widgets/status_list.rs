//! Working-tree status list
//!
//! Shows the aggregated status map as an indented tree relative to the
//! repository root. Directories carry the most severe status below them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::git::FileStatus;
use crate::tui::theme::Theme;

/// One displayed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub depth: usize,
    pub name: String,
    pub status: FileStatus,
    pub is_dir: bool,
}

/// Flatten a status map into display order
///
/// Entries outside `root` are listed by their full path at depth 0.
pub fn status_entries(status: &BTreeMap<PathBuf, FileStatus>, root: &Path) -> Vec<StatusEntry> {
    let paths: Vec<(&PathBuf, &FileStatus)> = status.iter().collect();

    paths
        .iter()
        .enumerate()
        .map(|(i, (path, status))| {
            let is_dir = paths
                .get(i + 1)
                .is_some_and(|(next, _)| next.starts_with(path) && next != path);

            let (depth, name) = match path.strip_prefix(root) {
                Ok(relative) => (
                    relative.components().count().saturating_sub(1),
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| relative.display().to_string()),
                ),
                Err(_) => (0, path.display().to_string()),
            };

            StatusEntry {
                depth,
                name,
                status: **status,
                is_dir,
            }
        })
        .collect()
}

/// Status tree widget
pub struct StatusList<'a> {
    entries: &'a [StatusEntry],
    theme: &'a Theme,
    block: Option<Block<'a>>,
    scroll: u16,
}

impl<'a> StatusList<'a> {
    pub fn new(entries: &'a [StatusEntry], theme: &'a Theme) -> Self {
        Self {
            entries,
            theme,
            block: None,
            scroll: 0,
        }
    }

    /// Set the block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the scroll offset
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        self.entries
            .iter()
            .map(|entry| {
                let color = self.theme.file_status(entry.status);
                let mut name_style = Style::default().fg(color);
                if entry.is_dir {
                    name_style = name_style.add_modifier(Modifier::BOLD);
                }
                let suffix = if entry.is_dir { "/" } else { "" };

                Line::from(vec![
                    Span::raw("  ".repeat(entry.depth)),
                    Span::styled(format!("{} ", entry.status.letter()), Style::default().fg(color)),
                    Span::styled(format!("{}{}", entry.name, suffix), name_style),
                ])
            })
            .collect()
    }
}

impl<'a> Widget for StatusList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paragraph = if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Working tree clean",
                Style::default().fg(self.theme.text_secondary),
            )))
        } else {
            Paragraph::new(self.lines())
        };
        let paragraph = paragraph.scroll((self.scroll, 0));

        let paragraph = if let Some(block) = self.block {
            paragraph.block(block)
        } else {
            paragraph
        };

        paragraph.render(area, buf);
    }
}
