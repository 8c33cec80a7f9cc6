//! Commit graph widget
//!
//! Draws each [`GraphRow`] as a line of lane glyphs followed by the commit
//! summary. Rows whose connectors change lanes get an extra connector line
//! underneath. Every lane takes two terminal columns.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::git::RefKind;
use crate::graph::{graph_width, GraphRow};
use crate::tui::theme::Theme;

const NODE: char = '●';
const MERGE_NODE: char = '◉';
const VERTICAL: char = '│';
const HORIZONTAL: char = '─';

/// One lane column cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    /// Palette index, `None` for blanks
    pub color: Option<usize>,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: None,
    };

    fn new(glyph: char, color: usize) -> Self {
        Self {
            glyph,
            color: Some(color),
        }
    }
}

/// Lane cells for one commit: its node line and, if any connector changes
/// lanes, the connector line drawn below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub node: Vec<Cell>,
    pub connector: Option<Vec<Cell>>,
}

/// Compute lane glyphs for every row
pub fn lane_cells(rows: &[GraphRow]) -> Vec<RowCells> {
    let columns = graph_width(rows) * 2;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut node = vec![Cell::BLANK; columns];

            // Lanes arriving from the row above
            if let Some(prev) = i.checked_sub(1).and_then(|p| rows.get(p)) {
                for line in &prev.lines {
                    node[line.to_lane * 2] = Cell::new(VERTICAL, line.color);
                }
            }
            for line in row.lines.iter().filter(|l| l.is_vertical()) {
                node[line.from_lane * 2] = Cell::new(VERTICAL, line.color);
            }

            let glyph = if row.commit.is_merge() { MERGE_NODE } else { NODE };
            node[row.lane * 2] = Cell::new(glyph, row.color);

            RowCells {
                connector: connector_cells(row, columns),
                node,
            }
        })
        .collect()
}

fn connector_cells(row: &GraphRow, columns: usize) -> Option<Vec<Cell>> {
    if row.lines.iter().all(|l| l.is_vertical()) {
        return None;
    }

    let mut cells = vec![Cell::BLANK; columns];
    for line in row.lines.iter().filter(|l| l.is_vertical()) {
        cells[line.from_lane * 2] = Cell::new(VERTICAL, line.color);
    }

    for line in row.lines.iter().filter(|l| !l.is_vertical()) {
        let (from, to) = (line.from_lane * 2, line.to_lane * 2);
        let rightward = to > from;
        let has_vertical = |lane: usize| {
            row.lines
                .iter()
                .any(|l| l.is_vertical() && l.from_lane == lane)
        };

        cells[from] = Cell::new(
            match (has_vertical(line.from_lane), rightward) {
                (true, true) => '├',
                (true, false) => '┤',
                (false, true) => '╰',
                (false, false) => '╯',
            },
            row.color,
        );

        let (lo, hi) = if rightward { (from, to) } else { (to, from) };
        for cell in &mut cells[lo + 1..hi] {
            let glyph = match cell.glyph {
                VERTICAL | '┼' => '┼',
                '╮' | '╭' | '┬' => '┬',
                _ => HORIZONTAL,
            };
            *cell = Cell::new(glyph, line.color);
        }

        let end = if has_vertical(line.to_lane) {
            if rightward { '┤' } else { '├' }
        } else if rightward {
            '╮'
        } else {
            '╭'
        };
        cells[to] = Cell::new(end, line.color);
    }

    Some(cells)
}

fn cells_to_string(cells: &[Cell]) -> String {
    cells.iter().map(|c| c.glyph).collect::<String>().trim_end().to_string()
}

/// Uncolored text rendering, one string per output line
pub fn render_plain(rows: &[GraphRow]) -> Vec<String> {
    let cells = lane_cells(rows);
    let mut out = Vec::with_capacity(rows.len());

    for (row, cells) in rows.iter().zip(cells) {
        let commit = &row.commit;
        let refs = if commit.refs.is_empty() {
            String::new()
        } else {
            format!("({}) ", commit.refs.join(", "))
        };
        out.push(format!(
            "{}  {} {}{} - {}, {}",
            cells_to_string(&cells.node),
            commit.short_hash,
            refs,
            commit.subject,
            commit.author,
            commit.relative_date
        ));
        if let Some(connector) = cells.connector {
            out.push(cells_to_string(&connector));
        }
    }

    out
}

/// Commit graph widget
pub struct GraphView<'a> {
    rows: &'a [GraphRow],
    theme: &'a Theme,
    block: Option<Block<'a>>,
    scroll: u16,
}

impl<'a> GraphView<'a> {
    pub fn new(rows: &'a [GraphRow], theme: &'a Theme) -> Self {
        Self {
            rows,
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

    fn cell_spans(&self, cells: &[Cell]) -> Vec<Span<'static>> {
        cells
            .iter()
            .map(|cell| match cell.color {
                Some(color) => Span::styled(
                    cell.glyph.to_string(),
                    Style::default().fg(self.theme.lane(color)),
                ),
                None => Span::raw(" "),
            })
            .collect()
    }

    /// Styled lines for the whole graph
    pub fn lines(&self) -> Vec<Line<'static>> {
        let cells = lane_cells(self.rows);
        let mut lines = Vec::with_capacity(self.rows.len());

        for (row, cells) in self.rows.iter().zip(cells) {
            let commit = &row.commit;
            let mut spans = self.cell_spans(&cells.node);
            spans.push(Span::raw(" "));

            for decoration in &commit.refs {
                let kind = RefKind::of(decoration);
                let mut style = Style::default().fg(self.theme.ref_kind(kind));
                if kind == RefKind::Head {
                    style = style.add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(format!("[{}]", decoration), style));
                spans.push(Span::raw(" "));
            }

            spans.push(Span::styled(
                commit.subject.clone(),
                Style::default().fg(self.theme.text_primary),
            ));
            spans.push(Span::styled(
                format!("  {} {} {}", commit.short_hash, commit.author, commit.relative_date),
                Style::default().fg(self.theme.text_secondary),
            ));
            lines.push(Line::from(spans));

            if let Some(connector) = cells.connector {
                lines.push(Line::from(self.cell_spans(&connector)));
            }
        }

        lines
    }
}

impl<'a> Widget for GraphView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paragraph = if self.rows.is_empty() {
            Paragraph::new("No commits yet")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Commit;
    use crate::graph::build_graph;
    use pretty_assertions::assert_eq;

    fn glyphs(cells: &[Cell]) -> String {
        cells_to_string(cells)
    }

    #[test]
    fn test_merge_connectors() {
        let rows = build_graph(&[
            Commit::new("c3", &["c1", "c2"]),
            Commit::new("c2", &["c1"]),
            Commit::new("c1", &[]),
        ]);
        let cells = lane_cells(&rows);

        assert_eq!(glyphs(&cells[0].node), "◉");
        assert_eq!(
            cells[0].connector.as_deref().map(glyphs).as_deref(),
            Some("├─╮")
        );
        assert_eq!(glyphs(&cells[1].node), "│ ●");
        assert!(cells[1].connector.is_none());
        assert_eq!(glyphs(&cells[2].node), "● │");
    }

    #[test]
    fn test_linear_has_no_connectors() {
        let rows = build_graph(&[Commit::new("b", &["a"]), Commit::new("a", &[])]);
        let cells = lane_cells(&rows);

        assert!(cells.iter().all(|c| c.connector.is_none()));
        assert_eq!(glyphs(&cells[1].node), "●");
    }

    #[test]
    fn test_octopus_connector() {
        let rows = build_graph(&[
            Commit::new("m", &["p1", "p2", "p3"]),
            Commit::new("p3", &[]),
            Commit::new("p2", &[]),
            Commit::new("p1", &[]),
        ]);
        let cells = lane_cells(&rows);

        assert_eq!(
            cells[0].connector.as_deref().map(glyphs).as_deref(),
            Some("├─┬─╮")
        );
    }

    #[test]
    fn test_render_plain() {
        let mut head = Commit::new("abcdef123", &["0000000"]);
        head.subject = "Fix bug".into();
        head.author = "Ada".into();
        head.relative_date = "1 day ago".into();
        head.refs = vec!["HEAD -> main".into()];

        let out = render_plain(&build_graph(&[head]));
        assert_eq!(out, vec!["●  abcdef1 (HEAD -> main) Fix bug - Ada, 1 day ago"]);
    }

    #[test]
    fn test_widget_lines_match_rows() {
        let theme = Theme::basic();
        let rows = build_graph(&[
            Commit::new("c3", &["c1", "c2"]),
            Commit::new("c2", &["c1"]),
            Commit::new("c1", &[]),
        ]);

        // three node lines plus one connector line
        assert_eq!(GraphView::new(&rows, &theme).lines().len(), 4);
    }
}
