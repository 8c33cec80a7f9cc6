//! Commit graph lane layout
//!
//! Assigns every commit a lane (column) and emits the connectors between one
//! row and the next. The layout is a single greedy pass over the commits in
//! the order given: a commit goes to the lane already waiting for it, else
//! the first free lane, else a new lane on the right. It is local, not
//! width-optimal, and relies only on parent references.
//!
//! A parent that never shows up in the list (history cut off by
//! `--max-count`) keeps its lane open until the last row.

mod lanes;

use serde::Serialize;

use crate::git::Commit;
use lanes::Lanes;

/// Number of distinct lane colors before the palette repeats
pub const PALETTE_SIZE: usize = 10;

/// Palette index for a lane
pub fn lane_color(lane: usize) -> usize {
    lane % PALETTE_SIZE
}

/// A connector from one row to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLine {
    pub from_lane: usize,
    pub from_row: usize,
    pub to_lane: usize,
    pub to_row: usize,
    /// Palette index
    pub color: usize,
}

impl GraphLine {
    fn new(from_lane: usize, row: usize, to_lane: usize, color: usize) -> Self {
        Self {
            from_lane,
            from_row: row,
            to_lane,
            to_row: row + 1,
            color,
        }
    }

    /// Stays in the same lane
    pub fn is_vertical(&self) -> bool {
        self.from_lane == self.to_lane
    }
}

/// One commit placed in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRow {
    pub commit: Commit,
    pub lane: usize,
    /// Palette index
    pub color: usize,
    pub lines: Vec<GraphLine>,
}

impl GraphRow {
    /// Connectors leaving this row's commit (as opposed to pass-through lanes)
    pub fn outgoing(&self) -> impl Iterator<Item = &GraphLine> {
        let lane = self.lane;
        self.lines.iter().filter(move |l| l.from_lane == lane)
    }
}

/// Lay out `commits` (normally newest first) into graph rows
pub fn build_graph(commits: &[Commit]) -> Vec<GraphRow> {
    let mut lanes = Lanes::default();

    commits
        .iter()
        .enumerate()
        .map(|(row, commit)| {
            let lane = lanes.place(&commit.hash);
            let color = lane_color(lane);

            let mut lines: Vec<GraphLine> = lanes
                .occupied()
                .filter(|&l| l != lane)
                .map(|l| GraphLine::new(l, row, l, lane_color(l)))
                .collect();

            match commit.parents.split_first() {
                Some((first, rest)) => {
                    lanes.expect(lane, first);
                    lines.push(GraphLine::new(lane, row, lane, color));

                    for parent in rest {
                        let target = lanes.resolve(parent);
                        lines.push(GraphLine::new(lane, row, target, lane_color(target)));
                    }
                }
                None => lanes.release(lane),
            }

            lanes.trim();

            GraphRow {
                commit: commit.clone(),
                lane,
                color,
                lines,
            }
        })
        .collect()
}

/// Columns a renderer needs to fit every node and connector
pub fn graph_width(rows: &[GraphRow]) -> usize {
    rows.iter()
        .flat_map(|row| {
            std::iter::once(row.lane + 1).chain(
                row.lines
                    .iter()
                    .map(|l| l.from_lane.max(l.to_lane) + 1),
            )
        })
        .max()
        .unwrap_or(0)
        .max(1)
}
