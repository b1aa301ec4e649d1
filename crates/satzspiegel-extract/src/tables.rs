// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table detection from text alignment patterns (stream-mode heuristic):
// spans are grouped into rows by vertical proximity, then column boundaries
// are found where span start positions align across consecutive rows.
// No graphical ruling lines are consulted.

use satzspiegel_core::profile::{CellValue, TableGrid};
use tracing::debug;

use crate::content::TextSpan;

/// Tuning knobs for the alignment heuristic.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum rows for a region to qualify as a table.
    pub min_rows: usize,
    /// Minimum aligned columns for a region to qualify.
    pub min_columns: usize,
    /// Above this column count the region is likely word-level noise.
    pub max_columns: usize,
    /// Row grouping tolerance as a fraction of the font size.
    pub y_tolerance_factor: f32,
    /// Column alignment tolerance in points.
    pub x_tolerance: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            x_tolerance: 3.0,
        }
    }
}

/// Detects table grids in a page's text spans.
pub struct TableDetector {
    config: TableDetectorConfig,
}

#[derive(Debug, Clone)]
struct Row {
    top: f32,
    spans: Vec<TextSpan>,
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDetector {
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect all table grids on a page, in reading order.
    ///
    /// Column starts are derived from rows carrying two or more spans; a
    /// contiguous run of rows whose spans anchor to those columns becomes a
    /// grid. A single-span row inside the run is kept (a sparse table row),
    /// while an unaligned row — a heading, a caption — breaks the run.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<TableGrid> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans);
        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns || columns.len() > self.config.max_columns {
            return Vec::new();
        }

        let mut grids = Vec::new();
        let mut region_start = None;
        for (i, row) in rows.iter().enumerate() {
            let anchored = self.row_is_anchored(row, &columns);
            match (region_start, anchored) {
                (None, true) => region_start = Some(i),
                (Some(start), false) => {
                    self.emit_region(&rows[start..i], &columns, &mut grids);
                    region_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = region_start {
            self.emit_region(&rows[start..], &columns, &mut grids);
        }

        debug!(tables = grids.len(), "Table detection complete");
        grids
    }

    fn emit_region(&self, region: &[Row], columns: &[f32], grids: &mut Vec<TableGrid>) {
        let multi_rows = region
            .iter()
            .filter(|r| r.spans.len() >= self.config.min_columns)
            .count();
        if region.len() < self.config.min_rows || multi_rows < 2 {
            return;
        }

        let cells: Vec<Vec<CellValue>> = region
            .iter()
            .map(|row| self.assign_row(row, columns))
            .collect();
        grids.push(TableGrid::from_cells(cells));
    }

    /// A row belongs to a table region when at least one of its spans
    /// starts on a detected column.
    fn row_is_anchored(&self, row: &Row, columns: &[f32]) -> bool {
        row.spans.iter().any(|span| {
            columns
                .iter()
                .any(|&col| (span.x - col).abs() <= self.config.x_tolerance)
        })
    }

    /// Group spans into rows by baseline proximity, top to bottom. Spans
    /// within a row are ordered left to right.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<Row> {
        let mut sorted: Vec<TextSpan> = spans.to_vec();
        sorted.sort_by(|a, b| {
            a.top
                .partial_cmp(&b.top)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut rows: Vec<Row> = Vec::new();
        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match rows.last_mut() {
                Some(row) if (span.top - row.top).abs() <= tolerance => row.spans.push(span),
                _ => rows.push(Row {
                    top: span.top,
                    spans: vec![span],
                }),
            }
        }
        for row in &mut rows {
            row.spans.sort_by(|a, b| {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        rows
    }

    /// Column start positions that align across at least two multi-span
    /// rows. Single-span rows do not vote — prose left edges would
    /// otherwise masquerade as a column.
    fn detect_columns(&self, rows: &[Row]) -> Vec<f32> {
        // (position, rows seen in)
        let mut clusters: Vec<(f32, usize)> = Vec::new();
        for row in rows.iter().filter(|r| r.spans.len() >= self.config.min_columns) {
            for span in &row.spans {
                match clusters
                    .iter_mut()
                    .find(|(x, _)| (span.x - *x).abs() <= self.config.x_tolerance)
                {
                    Some((_, count)) => *count += 1,
                    None => clusters.push((span.x, 1)),
                }
            }
        }
        let mut columns: Vec<f32> = clusters
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(x, _)| x)
            .collect();
        columns.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        columns
    }

    /// Distribute a row's spans into the detected columns. Spans between
    /// two column starts belong to the column on their left; multiple spans
    /// in one cell are joined with spaces; uncovered columns stay empty.
    fn assign_row(&self, row: &Row, columns: &[f32]) -> Vec<CellValue> {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            let mut column = 0;
            for (i, &start) in columns.iter().enumerate() {
                if span.x + self.config.x_tolerance >= start {
                    column = i;
                }
            }
            cells[column].push(span.text.as_str());
        }
        cells
            .into_iter()
            .map(|parts| {
                if parts.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::text(parts.join(" "))
                }
            })
            .collect()
    }
}
