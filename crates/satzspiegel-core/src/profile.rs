// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The layout profile — the aggregated structural and typographic model
// extracted from a template document.
//
// A `LayoutProfile` owns copies of everything it needs; the source document
// can be closed as soon as extraction finishes. It is immutable once built
// and may be replayed against any number of target documents.

use serde::{Deserialize, Serialize};

use crate::geometry::PageMargins;

/// One positioned, sized fragment of extracted text.
///
/// The position is expressed in the bottom-left-origin canvas frame
/// (y increases upward) — the frame the template applier draws in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Always positive for runs produced by extraction.
    pub font_size: f32,
}

/// One font observation from a styled text span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSample {
    pub font_name: String,
    pub size: f32,
}

/// A table cell value prior to layout normalization.
///
/// Table extraction can surface heterogeneous cell content; everything is
/// funnelled through `to_display_string` before it reaches the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellValue {
    Text { value: String },
    Number { value: f64 },
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text {
            value: value.into(),
        }
    }

    /// Display representation used for grid layout. Empty cells render as
    /// an empty string, not a placeholder.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Text { value } => value.clone(),
            CellValue::Number { value } => value.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Rectangular array of cell text extracted from tabular content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Rows in reading order, each a row of cell strings.
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a grid from raw cell values, normalizing each through its
    /// display representation.
    pub fn from_cells(rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.iter().map(CellValue::to_display_string).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count based on the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Insertion-ordered `font name -> size` mapping.
///
/// Later observations for a name overwrite the stored size but keep the
/// name's original position, so "first key" is a stable, deterministic
/// notion across repeated extractions of the same document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontMap {
    entries: Vec<(String, f32)>,
}

impl FontMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation. Last writer wins for the size.
    pub fn insert(&mut self, name: impl Into<String>, size: f32) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, s)) => *s = size,
            None => self.entries.push((name, size)),
        }
    }

    pub fn record(&mut self, sample: &FontSample) {
        self.insert(sample.font_name.clone(), sample.size);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    /// The dominant font: the first name in insertion order. A deliberate,
    /// deterministic convention — not a frequency or size ranking.
    pub fn dominant(&self) -> Option<(&str, f32)> {
        self.entries.first().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

/// Extraction results for a single template page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProfile {
    /// Zero-based page index within the template.
    pub index: usize,
    /// Physical page width in points.
    pub width: f32,
    /// Physical page height in points.
    pub height: f32,
    /// Derived margins; `None` marks a page with no content elements.
    pub margins: Option<PageMargins>,
    /// Text runs in natural extraction order.
    pub text_runs: Vec<TextRun>,
    /// Table grids found on the page; only the first participates in the
    /// document-level candidate list.
    pub tables: Vec<TableGrid>,
}

impl PageProfile {
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            margins: None,
            text_runs: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// The page's table candidate: its first extracted grid, if any.
    pub fn table_candidate(&self) -> Option<&TableGrid> {
        self.tables.first()
    }
}

/// The aggregated model derived from one template document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutProfile {
    /// Per-page extraction results, in page order.
    pub pages: Vec<PageProfile>,
    /// Document-level font observations.
    pub fonts: FontMap,
}

impl LayoutProfile {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Table candidates across the document: the first grid of every page
    /// that yielded one, in page order.
    pub fn table_candidates(&self) -> Vec<&TableGrid> {
        self.pages
            .iter()
            .filter_map(PageProfile::table_candidate)
            .collect()
    }

    /// The first table recorded anywhere in the template.
    pub fn first_table(&self) -> Option<&TableGrid> {
        self.pages.iter().find_map(PageProfile::table_candidate)
    }

    /// Total number of text runs across all pages.
    pub fn text_run_count(&self) -> usize {
        self.pages.iter().map(|p| p.text_runs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_map_last_write_wins_first_seen_order() {
        // Observations: Arial 12, Times 10, Arial 14.
        let mut fonts = FontMap::new();
        for (name, size) in [("Arial", 12.0), ("Times", 10.0), ("Arial", 14.0)] {
            fonts.insert(name, size);
        }
        assert_eq!(fonts.get("Arial"), Some(14.0));
        assert_eq!(fonts.get("Times"), Some(10.0));
        assert_eq!(fonts.dominant(), Some(("Arial", 14.0)));
        assert_eq!(fonts.len(), 2);
    }

    #[test]
    fn empty_font_map_has_no_dominant() {
        assert_eq!(FontMap::new().dominant(), None);
    }

    #[test]
    fn cell_value_display_representations() {
        assert_eq!(CellValue::text("A1").to_display_string(), "A1");
        assert_eq!(
            CellValue::Number { value: 42.5 }.to_display_string(),
            "42.5"
        );
        assert_eq!(CellValue::Empty.to_display_string(), "");
    }

    #[test]
    fn grid_from_mixed_cells() {
        let grid = TableGrid::from_cells(vec![
            vec![CellValue::text("A"), CellValue::Number { value: 2.0 }],
            vec![CellValue::Empty, CellValue::text("D")],
        ]);
        assert_eq!(grid.rows, vec![vec!["A", "2"], vec!["", "D"]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn first_table_spans_the_whole_document() {
        let mut profile = LayoutProfile::default();
        profile.pages.push(PageProfile::new(0, 612.0, 792.0));
        let mut page1 = PageProfile::new(1, 612.0, 792.0);
        page1
            .tables
            .push(TableGrid::new(vec![vec!["only".to_string()]]));
        profile.pages.push(page1);

        assert_eq!(profile.first_table().unwrap().rows[0][0], "only");
        assert_eq!(profile.table_candidates().len(), 1);
    }
}
