// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transfer configuration.

use serde::{Deserialize, Serialize};

/// Which table grid is replayed onto an output page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TablePolicy {
    /// Replay the first table recorded anywhere in the template onto every
    /// applicable output page.
    #[default]
    FirstGlobal,
    /// Replay each page's own table candidate, if the page has one.
    PerPage,
}

/// Settings for a template-transfer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Table replay policy.
    pub table_policy: TablePolicy,
    /// Lower-left corner of the rendered table grid, in points.
    pub table_origin: (f32, f32),
    /// Fixed column width for rendered grids, in points.
    pub column_width: f32,
    /// Fixed row height for rendered grids, in points.
    pub row_height: f32,
    /// Stroke width of the grid lines, in points.
    pub grid_line_width: f32,
    /// Uniform font size for table cell text, in points.
    pub cell_font_size: f32,
    /// Font substituted when the template records no usable font.
    pub fallback_font: String,
    /// Size paired with the fallback font.
    pub fallback_font_size: f32,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            table_policy: TablePolicy::default(),
            table_origin: (100.0, 600.0),
            column_width: 100.0,
            row_height: 20.0,
            grid_line_width: 1.0,
            cell_font_size: 10.0,
            fallback_font: "Helvetica".to_string(),
            fallback_font_size: 12.0,
        }
    }
}
