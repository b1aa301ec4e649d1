// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Satzspiegel — Core types, unit conversions, and error definitions shared
// across the extraction and rendering crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod profile;
pub mod units;

pub use config::{TablePolicy, TransferOptions};
pub use error::{Result, SatzspiegelError};
pub use geometry::{BoundingBox, PageMargins};
pub use profile::{CellValue, FontMap, FontSample, LayoutProfile, PageProfile, TableGrid, TextRun};
