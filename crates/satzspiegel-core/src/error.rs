// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Satzspiegel.
//
// Recoverable conditions (a page with no elements, a missing font, an absent
// table) are modeled in the data — `Option<PageMargins>`, fallback font
// resolution, skipped table drawing — and deliberately do NOT appear here.

use thiserror::Error;

/// Top-level error type for all Satzspiegel operations.
#[derive(Debug, Error)]
pub enum SatzspiegelError {
    // -- Parsing --
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("extraction failed on page {page}: {reason}")]
    Extract { page: usize, reason: String },

    // -- Rendering --
    #[error("template application failed: {0}")]
    Render(String),

    #[error("rasterisation failed on page {page}: {reason}")]
    Raster { page: usize, reason: String },

    #[error("failed to finalise output: {0}")]
    SinkWrite(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SatzspiegelError>;
