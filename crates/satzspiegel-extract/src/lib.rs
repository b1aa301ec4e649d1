// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzspiegel-extract — Template analysis for the Satzspiegel engine.
//
// Parses a paginated PDF into a structured page-object model (text spans,
// fonts, table grids), derives page geometry, and aggregates everything into
// a `LayoutProfile` ready for replay by the rendering crate.

pub mod content;
pub mod geometry;
pub mod profile;
pub mod source;
pub mod tables;
pub mod typographic;

pub use content::TextSpan;
pub use profile::ProfileBuilder;
pub use source::PdfSource;
