// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzspiegel-render — Replay side of the Satzspiegel engine.
//
// Consumes a `LayoutProfile` and draws a reconstruction onto a fresh PDF
// using `printpdf` 0.8, plus a raster preview path (`image`/`imageproc`)
// for visual inspection of extracted template pages.

pub mod applier;
pub mod fonts;
pub mod raster;

pub use applier::TemplateApplier;
pub use fonts::resolve_builtin;
pub use raster::{preview_png, rasterize_page};
