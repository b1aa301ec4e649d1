// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typographic extraction — turns a page's scanned spans into the replayable
// artifacts: ordered text runs (in the bottom-origin canvas frame), font
// samples, and table grids.

use satzspiegel_core::profile::{FontSample, TableGrid, TextRun};
use satzspiegel_core::units::flip_y;
use tracing::trace;

use crate::content::TextSpan;
use crate::tables::TableDetector;

/// Everything the typographic extractor yields for one page.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// Text runs in natural extraction order.
    pub text_runs: Vec<TextRun>,
    /// One sample per styled span, in the same order.
    pub font_samples: Vec<FontSample>,
    /// Detected table grids, in reading order.
    pub tables: Vec<TableGrid>,
}

/// Extract text runs, font samples, and tables from one page's spans.
///
/// Span positions arrive in the top-origin frame; run positions leave in
/// the bottom-origin canvas frame (`y = page_height - top`), which is what
/// the applier draws with.
pub fn extract_page(spans: &[TextSpan], page_height: f32) -> PageExtraction {
    let mut text_runs = Vec::with_capacity(spans.len());
    let mut font_samples = Vec::with_capacity(spans.len());

    for span in spans {
        text_runs.push(TextRun {
            text: span.text.clone(),
            x: span.x,
            y: flip_y(span.top, page_height),
            font_size: span.font_size,
        });
        if !span.font_name.is_empty() {
            font_samples.push(FontSample {
                font_name: span.font_name.clone(),
                size: span.font_size,
            });
        }
    }

    let tables = TableDetector::new().detect(spans);
    trace!(
        runs = text_runs.len(),
        samples = font_samples.len(),
        tables = tables.len(),
        "Page extracted"
    );

    PageExtraction {
        text_runs,
        font_samples,
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, top: f32, font: &str, size: f32) -> TextSpan {
        TextSpan {
            text: text.into(),
            x,
            top,
            width: 0.5 * size * text.chars().count() as f32,
            font_name: font.into(),
            font_size: size,
        }
    }

    #[test]
    fn runs_are_flipped_into_the_canvas_frame() {
        let spans = vec![span("Hello", 10.0, 92.0, "Helvetica", 12.0)];
        let page = extract_page(&spans, 792.0);
        assert_eq!(page.text_runs.len(), 1);
        let run = &page.text_runs[0];
        assert_eq!(run.text, "Hello");
        assert_eq!(run.x, 10.0);
        assert_eq!(run.y, 700.0);
        assert_eq!(run.font_size, 12.0);
    }

    #[test]
    fn extraction_order_is_preserved() {
        // Spans deliberately not in top-to-bottom order.
        let spans = vec![
            span("second", 10.0, 200.0, "Helvetica", 10.0),
            span("first", 10.0, 100.0, "Helvetica", 10.0),
        ];
        let page = extract_page(&spans, 792.0);
        let texts: Vec<&str> = page.text_runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn every_styled_span_yields_a_font_sample() {
        let spans = vec![
            span("a", 10.0, 100.0, "Arial", 12.0),
            span("b", 10.0, 120.0, "Times", 10.0),
            span("c", 10.0, 140.0, "Arial", 14.0),
        ];
        let page = extract_page(&spans, 792.0);
        assert_eq!(page.font_samples.len(), 3);
        assert_eq!(page.font_samples[2].font_name, "Arial");
        assert_eq!(page.font_samples[2].size, 14.0);
    }

    #[test]
    fn aligned_spans_surface_as_a_table() {
        let spans = vec![
            span("A", 100.0, 200.0, "Helvetica", 10.0),
            span("B", 200.0, 200.0, "Helvetica", 10.0),
            span("C", 100.0, 218.0, "Helvetica", 10.0),
            span("D", 200.0, 218.0, "Helvetica", 10.0),
        ];
        let page = extract_page(&spans, 792.0);
        assert_eq!(page.tables.len(), 1);
        assert_eq!(page.tables[0].rows, vec![vec!["A", "B"], vec!["C", "D"]]);
    }
}
