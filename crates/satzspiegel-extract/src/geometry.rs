// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry extraction — derives page margins from the union bounding
// box of all content elements on a page.

use satzspiegel_core::geometry::{BoundingBox, PageMargins};
use tracing::trace;

use crate::content::TextSpan;

/// Derive page margins from the page's content elements.
///
/// Returns `None` for a page with no elements — the explicit "empty page"
/// result. Elements are scanned exactly once and are not assumed sorted.
/// An element outside the nominal page rectangle produces a negative margin
/// equal to the exact overflow; nothing is clamped.
pub fn page_margins(spans: &[TextSpan], page_width: f32, page_height: f32) -> Option<PageMargins> {
    let content = content_box(spans)?;
    let margins = PageMargins::from_content_box(&content, page_width, page_height);
    trace!(?margins, "Margins derived");
    Some(margins)
}

/// Union bounding box of all elements, or `None` when there are none.
pub fn content_box(spans: &[TextSpan]) -> Option<BoundingBox> {
    spans
        .iter()
        .map(TextSpan::bbox)
        .reduce(|acc, bbox| acc.union(&bbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(x: f32, top: f32, width: f32, size: f32) -> TextSpan {
        TextSpan {
            text: "t".into(),
            x,
            top,
            width,
            font_name: "Helvetica".into(),
            font_size: size,
        }
    }

    #[test]
    fn empty_page_has_undefined_margins() {
        assert_eq!(page_margins(&[], 612.0, 792.0), None);
    }

    #[test]
    fn margins_cover_the_union_of_unsorted_elements() {
        // Deliberately out of reading order.
        let spans = vec![
            span(300.0, 700.0, 50.0, 10.0),
            span(72.0, 100.0, 100.0, 12.0),
            span(150.0, 400.0, 400.0, 10.0),
        ];
        let m = page_margins(&spans, 612.0, 792.0).unwrap();
        assert_eq!(m.left, 72.0);
        assert_eq!(m.top, 88.0); // 100 - 12pt ascent
        assert_eq!(m.right, 612.0 - 550.0);
        assert_eq!(m.bottom, 792.0 - 700.0);
        assert!(m.left + m.right <= 612.0);
        assert!(m.top + m.bottom <= 792.0);
    }

    #[test]
    fn overflow_is_reported_as_negative_margin() {
        // Right edge at 630pt on a 612pt page: 18pt overflow.
        let spans = vec![span(580.0, 50.0, 50.0, 10.0)];
        let m = page_margins(&spans, 612.0, 792.0).unwrap();
        assert_eq!(m.right, -18.0);
    }
}
