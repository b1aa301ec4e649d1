// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit and coordinate conversions.
//
// Two unit systems meet in this engine: PDF canvas coordinates are expressed
// in points (1 inch = 72 pt), while page sizes are commonly reported in
// millimetres. Two coordinate frames meet as well: text extraction reports
// positions from the top-left corner with y growing downward, drawing
// canvases place the origin at the bottom-left with y growing upward.
// All conversions are total functions with no state.

/// Points per inch (PostScript convention).
pub const POINTS_PER_INCH: f32 = 72.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// Convert a length in points to millimetres.
pub fn points_to_mm(points: f32) -> f32 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

/// Convert a length in millimetres to points.
pub fn mm_to_points(mm: f32) -> f32 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Convert a vertical coordinate between the top-left-origin frame and the
/// bottom-left-origin frame (or back — the function is its own inverse).
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_inch_is_72_points_and_25_4_mm() {
        assert!((points_to_mm(72.0) - 25.4).abs() < 1e-6);
        assert!((mm_to_points(25.4) - 72.0).abs() < 1e-6);
    }

    #[test]
    fn point_mm_conversion_is_a_bijection() {
        for v in [0.0f32, 1.0, 12.0, 595.0, 841.89, 10_000.0] {
            let tol = v.abs() * 1e-6 + 1e-6;
            assert!((mm_to_points(points_to_mm(v)) - v).abs() <= tol);
            assert!((points_to_mm(mm_to_points(v)) - v).abs() <= tol);
        }
    }

    #[test]
    fn flip_y_is_an_involution() {
        let h = 792.0;
        for y in [0.0f32, 10.0, 700.0, 792.0, -5.0, 800.0] {
            assert_eq!(flip_y(flip_y(y, h), h), y);
        }
    }

    #[test]
    fn flip_y_maps_top_to_bottom() {
        assert_eq!(flip_y(0.0, 842.0), 842.0);
        assert_eq!(flip_y(842.0, 842.0), 0.0);
        assert_eq!(flip_y(92.0, 792.0), 700.0);
    }
}
