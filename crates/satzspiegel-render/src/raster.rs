// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview rasteriser — renders an extracted page profile as an RGB image
// for human inspection: text runs as filled boxes, the derived content box
// as an outline. Strictly a read-only consumer of extraction output; the
// applier never sees a raster.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use satzspiegel_core::profile::PageProfile;
use satzspiegel_core::units::flip_y;
use satzspiegel_core::{Result, SatzspiegelError};
use tracing::{debug, instrument};

const PAGE_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const RUN_FILL: Rgb<u8> = Rgb([120, 120, 120]);
const CONTENT_OUTLINE: Rgb<u8> = Rgb([200, 60, 60]);

/// Mirrors the extraction-side width estimate so preview boxes match the
/// spans they came from.
const AVG_GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// Render one extracted page at `scale` pixels per point.
///
/// At scale 1.0 the image has page-native pixel dimensions. A page with
/// non-positive dimensions cannot produce a pixel buffer and is reported
/// as an error rather than skipped.
#[instrument(skip(page), fields(page = page.index))]
pub fn rasterize_page(page: &PageProfile, scale: f32) -> Result<RgbImage> {
    let width = (page.width * scale).round() as i64;
    let height = (page.height * scale).round() as i64;
    if width <= 0 || height <= 0 {
        return Err(SatzspiegelError::Raster {
            page: page.index,
            reason: format!(
                "page box {}x{} pt at scale {} has no renderable pixels",
                page.width, page.height, scale
            ),
        });
    }

    let mut image = RgbImage::from_pixel(width as u32, height as u32, PAGE_BACKGROUND);

    for run in &page.text_runs {
        // Run positions are in the bottom-origin canvas frame; the pixel
        // grid is top-origin.
        let top = flip_y(run.y, page.height) - run.font_size;
        let run_width = AVG_GLYPH_WIDTH_FACTOR * run.font_size * run.text.chars().count() as f32;
        if let Some(rect) = scaled_rect(run.x, top, run_width, run.font_size, scale) {
            draw_filled_rect_mut(&mut image, rect, RUN_FILL);
        }
    }

    if let Some(margins) = page.margins {
        let content_width = page.width - margins.left - margins.right;
        let content_height = page.height - margins.top - margins.bottom;
        if let Some(rect) = scaled_rect(
            margins.left,
            margins.top,
            content_width,
            content_height,
            scale,
        ) {
            draw_hollow_rect_mut(&mut image, rect, CONTENT_OUTLINE);
        }
    }

    debug!(width, height, runs = page.text_runs.len(), "Page rasterised");
    Ok(image)
}

/// Render a page and encode it as PNG bytes.
pub fn preview_png(page: &PageProfile, scale: f32) -> Result<Vec<u8>> {
    let image = rasterize_page(page, scale)?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .map_err(|err| SatzspiegelError::Raster {
            page: page.index,
            reason: format!("PNG encoding failed: {}", err),
        })?;
    Ok(bytes)
}

/// Clamp a page-space rectangle to pixel space; degenerate boxes vanish.
fn scaled_rect(x: f32, y: f32, width: f32, height: f32, scale: f32) -> Option<Rect> {
    let w = (width * scale).round() as i32;
    let h = (height * scale).round() as i32;
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(Rect::at((x * scale).round() as i32, (y * scale).round() as i32).of_size(w as u32, h as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use satzspiegel_core::geometry::PageMargins;
    use satzspiegel_core::profile::TextRun;

    fn page_with_run() -> PageProfile {
        let mut page = PageProfile::new(0, 200.0, 100.0);
        page.text_runs.push(TextRun {
            text: "test".into(),
            x: 20.0,
            y: 50.0,
            font_size: 10.0,
        });
        page.margins = Some(PageMargins {
            left: 20.0,
            right: 140.0,
            top: 40.0,
            bottom: 50.0,
        });
        page
    }

    #[test]
    fn raster_has_page_native_dimensions() {
        let image = rasterize_page(&page_with_run(), 1.0).unwrap();
        assert_eq!(image.dimensions(), (200, 100));
    }

    #[test]
    fn scale_multiplies_pixel_dimensions() {
        let image = rasterize_page(&page_with_run(), 2.0).unwrap();
        assert_eq!(image.dimensions(), (400, 200));
    }

    #[test]
    fn text_runs_darken_their_region() {
        let image = rasterize_page(&page_with_run(), 1.0).unwrap();
        // Inside the run's box: x in [20, 40), top-origin y in [40, 50).
        assert_eq!(*image.get_pixel(25, 45), RUN_FILL);
        // Far corner stays white.
        assert_eq!(*image.get_pixel(190, 95), PAGE_BACKGROUND);
    }

    #[test]
    fn degenerate_page_box_is_an_error() {
        let page = PageProfile::new(3, 0.0, 792.0);
        let err = rasterize_page(&page, 1.0).unwrap_err();
        assert!(matches!(err, SatzspiegelError::Raster { page: 3, .. }));
    }

    #[test]
    fn preview_png_is_encodable() {
        let bytes = preview_png(&page_with_run(), 1.0).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
