// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Template applier — draws a layout profile onto a fresh PDF, one output
// page per target-document page, using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. The whole document is assembled in memory and
// written in one step, so a failed run never leaves a half-written artifact.

use std::path::Path;

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Pt, Rgb, TextItem,
};
use satzspiegel_core::config::{TablePolicy, TransferOptions};
use satzspiegel_core::profile::{LayoutProfile, TableGrid, TextRun};
use satzspiegel_core::units::points_to_mm;
use satzspiegel_core::{Result, SatzspiegelError};
use tracing::{debug, info, instrument};

use crate::fonts::resolve_builtin;

/// US Letter in points; used for output pages beyond the template's extent,
/// where no template page size is available.
const LETTER_PT: (f32, f32) = (612.0, 792.0);

/// Horizontal inset of cell text from its cell's left edge, in points.
const CELL_PADDING_X: f32 = 2.0;

/// Baseline lift of cell text above its cell's bottom edge, in points.
const CELL_PADDING_Y: f32 = 5.0;

/// Replays a [`LayoutProfile`] onto a new document.
///
/// The target document contributes only its page count; its content is
/// never consulted. The profile may be applied any number of times.
pub struct TemplateApplier {
    options: TransferOptions,
}

impl Default for TemplateApplier {
    fn default() -> Self {
        Self::new(TransferOptions::default())
    }
}

impl TemplateApplier {
    pub fn new(options: TransferOptions) -> Self {
        Self { options }
    }

    /// Apply the profile for a target with `target_page_count` pages and
    /// return the finished PDF as bytes.
    ///
    /// Emits exactly one output page per target page. Pages past the
    /// template's extent come out blank; that is the documented behavior
    /// for an exhausted template, not an error.
    #[instrument(skip_all, fields(template_pages = profile.page_count(), target_page_count))]
    pub fn apply(&self, profile: &LayoutProfile, target_page_count: usize) -> Result<Vec<u8>> {
        let dominant = profile
            .fonts
            .dominant()
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| self.options.fallback_font.clone());
        let font = resolve_builtin(&dominant);
        info!(dominant, ?font, "Applying template");

        let candidates = profile.table_candidates();
        let mut pages = Vec::with_capacity(target_page_count);

        for index in 0..target_page_count {
            let (width_pt, height_pt) = profile
                .pages
                .get(index)
                .map(|p| (p.width, p.height))
                .unwrap_or(LETTER_PT);

            let mut ops: Vec<Op> = Vec::new();

            if let Some(template_page) = profile.pages.get(index) {
                for run in &template_page.text_runs {
                    push_text_run(&mut ops, run, font);
                }
            }

            let grid = match self.options.table_policy {
                TablePolicy::FirstGlobal => {
                    // While the template still has table candidates at this
                    // index, draw the first grid found anywhere in the
                    // template.
                    (index < candidates.len())
                        .then(|| candidates.first().copied())
                        .flatten()
                }
                TablePolicy::PerPage => profile
                    .pages
                    .get(index)
                    .and_then(|page| page.table_candidate()),
            };
            if let Some(grid) = grid {
                self.push_table(&mut ops, grid);
            }

            debug!(page = index, ops = ops.len(), "Output page assembled");
            pages.push(PdfPage::new(
                Mm(points_to_mm(width_pt)),
                Mm(points_to_mm(height_pt)),
                ops,
            ));
        }

        let mut doc = PdfDocument::new("Satzspiegel Transfer");
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = bytes.len(),
            warnings = warnings.len(),
            "Output serialised"
        );
        Ok(bytes)
    }

    /// Apply and write the result to a file in a single save at the end.
    pub fn apply_to_file(
        &self,
        profile: &LayoutProfile,
        target_page_count: usize,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.apply(profile, target_page_count)?;
        std::fs::write(path.as_ref(), &bytes).map_err(|err| {
            SatzspiegelError::SinkWrite(format!(
                "cannot write {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!("Wrote transfer output to {}", path.as_ref().display());
        Ok(())
    }

    /// Draw a bordered grid: fixed column width and row height, black grid
    /// lines, uniform cell font. The configured origin is the grid's
    /// lower-left corner.
    fn push_table(&self, ops: &mut Vec<Op>, grid: &TableGrid) {
        let rows = grid.row_count();
        let columns = grid.column_count();
        if rows == 0 || columns == 0 {
            return;
        }

        let (x0, y0) = self.options.table_origin;
        let width = columns as f32 * self.options.column_width;
        let height = rows as f32 * self.options.row_height;
        let y_top = y0 + height;

        ops.push(Op::SetOutlineColor {
            col: Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(self.options.grid_line_width),
        });

        for r in 0..=rows {
            let y = y0 + r as f32 * self.options.row_height;
            ops.push(straight_line((x0, y), (x0 + width, y)));
        }
        for c in 0..=columns {
            let x = x0 + c as f32 * self.options.column_width;
            ops.push(straight_line((x, y0), (x, y_top)));
        }

        let cell_font = resolve_builtin(&self.options.fallback_font);
        for (r, row) in grid.rows.iter().enumerate() {
            // Row 0 is the top row of the grid.
            let baseline = y_top - (r + 1) as f32 * self.options.row_height + CELL_PADDING_Y;
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let x = x0 + c as f32 * self.options.column_width + CELL_PADDING_X;
                push_text(
                    ops,
                    text,
                    x,
                    baseline,
                    cell_font,
                    self.options.cell_font_size,
                );
            }
        }
    }
}

fn push_text_run(ops: &mut Vec<Op>, run: &TextRun, font: BuiltinFont) {
    push_text(ops, &run.text, run.x, run.y, font, run.font_size);
}

fn push_text(ops: &mut Vec<Op>, text: &str, x: f32, y: f32, font: BuiltinFont, size: f32) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}

fn straight_line(from: (f32, f32), to: (f32, f32)) -> Op {
    Op::DrawLine {
        line: Line {
            points: vec![
                LinePoint {
                    p: Point {
                        x: Pt(from.0),
                        y: Pt(from.1),
                    },
                    bezier: false,
                },
                LinePoint {
                    p: Point {
                        x: Pt(to.0),
                        y: Pt(to.1),
                    },
                    bezier: false,
                },
            ],
            is_closed: false,
        },
    }
}
