// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-stream scanning — walks a page's decoded operator list and
// produces positioned text spans.
//
// Only the text-object subset of the operator set is interpreted (BT/ET,
// Tf, Td/TD/Tm/T*/TL, Tj/TJ/'/", q/Q). Path and image operators do not
// contribute spans. The scanner tracks the text line origin rather than the
// full transformation matrix; rotated or skewed text is recorded at its
// translation component, which is the best-effort behavior expected of a
// word-level extractor.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use satzspiegel_core::geometry::BoundingBox;
use satzspiegel_core::units::flip_y;
use satzspiegel_core::{Result, SatzspiegelError};
use tracing::{debug, instrument, trace};

use crate::source::{inherited_attribute, object_as_f32, resolve};

/// Average glyph width as a fraction of the font size, used to estimate
/// span extents without font metrics (matches Helvetica at typical sizes).
const AVG_GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// One positioned text span in extraction order.
///
/// Vertical positions are reported in the top-left-origin frame: `top` is
/// the distance from the page's top edge down to the span's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge of the span, in points.
    pub x: f32,
    /// Baseline offset from the top of the page, in points.
    pub top: f32,
    /// Estimated advance width, in points.
    pub width: f32,
    /// Resolved base font name (subset prefix stripped).
    pub font_name: String,
    /// Font size in points; positive for every emitted span.
    pub font_size: f32,
}

impl TextSpan {
    /// Approximate bounding box in the top-left-origin frame. The ascent is
    /// approximated by the font size.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.x,
            self.top - self.font_size,
            self.x + self.width,
            self.top,
        )
    }
}

/// Scan one page's content stream into ordered text spans.
#[instrument(skip(doc), fields(page = ?page_id))]
pub fn scan_page(doc: &Document, page_id: ObjectId, page_height: f32) -> Result<Vec<TextSpan>> {
    let fonts = page_fonts(doc, page_id);
    let raw = doc.get_page_content(page_id).map_err(|err| {
        SatzspiegelError::Parse(format!("cannot read content of page {:?}: {}", page_id, err))
    })?;
    let content = Content::decode(&raw).map_err(|err| {
        SatzspiegelError::Parse(format!(
            "cannot decode content stream of page {:?}: {}",
            page_id, err
        ))
    })?;

    let spans = scan_operations(&content, &fonts, page_height);
    debug!(spans = spans.len(), "Content stream scanned");
    Ok(spans)
}

/// Text-state subset tracked across operators.
#[derive(Debug, Clone)]
struct TextState {
    font_name: String,
    font_size: f32,
    leading: f32,
    /// Text line origin in bottom-left canvas coordinates.
    line_x: f32,
    line_y: f32,
    /// Horizontal cursor within the current line.
    cursor_x: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            font_name: String::new(),
            font_size: 0.0,
            leading: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            cursor_x: 0.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx;
        self.line_y += ty;
        self.cursor_x = self.line_x;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }
}

/// Interpret decoded operations into spans. Exposed at crate level so tests
/// can drive it with synthetic operator lists.
pub(crate) fn scan_operations(
    content: &Content,
    fonts: &HashMap<Vec<u8>, String>,
    page_height: f32,
) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut ts = TextState::new();
    let mut state_stack: Vec<TextState> = Vec::new();

    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" | "ET" => {
                ts.line_x = 0.0;
                ts.line_y = 0.0;
                ts.cursor_x = 0.0;
            }
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(object_as_f32))
                {
                    ts.font_name = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                    ts.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(object_as_f32) {
                    ts.leading = leading;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(object_as_f32),
                    operands.get(1).and_then(object_as_f32),
                ) {
                    ts.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (
                    operands.first().and_then(object_as_f32),
                    operands.get(1).and_then(object_as_f32),
                ) {
                    ts.leading = -ty;
                    ts.move_line(tx, ty);
                }
            }
            "Tm" => {
                // Only the translation component is honored; see module docs.
                if let (Some(e), Some(f)) = (
                    operands.get(4).and_then(object_as_f32),
                    operands.get(5).and_then(object_as_f32),
                ) {
                    ts.line_x = e;
                    ts.line_y = f;
                    ts.cursor_x = e;
                }
            }
            "T*" => ts.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    emit_span(&mut spans, &mut ts, bytes, page_height);
                }
            }
            "'" => {
                ts.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    emit_span(&mut spans, &mut ts, bytes, page_height);
                }
            }
            "\"" => {
                // Word/character spacing operands are not tracked.
                ts.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    emit_span(&mut spans, &mut ts, bytes, page_height);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    scan_tj_array(&mut spans, &mut ts, items, page_height);
                }
            }
            "q" => state_stack.push(ts.clone()),
            "Q" => {
                if let Some(saved) = state_stack.pop() {
                    ts = saved;
                }
            }
            other => trace!(operator = other, "operator skipped"),
        }
    }

    spans
}

/// A TJ array interleaves strings with kerning adjustments (thousandths of
/// the font size, positive values tightening). The whole array becomes one
/// span; adjustments only move the cursor.
fn scan_tj_array(
    spans: &mut Vec<TextSpan>,
    ts: &mut TextState,
    items: &[Object],
    page_height: f32,
) {
    let start_x = ts.cursor_x;
    let mut text = String::new();
    let mut advance = 0.0f32;

    for item in items {
        match item {
            Object::String(bytes, _) => {
                let fragment = decode_pdf_string(bytes);
                advance += estimate_width(&fragment, ts.font_size);
                text.push_str(&fragment);
            }
            other => {
                if let Some(adjust) = object_as_f32(other) {
                    advance -= adjust / 1000.0 * ts.font_size;
                }
            }
        }
    }

    ts.cursor_x = start_x + advance;
    if !text.is_empty() && ts.font_size > 0.0 {
        spans.push(TextSpan {
            text,
            x: start_x,
            top: flip_y(ts.line_y, page_height),
            width: advance,
            font_name: ts.font_name.clone(),
            font_size: ts.font_size,
        });
    }
}

fn emit_span(spans: &mut Vec<TextSpan>, ts: &mut TextState, bytes: &[u8], page_height: f32) {
    let text = decode_pdf_string(bytes);
    let width = estimate_width(&text, ts.font_size);
    let x = ts.cursor_x;
    ts.cursor_x += width;

    if !text.is_empty() && ts.font_size > 0.0 {
        spans.push(TextSpan {
            text,
            x,
            top: flip_y(ts.line_y, page_height),
            width,
            font_name: ts.font_name.clone(),
            font_size: ts.font_size,
        });
    }
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    AVG_GLYPH_WIDTH_FACTOR * font_size * text.chars().count() as f32
}

/// Decode a PDF string: UTF-16BE when the byte-order mark is present,
/// Latin-1 otherwise. Unmappable UTF-16 units become replacement chars.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

/// Map the page's font resource names to their base font names.
///
/// Subset-embedded fonts carry a six-letter tag (`ABCDEF+Times`); the tag
/// is stripped so samples for the same face coalesce.
pub(crate) fn page_fonts(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, String> {
    let mut fonts = HashMap::new();

    let Some(page_dict) = doc
        .get_object(page_id)
        .ok()
        .and_then(|obj| obj.as_dict().ok())
    else {
        return fonts;
    };
    let Some(resources) = inherited_attribute(doc, page_dict, b"Resources") else {
        return fonts;
    };
    let Object::Dictionary(resources) = resolve(doc, resources) else {
        return fonts;
    };
    let Ok(font_dict) = resources.get(b"Font") else {
        return fonts;
    };
    let Object::Dictionary(font_dict) = resolve(doc, font_dict) else {
        return fonts;
    };

    for (resource_name, font_obj) in font_dict.iter() {
        let base = match resolve(doc, font_obj) {
            Object::Dictionary(d) => match d.get(b"BaseFont").map(|o| resolve(doc, o)) {
                Ok(Object::Name(name)) => strip_subset_prefix(&String::from_utf8_lossy(name)),
                _ => String::from_utf8_lossy(resource_name).into_owned(),
            },
            _ => String::from_utf8_lossy(resource_name).into_owned(),
        };
        fonts.insert(resource_name.clone(), base);
    }

    fonts
}

fn strip_subset_prefix(name: &str) -> String {
    match name.split_once('+') {
        Some((prefix, rest)) if prefix.len() == 6 && prefix.chars().all(|c| c.is_ascii_uppercase()) => {
            rest.to_string()
        }
        _ => name.to_string(),
    }
}
