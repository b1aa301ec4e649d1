// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry primitives — bounding boxes and derived page margins.
//
// Bounding boxes are expressed in the top-left-origin frame used by the
// extraction layer (y grows downward), matching how text queries report
// positions. The rendering layer converts to the bottom-origin canvas frame
// via `units::flip_y`.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `(x0, y0, x1, y1)` enclosing a page element.
///
/// `x0 <= x1` and `y0 <= y1` hold for every box produced by extraction;
/// `union` preserves that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Page margins in points, derived from the union bounding box of all
/// content elements relative to the physical page box.
///
/// Values may be negative when an element overflows the nominal page
/// rectangle; overflow is preserved exactly, never clamped. A page with no
/// elements has no margins at all — callers represent that as
/// `Option<PageMargins>::None` rather than a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PageMargins {
    /// Derive margins from the content union box and the page dimensions.
    ///
    /// `content` is in the top-left-origin frame: `left = x0`, `top = y0`,
    /// `right = page_width - x1`, `bottom = page_height - y1`.
    pub fn from_content_box(content: &BoundingBox, page_width: f32, page_height: f32) -> Self {
        Self {
            left: content.x0,
            top: content.y0,
            right: page_width - content.x1,
            bottom: page_height - content.y1,
        }
    }
}
