// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF source — open an existing PDF and expose its page list with physical
// dimensions, using the `lopdf` crate. Read-only; extraction never mutates
// the source document.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use satzspiegel_core::{Result, SatzspiegelError};
use tracing::{debug, info, instrument};

/// A reference to one page of an opened source document.
#[derive(Debug, Clone, Copy)]
pub struct PageRef {
    /// Zero-based page index.
    pub index: usize,
    /// lopdf object id of the page dictionary.
    pub id: ObjectId,
    /// Physical width in points.
    pub width: f32,
    /// Physical height in points.
    pub height: f32,
}

/// Wraps `lopdf::Document` and provides page enumeration with resolved
/// media boxes.
#[derive(Debug)]
pub struct PdfSource {
    document: Document,
    source_path: Option<String>,
}

impl PdfSource {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            SatzspiegelError::Parse(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a source from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            SatzspiegelError::Parse(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the source was created via [`PdfSource::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Enumerate pages in document order with resolved physical dimensions.
    ///
    /// lopdf keys pages by 1-indexed page number; the returned list is
    /// re-indexed from zero.
    pub fn pages(&self) -> Result<Vec<PageRef>> {
        let mut refs = Vec::with_capacity(self.page_count());
        for (number, id) in self.document.get_pages() {
            let index = (number - 1) as usize;
            let (width, height) = self.media_box(id).ok_or_else(|| {
                SatzspiegelError::Parse(format!("page {} has no resolvable /MediaBox", number))
            })?;
            refs.push(PageRef {
                index,
                id,
                width,
                height,
            });
        }
        Ok(refs)
    }

    // -- Helpers --------------------------------------------------------------

    /// Resolve the page's /MediaBox, following the /Parent chain for
    /// inherited attributes, and return (width, height) in points.
    fn media_box(&self, page_id: ObjectId) -> Option<(f32, f32)> {
        let dict = self.document.get_object(page_id).ok()?.as_dict().ok()?;
        let media_box = inherited_attribute(&self.document, dict, b"MediaBox")?;
        let rect = match resolve(&self.document, media_box) {
            Object::Array(values) if values.len() == 4 => values,
            _ => return None,
        };
        let nums: Vec<f32> = rect
            .iter()
            .map(|v| object_as_f32(resolve(&self.document, v)))
            .collect::<Option<Vec<f32>>>()?;
        Some((nums[2] - nums[0], nums[3] - nums[1]))
    }
}

/// Look up an inheritable page attribute, walking /Parent references.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    mut dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    loop {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").ok()?;
        dict = match resolve(doc, parent) {
            Object::Dictionary(d) => d,
            _ => return None,
        };
    }
}

/// Follow a reference to its target object; non-references pass through.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(&Object::Null),
        other => other,
    }
}

/// Numeric value of an Integer or Real object.
pub(crate) fn object_as_f32(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Build a minimal one-page PDF entirely in memory.
    fn one_page_pdf(width: f32, height: f32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn pages_report_media_box_dimensions() {
        let bytes = one_page_pdf(612.0, 792.0);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        assert_eq!(source.page_count(), 1);

        let pages = source.pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].index, 0);
        assert_eq!(pages[0].width, 612.0);
        assert_eq!(pages[0].height, 792.0);
    }

    #[test]
    fn garbage_bytes_are_a_parse_failure() {
        let err = PdfSource::from_bytes(b"not a pdf").unwrap_err();
        assert!(matches!(err, SatzspiegelError::Parse(_)));
    }
}
