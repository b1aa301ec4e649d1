// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout profile builder — runs geometry and typographic extraction over
// every page of a template document and aggregates the results.
//
// Pages carry no inter-page dependencies, so extraction fans out across a
// rayon pool. The merge step reassembles results by page index, never by
// completion order, so the profile is deterministic for a given document.

use rayon::prelude::*;
use satzspiegel_core::profile::{FontMap, FontSample, LayoutProfile, PageProfile};
use satzspiegel_core::{Result, SatzspiegelError};
use tracing::{info, instrument};

use crate::content::scan_page;
use crate::geometry::page_margins;
use crate::source::{PageRef, PdfSource};
use crate::typographic::extract_page;

/// Builds a [`LayoutProfile`] from a template document.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder;

impl ProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Extract the full layout profile of a template document.
    #[instrument(skip_all, fields(pages = source.page_count()))]
    pub fn build(&self, source: &PdfSource) -> Result<LayoutProfile> {
        self.build_with_progress(source, |_, _| {})
    }

    /// Extract with a progress callback receiving `(pages_done, total)`.
    /// The callback may fire out of page order; the profile never does.
    pub fn build_with_progress(
        &self,
        source: &PdfSource,
        progress: impl Fn(usize, usize) + Sync,
    ) -> Result<LayoutProfile> {
        let pages = source.pages()?;
        let total = pages.len();
        let done = std::sync::atomic::AtomicUsize::new(0);

        let mut extracted: Vec<(PageProfile, Vec<FontSample>)> = pages
            .par_iter()
            .map(|page| {
                let result = extract_one(source, page);
                let n = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                progress(n, total);
                result
            })
            .collect::<Result<Vec<_>>>()?;

        // Parallel collection preserves input order, but the profile's page
        // ordering is a contract, not an implementation detail.
        extracted.sort_by_key(|(page, _)| page.index);

        let mut profile = LayoutProfile::default();
        for (page, samples) in extracted {
            for sample in &samples {
                profile.fonts.record(sample);
            }
            profile.pages.push(page);
        }

        info!(
            pages = profile.page_count(),
            runs = profile.text_run_count(),
            fonts = profile.fonts.len(),
            tables = profile.table_candidates().len(),
            "Layout profile built"
        );
        Ok(profile)
    }
}

/// Run both extractors over a single page.
fn extract_one(source: &PdfSource, page: &PageRef) -> Result<(PageProfile, Vec<FontSample>)> {
    let spans = scan_page(source.document(), page.id, page.height).map_err(|err| {
        SatzspiegelError::Extract {
            page: page.index,
            reason: err.to_string(),
        }
    })?;

    let mut profile = PageProfile::new(page.index, page.width, page.height);
    profile.margins = page_margins(&spans, page.width, page.height);

    let extraction = extract_page(&spans, page.height);
    profile.text_runs = extraction.text_runs;
    profile.tables = extraction.tables;

    Ok((profile, extraction.font_samples))
}

/// Resolve the document-level font map for a list of samples in observation
/// order. Exposed for callers that assemble profiles by hand.
pub fn resolve_fonts(samples: &[FontSample]) -> FontMap {
    let mut fonts = FontMap::new();
    for sample in samples {
        fonts.record(sample);
    }
    fonts
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF in memory: one page per content-operation list, each page
    /// carrying a Helvetica (F1) and Times (F2) font resource.
    fn pdf_with_pages(page_ops: Vec<Vec<Operation>>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let helvetica_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let times_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Roman",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(helvetica_id),
                "F2" => Object::Reference(times_id),
            },
        });

        let mut kids = Vec::new();
        for ops in page_ops {
            let content = Content { operations: ops };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
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

    fn hello_page() -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Real(12.0)],
            ),
            Operation::new("Td", vec![Object::Integer(10), Object::Integer(700)]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn profile_captures_runs_fonts_and_margins() {
        let bytes = pdf_with_pages(vec![hello_page()]);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        let profile = ProfileBuilder::new().build(&source).unwrap();

        assert_eq!(profile.page_count(), 1);
        let page = &profile.pages[0];
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);

        assert_eq!(page.text_runs.len(), 1);
        let run = &page.text_runs[0];
        assert_eq!(run.text, "Hello");
        assert_eq!(run.x, 10.0);
        assert_eq!(run.y, 700.0);
        assert_eq!(run.font_size, 12.0);

        assert_eq!(profile.fonts.dominant(), Some(("Helvetica", 12.0)));

        let margins = page.margins.unwrap();
        assert_eq!(margins.left, 10.0);
        // Baseline at 700pt from the bottom, ascent 12pt.
        assert_eq!(margins.top, 792.0 - 712.0);
        assert_eq!(margins.bottom, 700.0);
    }

    #[test]
    fn empty_page_yields_no_margins_but_still_a_page() {
        let bytes = pdf_with_pages(vec![vec![]]);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        let profile = ProfileBuilder::new().build(&source).unwrap();

        assert_eq!(profile.page_count(), 1);
        assert!(profile.pages[0].margins.is_none());
        assert!(profile.pages[0].text_runs.is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let bytes = pdf_with_pages(vec![hello_page(), hello_page(), vec![]]);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        let builder = ProfileBuilder::new();
        let first = builder.build(&source).unwrap();
        let second = builder.build(&source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pages_stay_in_document_order() {
        let mut pages = Vec::new();
        for i in 0..6 {
            let mut ops = hello_page();
            ops[3] = Operation::new(
                "Tj",
                vec![Object::string_literal(format!("page {}", i))],
            );
            pages.push(ops);
        }
        let bytes = pdf_with_pages(pages);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        let profile = ProfileBuilder::new().build(&source).unwrap();

        for (i, page) in profile.pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert_eq!(page.text_runs[0].text, format!("page {}", i));
        }
    }

    #[test]
    fn progress_reports_every_page() {
        let bytes = pdf_with_pages(vec![hello_page(), hello_page()]);
        let source = PdfSource::from_bytes(&bytes).unwrap();
        let seen = std::sync::Mutex::new(Vec::new());
        ProfileBuilder::new()
            .build_with_progress(&source, |done, total| {
                seen.lock().unwrap().push((done, total));
            })
            .unwrap();
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn font_observation_order_resolves_last_write_wins() {
        let samples = vec![
            FontSample {
                font_name: "Arial".into(),
                size: 12.0,
            },
            FontSample {
                font_name: "Times".into(),
                size: 10.0,
            },
            FontSample {
                font_name: "Arial".into(),
                size: 14.0,
            },
        ];
        let fonts = resolve_fonts(&samples);
        assert_eq!(fonts.get("Arial"), Some(14.0));
        assert_eq!(fonts.dominant(), Some(("Arial", 14.0)));
    }
}
