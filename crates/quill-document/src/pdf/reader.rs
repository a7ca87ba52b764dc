// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: inspect uploaded PDF documents and reduce them to
// their first page, using the `lopdf` crate.

use lopdf::{Document, Object, ObjectId};
use quill_core::error::QuillError;
use tracing::{debug, info, instrument};

/// Reads and inspects existing PDF files.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, QuillError> {
        let document = Document::load_mem(data).map_err(|err| {
            QuillError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of a page (1-indexed), from its /MediaBox.
    ///
    /// The box is looked up on the page first, then on its ancestors in the
    /// page tree, since /MediaBox is inheritable.
    pub fn page_size_pt(&self, page_number: u32) -> Result<(f64, f64), QuillError> {
        let page_id = self.page_id(page_number)?;
        let mut current = Some(page_id);
        while let Some(id) = current {
            let dict = self
                .document
                .get_object(id)
                .and_then(|obj| obj.as_dict())
                .map_err(|err| QuillError::PdfError(format!("page tree node {:?}: {}", id, err)))?;
            if let Some(size) = media_box_size(&self.document, dict) {
                return Ok(size);
            }
            current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
        }
        Err(QuillError::PdfError(format!(
            "page {} has no /MediaBox",
            page_number
        )))
    }

    // -- Extraction -----------------------------------------------------------

    /// Serialise a copy of the document that keeps only page one.
    ///
    /// Pages are dropped from the page tree, so inherited resources and
    /// boxes on the first page survive.
    #[instrument(skip(self))]
    pub fn first_page_only(&self) -> Result<Vec<u8>, QuillError> {
        let total = self.page_count() as u32;
        if total == 0 {
            return Err(QuillError::PdfError("document has no pages".into()));
        }

        let mut document = self.document.clone();
        if total > 1 {
            let drop: Vec<u32> = (2..=total).collect();
            document.delete_pages(&drop);
            document.prune_objects();
            info!(dropped = drop.len(), "Reduced PDF to its first page");
        }

        let mut output = Vec::new();
        document.save_to(&mut output).map_err(|err| {
            QuillError::PdfError(format!("failed to serialise first page: {}", err))
        })?;

        debug!(output_bytes = output.len(), "First page extracted");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    fn page_id(&self, page_number: u32) -> Result<ObjectId, QuillError> {
        let pages = self.document.get_pages();
        // lopdf pages are keyed by 1-indexed page number.
        pages.get(&page_number).copied().ok_or_else(|| {
            QuillError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })
    }
}

fn media_box_size(document: &Document, dict: &lopdf::Dictionary) -> Option<(f64, f64)> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => document.get_object(*id).ok()?,
        other => other,
    };
    let corners = resolved.as_array().ok()?;
    if corners.len() != 4 {
        return None;
    }
    let number = |obj: &Object| match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    };
    let (llx, lly) = (number(&corners[0])?, number(&corners[1])?);
    let (urx, ury) = (number(&corners[2])?, number(&corners[3])?);
    Some(((urx - llx).abs(), (ury - lly).abs()))
}
