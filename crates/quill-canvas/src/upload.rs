// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload flow: classify an uploaded file, render its preview where one can
// be produced, and park it in the session store for the editor to pick up.

use quill_bridge::PageRenderer;
use quill_core::error::Result;
use quill_core::{DocumentId, DocumentType, UploadedFile};
use quill_document::classify_upload;
use tracing::{debug, info, instrument, warn};

use crate::session::SessionStore;

/// What the editor needs to open a freshly uploaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    pub id: DocumentId,
    pub name: String,
    /// `None` when the upload matched no known format.
    pub document_type: Option<DocumentType>,
    /// Whether a preview was stored under `id`.
    pub has_preview: bool,
}

pub struct UploadFlow<'a, R> {
    renderer: &'a R,
    store: &'a mut SessionStore,
}

impl<'a, R: PageRenderer> UploadFlow<'a, R> {
    pub fn new(renderer: &'a R, store: &'a mut SessionStore) -> Self {
        Self { renderer, store }
    }

    /// Images and PDFs get a stored preview. Word processor files and
    /// unrecognised types open without one. Renderer failures are errors.
    #[instrument(skip_all, fields(name = %file.name, bytes_len = file.bytes.len()))]
    pub fn prepare(&mut self, file: &UploadedFile) -> Result<PreparedDocument> {
        let document_type = classify_upload(file);
        let id = DocumentId::new();

        let has_preview = match document_type {
            None => {
                debug!("Unrecognised document type, opening without preview");
                false
            }
            Some(DocumentType::WordProcessor) => {
                warn!("No preview available for word processor documents");
                false
            }
            Some(_) => {
                let page = self.renderer.render_first_page(file)?;
                self.store.put(id, page);
                true
            }
        };

        info!(document_id = %id, ?document_type, has_preview, "Document prepared");
        Ok(PreparedDocument {
            id,
            name: file.name.clone(),
            document_type,
            has_preview,
        })
    }
}
