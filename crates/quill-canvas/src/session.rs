// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session-scoped preview store. Holds the rendered first page of each
// uploaded document until the editing session ends.

use std::collections::HashMap;

use quill_core::{DocumentId, PageImage};
use tracing::{debug, info};

/// Key under which a document's preview is known to the host.
pub fn preview_key(id: DocumentId) -> String {
    format!("preview_{id}")
}

/// In-memory `DocumentId -> PageImage` map. Emptied by
/// [`end_session`](Self::end_session) and when dropped.
#[derive(Debug, Default)]
pub struct SessionStore {
    previews: HashMap<DocumentId, PageImage>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a preview, replacing any earlier one for the same document.
    pub fn put(&mut self, id: DocumentId, page: PageImage) {
        debug!(key = %preview_key(id), bytes_len = page.bytes.len(), "Preview stored");
        self.previews.insert(id, page);
    }

    pub fn get(&self, id: DocumentId) -> Option<&PageImage> {
        self.previews.get(&id)
    }

    /// Remove and return a preview.
    pub fn take(&mut self, id: DocumentId) -> Option<PageImage> {
        self.previews.remove(&id)
    }

    pub fn remove(&mut self, id: DocumentId) -> bool {
        self.previews.remove(&id).is_some()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.previews.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Discard every stored preview.
    pub fn end_session(&mut self) {
        if !self.previews.is_empty() {
            info!(previews = self.previews.len(), "Session previews cleared");
        }
        self.previews.clear();
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.end_session();
    }
}
