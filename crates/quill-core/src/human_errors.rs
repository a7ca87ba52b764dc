// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the editor's alerts.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the host presents the notice.

use crate::error::QuillError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something timed out or was busy; trying again usually works.
    Transient,
    /// The user has to do something first (draw a signature, pick a file).
    ActionRequired,
    /// Retrying will not help: wrong file type, broken file, bad settings.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether offering a "Try again" button makes sense.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable: severity == Severity::Transient,
            severity,
        }
    }
}

/// Convert a `QuillError` into a `HumanError` suitable for an alert.
pub fn humanize_error(err: &QuillError) -> HumanError {
    match err {
        // -- Document / preview --
        QuillError::UnsupportedDocument(detail) => HumanError::new(
            "This type of document isn't supported.",
            format!("Upload a PDF, PNG, or JPEG instead. (File type: {detail})"),
            Severity::Permanent,
        ),

        QuillError::RenderFailed(_) => HumanError::new(
            "We couldn't prepare a preview of this document.",
            "The file may be damaged or password protected. Try exporting it to PDF again and re-uploading.",
            Severity::Permanent,
        ),

        QuillError::RendererUnavailable => HumanError::new(
            "Previews for this document type aren't available here.",
            "Convert the first page to an image (PNG or JPEG) and upload that instead.",
            Severity::Permanent,
        ),

        QuillError::PdfError(_) => HumanError::new(
            "There's a problem with this PDF file.",
            "The file may be damaged. Try opening it in another viewer first, or try a different file.",
            Severity::Permanent,
        ),

        QuillError::ImageError(_) => HumanError::new(
            "There's a problem with this image.",
            "The image may be damaged or in an unusual format. Try saving it as a PNG first.",
            Severity::Permanent,
        ),

        QuillError::FontError(detail) => HumanError::new(
            "The handwriting style couldn't be loaded.",
            format!("Pick a different style and try again. ({detail})"),
            Severity::ActionRequired,
        ),

        // -- Capture --
        QuillError::EmptyCapture => HumanError::new(
            "There's no signature yet.",
            "Draw or type your signature before saving it.",
            Severity::ActionRequired,
        ),

        QuillError::NoCaptureOpen => HumanError::new(
            "No field is waiting for a signature.",
            "Select a signature field first, then draw or upload your signature.",
            Severity::ActionRequired,
        ),

        // -- Export --
        QuillError::ExportInProgress => HumanError::new(
            "Your document is already being generated.",
            "Wait for the current download to finish.",
            Severity::Transient,
        ),

        QuillError::NothingToExport => HumanError::new(
            "There's nothing to sign yet.",
            "Add at least one field to the page before downloading.",
            Severity::ActionRequired,
        ),

        QuillError::RasterizeFailed(_) | QuillError::PackagingFailed(_) => HumanError::new(
            "An error occurred while generating your PDF.",
            "Your fields are unchanged. Try downloading again.",
            Severity::Transient,
        ),

        QuillError::SettleTimeout { .. } => HumanError::new(
            "The page took too long to redraw.",
            "Close other busy windows and try downloading again.",
            Severity::Transient,
        ),

        QuillError::SettleAborted { .. } => HumanError::new(
            "The page stopped redrawing before the download could start.",
            "Reopen the document and try downloading again.",
            Severity::Transient,
        ),

        // -- Collaborators --
        QuillError::Suggestion(_) => HumanError::new(
            "Smart field detection isn't available right now.",
            "You can still add fields from the toolbox.",
            Severity::Transient,
        ),

        // -- Configuration / files --
        QuillError::ConfigInvalid(detail) => HumanError::new(
            "The editor settings aren't valid.",
            format!("Fix or remove the settings file. ({detail})"),
            Severity::Permanent,
        ),

        QuillError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError::new(
                "The file couldn't be found.",
                "It may have been moved or deleted. Try choosing the file again.",
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => HumanError::new(
                "We don't have permission to use that file.",
                "Check the file permissions, or save to a different folder.",
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, your disk may be full.",
                Severity::Transient,
            ),
        },

        QuillError::Serialization(_) => HumanError::new(
            "Some data couldn't be read.",
            "Check that the file is valid JSON and try again.",
            Severity::Permanent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_failure_is_retriable() {
        let human = humanize_error(&QuillError::RasterizeFailed("canvas tainted".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn empty_capture_asks_for_action() {
        let human = humanize_error(&QuillError::EmptyCapture);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn unsupported_document_is_permanent() {
        let human = humanize_error(&QuillError::UnsupportedDocument("application/zip".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("application/zip"));
    }

    #[test]
    fn aborted_settle_is_transient() {
        let human = humanize_error(&QuillError::SettleAborted { epoch: 3 });
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = QuillError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
