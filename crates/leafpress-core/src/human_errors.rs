// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the export flow.
//
// Every technical error is mapped to plain English with a clear suggestion the
// UI can show next to the image grid.

use crate::error::LeafpressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (add images, fix a setting).
    ActionRequired,
    /// Retrying will not help; the input itself is unusable.
    Permanent,
    /// Something environmental went wrong; trying again may work.
    Transient,
    /// The user stopped the export themselves.
    Cancelled,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Position of the offending image in the working set, when known.
    pub item_index: Option<usize>,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `LeafpressError` into a `HumanError`.
pub fn humanize_error(err: &LeafpressError) -> HumanError {
    let item_index = err.item_index();
    let (message, suggestion, severity) = match err {
        LeafpressError::EmptyInput => (
            "There are no images to export.".to_string(),
            "Add at least one image, then try again.".to_string(),
            Severity::ActionRequired,
        ),

        LeafpressError::Decode { index, .. } => (
            format!("Image {} couldn't be read.", index + 1),
            "The file may be damaged or in an unusual format. Remove it or save it as a JPEG or PNG first.".to_string(),
            Severity::Permanent,
        ),

        LeafpressError::Validation(detail) => (
            "Those page settings can't be used.".to_string(),
            format!("Check the paper size and margin, then try again. ({detail})"),
            Severity::ActionRequired,
        ),

        LeafpressError::Cancelled => (
            "The export was cancelled.".to_string(),
            "Your images are still here. Export again whenever you're ready.".to_string(),
            Severity::Cancelled,
        ),

        LeafpressError::Prepare { index, .. } => (
            format!("Image {} couldn't be prepared for the PDF.", index + 1),
            "Try a smaller export size, or remove the image and add it again.".to_string(),
            Severity::Transient,
        ),

        LeafpressError::ImageError(_) => (
            "An image couldn't be prepared for the PDF.".to_string(),
            "Try exporting again. If it keeps failing, remove the image and add it again.".to_string(),
            Severity::Transient,
        ),

        LeafpressError::PdfError(_) | LeafpressError::Task(_) => (
            "The PDF couldn't be created.".to_string(),
            "Try exporting again. If this keeps happening, please report it.".to_string(),
            Severity::Transient,
        ),

        LeafpressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                (
                    "The PDF couldn't be saved there.".to_string(),
                    "Choose a different folder you have permission to write to.".to_string(),
                    Severity::ActionRequired,
                )
            } else {
                (
                    "There was a problem writing the file.".to_string(),
                    "Try again. If this keeps happening, your device's storage may be full.".to_string(),
                    Severity::Transient,
                )
            }
        }

        LeafpressError::Serialization(_) => (
            "The saved settings couldn't be read.".to_string(),
            "The settings file may be damaged. Reset the export settings and try again.".to_string(),
            Severity::ActionRequired,
        ),
    };

    HumanError {
        message,
        suggestion,
        item_index,
        severity,
    }
}
