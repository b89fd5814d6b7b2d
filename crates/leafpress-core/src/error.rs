// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Leafpress.

use thiserror::Error;

/// Top-level error type for all Leafpress operations.
#[derive(Debug, Error)]
pub enum LeafpressError {
    // -- Export errors --
    #[error("nothing to export: the working set is empty")]
    EmptyInput,

    #[error("image {index} could not be decoded: {reason}")]
    Decode { index: usize, reason: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("image {index} could not be prepared: {reason}")]
    Prepare { index: usize, reason: String },

    #[error("export cancelled")]
    Cancelled,

    // -- Document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("background task failed: {0}")]
    Task(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LeafpressError {
    /// Index of the working item that caused the failure, if any.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Decode { index, .. } | Self::Prepare { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Attach an item index to a per-item failure raised without one.
    /// Processing and worker failures become [`Self::Prepare`].
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Self::Decode { reason, .. } => Self::Decode { index, reason },
            Self::Prepare { reason, .. } | Self::ImageError(reason) | Self::Task(reason) => {
                Self::Prepare { index, reason }
            }
            other => other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LeafpressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_reports_index() {
        let err = LeafpressError::Decode {
            index: 0,
            reason: "bad header".into(),
        }
        .at_index(3);
        assert_eq!(err.item_index(), Some(3));
        assert_eq!(err.to_string(), "image 3 could not be decoded: bad header");
    }

    #[test]
    fn other_errors_have_no_index() {
        assert_eq!(LeafpressError::EmptyInput.item_index(), None);
        let err = LeafpressError::Validation("margin".into()).at_index(2);
        assert!(matches!(err, LeafpressError::Validation(_)));
    }

    #[test]
    fn processing_failure_gains_index() {
        let err = LeafpressError::ImageError("JPEG encoding failed".into()).at_index(5);
        assert_eq!(err.item_index(), Some(5));
        assert!(matches!(err, LeafpressError::Prepare { index: 5, .. }));
        assert!(err.to_string().contains("JPEG encoding failed"));

        let err = LeafpressError::Task("worker panicked".into()).at_index(2);
        assert_eq!(err.item_index(), Some(2));
    }
}
