// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// leafpress-document: Turn an ordered set of images into a PDF.
//
// Provides image normalization (decode, rotate, bound, re-encode as JPEG), the
// page layout engine (fixed paper or fit-to-content), the working set of
// staged images, PDF assembly via `printpdf`, PDF inspection via `lopdf`, and
// the async export pipeline tying them together.

pub mod export;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod working_set;

// Re-export the primary types so callers can use `leafpress_document::Exporter` etc.
pub use export::{CancelToken, ExportProgress, ExportedDocument, Exporter};
pub use crate::image::{ImageProcessor, NormalizedRaster, normalize};
pub use layout::{PageLayout, PagePlan, layout};
pub use pdf::{DocumentSink, PdfInspector, PdfWriter};
pub use working_set::{WorkingItem, WorkingSet};
