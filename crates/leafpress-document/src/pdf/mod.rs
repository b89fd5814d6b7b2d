// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: the document assembly seam, the printpdf-backed writer, and a
// lopdf-backed inspector for finished documents.

pub mod inspect;
pub mod sink;
pub mod writer;

pub use inspect::PdfInspector;
pub use sink::DocumentSink;
pub use writer::PdfWriter;
