// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembly seam: the export loop declares pages and places images
// through this trait, so the PDF backend can be swapped or recorded in tests.

use leafpress_core::error::Result;
use leafpress_core::{PageSpec, Placement};

use crate::image::NormalizedRaster;

/// Receives pages and image placements, in millimetres, and produces the
/// finished document bytes.
pub trait DocumentSink {
    /// Append a page of the given size. Returns its zero-based index.
    fn add_page(&mut self, page: PageSpec) -> usize;

    /// Draw `raster` on page `page_index` at `placement`, measured from the
    /// page's top-left corner.
    fn place_image(
        &mut self,
        page_index: usize,
        raster: &NormalizedRaster,
        placement: &Placement,
    ) -> Result<()>;

    /// Number of pages declared so far.
    fn page_count(&self) -> usize;

    /// Serialise the document.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}
