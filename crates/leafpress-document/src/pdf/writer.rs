// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: assemble pages of placed images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Pages are buffered here until `finish`, because each
// one may have its own size.

use std::path::Path;

use leafpress_core::error::{LeafpressError, Result};
use leafpress_core::{PageSpec, Placement, px_to_mm};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::sink::DocumentSink;
use crate::image::NormalizedRaster;

/// Resolution at which normalized rasters are declared to the PDF, matching
/// the pixel-to-millimetre conversion used by the layout engine.
const RASTER_DPI: f32 = 96.0;

/// printpdf's default options downsample and re-encode any image over 2 MB.
/// Rasters arrive already bounded and encoded, so they are embedded as-is.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: None,
        ..PdfSaveOptions::default()
    }
}

struct PendingPage {
    spec: PageSpec,
    ops: Vec<Op>,
}

/// [`DocumentSink`] that writes a PDF with `printpdf`.
pub struct PdfWriter {
    doc: PdfDocument,
    pages: Vec<PendingPage>,
}

impl PdfWriter {
    /// Create an empty document with the given title in its metadata.
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
        }
    }

    /// Finish the document and write it to a file.
    pub fn write_to_file(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

impl DocumentSink for PdfWriter {
    fn add_page(&mut self, page: PageSpec) -> usize {
        self.pages.push(PendingPage {
            spec: page,
            ops: Vec::new(),
        });
        self.pages.len() - 1
    }

    #[instrument(skip(self, raster), fields(encoded_len = raster.encoded.len()))]
    fn place_image(
        &mut self,
        page_index: usize,
        raster: &NormalizedRaster,
        placement: &Placement,
    ) -> Result<()> {
        let page_count = self.pages.len();
        let page = self.pages.get_mut(page_index).ok_or_else(|| {
            LeafpressError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_index, page_count
            ))
        })?;

        // printpdf embeds raw pixels, so the JPEG goes back through the
        // decoder; the lossy re-encode has already shaped its content.
        let decoded = ::image::load_from_memory_with_format(
            &raster.encoded,
            ::image::ImageFormat::Jpeg,
        )
        .map_err(|err| {
            LeafpressError::ImageError(format!("failed to decode raster for PDF: {}", err))
        })?;
        let width = decoded.width() as usize;
        let height = decoded.height() as usize;
        let raw = RawImage {
            pixels: RawImageData::U8(decoded.to_rgb8().into_raw()),
            width,
            height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        // At 96 DPI the image's natural size equals its layout size in mm,
        // so the scale is simply placed size over natural size.
        let scale_x = (placement.width_mm / px_to_mm(raster.pixel_width)) as f32;
        let scale_y = (placement.height_mm / px_to_mm(raster.pixel_height)) as f32;

        // PDF user space starts at the bottom-left corner.
        let bottom_mm = page.spec.height_mm - placement.y_mm - placement.height_mm;
        let translate_x: Pt = Mm(placement.x_mm as f32).into_pt();
        let translate_y: Pt = Mm(bottom_mm as f32).into_pt();

        page.ops.push(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(translate_x),
                translate_y: Some(translate_y),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(RASTER_DPI),
                rotate: None,
            },
        });

        debug!(page_index, scale_x, scale_y, "Image placed on page");
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(LeafpressError::EmptyInput);
        }

        let pages: Vec<PdfPage> = self
            .pages
            .into_iter()
            .map(|page| {
                PdfPage::new(
                    Mm(page.spec.width_mm as f32),
                    Mm(page.spec.height_mm as f32),
                    page.ops,
                )
            })
            .collect();
        let page_count = pages.len();
        self.doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&save_options(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        debug!(page_count, output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}
