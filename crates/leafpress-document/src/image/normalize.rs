// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image normalizer: turns a source image of any resolution into a bounded
// JPEG raster ready for embedding.

use leafpress_core::error::{LeafpressError, Result};
use leafpress_core::{Rotation, SourceImage};
use tracing::{debug, instrument};

use super::processor::ImageProcessor;

/// A resampled, re-encoded image ready to be placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRaster {
    /// Baseline JPEG bytes.
    pub encoded: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl NormalizedRaster {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }
}

/// Decode `source`, apply `rotation`, shrink so neither side exceeds
/// `max_dimension_px`, and re-encode as JPEG at `quality` in (0, 1].
///
/// Undecodable input yields [`LeafpressError::Decode`] with index 0.
#[instrument(skip(source), fields(bytes_len = source.len(), media_type = %source.media_type))]
pub fn normalize(
    source: &SourceImage,
    rotation: Rotation,
    max_dimension_px: u32,
    quality: f32,
) -> Result<NormalizedRaster> {
    if max_dimension_px == 0 {
        return Err(LeafpressError::Validation(
            "maximum dimension must be greater than zero".into(),
        ));
    }
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(LeafpressError::Validation(format!(
            "quality must be in (0, 1], got {quality}"
        )));
    }

    let processor = ImageProcessor::from_bytes(&source.data)?
        .rotate(rotation)
        .fit_within(max_dimension_px);
    let (pixel_width, pixel_height) = (processor.width(), processor.height());
    let encoded = processor.to_jpeg_bytes(quality)?;

    debug!(
        rotation = rotation.degrees(),
        pixel_width,
        pixel_height,
        encoded_len = encoded.len(),
        "Image normalized"
    );

    Ok(NormalizedRaster {
        encoded,
        pixel_width,
        pixel_height,
    })
}
