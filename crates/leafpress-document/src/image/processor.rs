// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, quarter-turn rotation, bounded downscaling, and
// JPEG re-encoding. Operates on in-memory images using the `image` crate.

use image::DynamicImage;
use image::imageops::FilterType;
use leafpress_core::Rotation;
use leafpress_core::error::{LeafpressError, Result};
use tracing::{debug, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`
/// wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&bytes)?
///     .rotate(Rotation::Clockwise90)
///     .fit_within(1600)
///     .to_jpeg_bytes(0.92)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    ///
    /// The format is sniffed from the content, not taken from the declared
    /// media type. Failures are reported as [`LeafpressError::Decode`] with
    /// index 0; callers that know the item's position re-tag it.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| LeafpressError::Decode {
            index: 0,
            reason: err.to_string(),
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Rotate clockwise by a quarter-turn multiple. Lossless.
    pub fn rotate(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::None => return self,
            Rotation::Clockwise90 => self.image.rotate90(),
            Rotation::Half => self.image.rotate180(),
            Rotation::Clockwise270 => self.image.rotate270(),
        };
        Self { image }
    }

    /// Shrink so the longer edge is at most `max_dimension` pixels, preserving
    /// aspect ratio. Images already within bounds are left untouched.
    #[instrument(skip(self), fields(max_dimension))]
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let (from_w, from_h) = (self.image.width(), self.image.height());
        let (to_w, to_h) = bounded_dimensions(from_w, from_h, max_dimension);
        if (to_w, to_h) == (from_w, from_h) {
            return self;
        }
        let resized = self.image.resize_exact(to_w, to_h, FilterType::Lanczos3);
        debug!(from_w, from_h, to_w, to_h, "Downscaled image");
        Self { image: resized }
    }

    /// Encode the current image as baseline JPEG.
    ///
    /// `quality` is in (0, 1] and maps onto the encoder's 1-100 scale. Any
    /// alpha channel is dropped.
    pub fn to_jpeg_bytes(&self, quality: f32) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
        rgb.write_with_encoder(encoder)
            .map_err(|err| LeafpressError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Target size for a `width` x `height` image whose longer edge may not
/// exceed `max_dimension`. Never upscales; each side is at least one pixel.
pub fn bounded_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 {
        return (width, height);
    }
    let scale = (max_dimension as f64 / longest as f64).min(1.0);
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Map a (0, 1] quality onto the JPEG encoder's 1-100 integer scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
