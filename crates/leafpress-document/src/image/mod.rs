// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: decoding, rotation, bounded resampling, and JPEG re-encoding.

pub mod normalize;
pub mod processor;

pub use normalize::{NormalizedRaster, normalize};
pub use processor::ImageProcessor;
