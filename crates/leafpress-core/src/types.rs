// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Leafpress: working items, sizing policies, and page
// geometry. All lengths are millimetres unless the name says otherwise.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LeafpressError, Result};

/// Millimetres per source pixel, assuming a 96 DPI raster.
pub const MM_PER_PX: f64 = 25.4 / 96.0;

/// Convert a pixel length to millimetres at 96 DPI.
pub fn px_to_mm(px: u32) -> f64 {
    px as f64 * MM_PER_PX
}

/// Stable handle for a working item, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared media type of a source image, as reported by the file picker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaType(String);

impl MediaType {
    pub fn new(mime: impl Into<String>) -> Self {
        Self(mime.into().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the declared type is any `image/*` type.
    pub fn is_image(&self) -> bool {
        self.0.starts_with("image/")
    }

    /// Infer a media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let mime = match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            _ => return None,
        };
        Some(Self::new(mime))
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw image content plus its declared media type.
///
/// The bytes are reference-counted so an export can hand them to a blocking
/// worker without copying the whole file.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data: Arc<[u8]>,
    pub media_type: MediaType,
}

impl SourceImage {
    pub fn new(data: impl Into<Arc<[u8]>>, media_type: MediaType) -> Self {
        Self {
            data: data.into(),
            media_type,
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    /// Unknown extensions are declared as `application/octet-stream`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .unwrap_or_else(|| MediaType::new("application/octet-stream"));
        let data = std::fs::read(path)?;
        Ok(Self::new(data, media_type))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Clockwise quarter-turn applied to an item before layout. Serialized as
/// whole degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    Clockwise270,
}

impl Rotation {
    /// Build from a whole number of degrees. Only multiples of 90 are valid;
    /// negative values count anticlockwise.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(LeafpressError::Validation(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Self::None,
            90 => Self::Clockwise90,
            180 => Self::Half,
            _ => Self::Clockwise270,
        })
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Half => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// The next quarter turn clockwise.
    pub fn turned_clockwise(self) -> Self {
        match self {
            Self::None => Self::Clockwise90,
            Self::Clockwise90 => Self::Half,
            Self::Half => Self::Clockwise270,
            Self::Clockwise270 => Self::None,
        }
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Clockwise90 | Self::Clockwise270)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = LeafpressError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Letter,
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (216.0, 279.0),
        }
    }
}

/// Page orientation for fixed paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = LeafpressError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(LeafpressError::Validation(format!(
                "unknown orientation: {other:?}"
            ))),
        }
    }
}

/// Paper selector as chosen by the user: a fixed size or fit-to-image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperId {
    A4,
    Letter,
    Fit,
}

impl FromStr for PaperId {
    type Err = LeafpressError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "letter" => Ok(Self::Letter),
            "fit" => Ok(Self::Fit),
            other => Err(LeafpressError::Validation(format!(
                "unknown paper size: {other:?}"
            ))),
        }
    }
}

/// Rule that decides each page's size and where its image goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizingPolicy {
    /// Every page has the same paper size; images are shrunk to fit and
    /// centred.
    FixedPaper {
        paper: PaperSize,
        orientation: Orientation,
        margin_mm: f64,
    },
    /// Each page is the image's size plus the margin on every side.
    FitToContent { margin_mm: f64 },
}

impl SizingPolicy {
    pub fn margin_mm(&self) -> f64 {
        match *self {
            Self::FixedPaper { margin_mm, .. } | Self::FitToContent { margin_mm } => margin_mm,
        }
    }

    /// Fixed page size after applying orientation, or `None` for
    /// fit-to-content.
    pub fn fixed_page(&self) -> Option<PageSpec> {
        match *self {
            Self::FixedPaper {
                paper, orientation, ..
            } => {
                let (w, h) = paper.dimensions_mm();
                Some(match orientation {
                    Orientation::Portrait => PageSpec::new(w, h),
                    Orientation::Landscape => PageSpec::new(h, w),
                })
            }
            Self::FitToContent { .. } => None,
        }
    }
}

/// Policy as submitted by a settings form.
///
/// ```ignore
/// { "paperId": "a4", "orientation": "landscape", "marginMm": 12.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInput {
    pub paper_id: PaperId,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margin_mm: Option<f64>,
}

impl PolicyInput {
    /// Resolve into a [`SizingPolicy`]. A missing margin takes
    /// `default_margin_mm`; a supplied one must be finite and positive.
    pub fn into_policy(self, default_margin_mm: f64) -> Result<SizingPolicy> {
        let margin_mm = self.margin_mm.unwrap_or(default_margin_mm);
        if !margin_mm.is_finite() || margin_mm <= 0.0 {
            return Err(LeafpressError::Validation(format!(
                "margin must be a positive number of millimetres, got {margin_mm}"
            )));
        }
        let paper = match self.paper_id {
            PaperId::A4 => PaperSize::A4,
            PaperId::Letter => PaperSize::Letter,
            PaperId::Fit => return Ok(SizingPolicy::FitToContent { margin_mm }),
        };
        Ok(SizingPolicy::FixedPaper {
            paper,
            orientation: self.orientation,
            margin_mm,
        })
    }
}

/// Size of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSpec {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// Where an image is drawn, measured from the page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Placement {
    /// Whether the placement lies inside `page`, allowing `tolerance` mm of
    /// floating-point slack.
    pub fn fits_within(&self, page: &PageSpec, tolerance: f64) -> bool {
        self.x_mm >= -tolerance
            && self.y_mm >= -tolerance
            && self.x_mm + self.width_mm <= page.width_mm + tolerance
            && self.y_mm + self.height_mm <= page.height_mm + tolerance
    }
}
