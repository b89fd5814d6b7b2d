// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export: normalize each working item, lay it out, and hand it to a document
// sink, strictly in order.
//
// Decoding and re-encoding run on Tokio's blocking pool; awaiting each item is
// the point where the host regains control to repaint progress. Only one
// normalized raster is alive at a time.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leafpress_core::error::{LeafpressError, Result};
use leafpress_core::integrity::hash_bytes;
use leafpress_core::{ExportConfig, PolicyInput, SizingPolicy};
use tracing::{debug, info, instrument, warn};

use crate::image::normalize;
use crate::layout::PageLayout;
use crate::pdf::{DocumentSink, PdfWriter};
use crate::working_set::WorkingSet;

/// Progress report sent before each item is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// 1-based position of the item about to be processed.
    pub current: usize,
    pub total: usize,
}

impl std::fmt::Display for ExportProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Processing {}/{}...", self.current, self.total)
    }
}

/// Shared flag for stopping an export between items.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A finished PDF and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    /// `<prefix>_<unix millis>.pdf`
    pub filename: String,
    /// SHA-256 of `bytes`, lowercase hex.
    pub sha256: String,
    pub page_count: usize,
}

impl ExportedDocument {
    /// Write the PDF to `path`.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

/// Suggested output filename for an export finished at `unix_millis`.
pub fn suggested_filename(prefix: &str, unix_millis: i64) -> String {
    format!("{prefix}_{unix_millis}.pdf")
}

/// Runs exports with a fixed [`ExportConfig`].
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Resolve form input into a policy, filling in the default margin.
    pub fn resolve_policy(&self, input: PolicyInput) -> Result<SizingPolicy> {
        input.into_policy(self.config.default_margin_mm)
    }

    /// Export `set` as a PDF.
    ///
    /// Fails with [`LeafpressError::EmptyInput`] before touching any image
    /// when `set` is empty. Any per-item failure aborts the export; nothing
    /// partial is returned and `set` is left as it was.
    #[instrument(skip(self, set, cancel, progress), fields(items = set.len()))]
    pub async fn export(
        &self,
        set: &WorkingSet,
        policy: SizingPolicy,
        cancel: &CancelToken,
        progress: impl FnMut(ExportProgress),
    ) -> Result<ExportedDocument> {
        let writer = PdfWriter::new(&self.config.document_title);
        let writer = self.assemble(set, policy, writer, cancel, progress).await?;
        let page_count = writer.page_count();
        let bytes = writer.finish()?;

        let filename = suggested_filename(
            &self.config.filename_prefix,
            chrono::Utc::now().timestamp_millis(),
        );
        let sha256 = hash_bytes(&bytes);
        info!(
            page_count,
            bytes = bytes.len(),
            filename = %filename,
            "Export complete"
        );

        Ok(ExportedDocument {
            bytes,
            filename,
            sha256,
            page_count,
        })
    }

    /// Normalize and lay out every item of `set` into `sink`, returning the
    /// sink with one page per item.
    pub async fn assemble<S: DocumentSink>(
        &self,
        set: &WorkingSet,
        policy: SizingPolicy,
        mut sink: S,
        cancel: &CancelToken,
        mut progress: impl FnMut(ExportProgress),
    ) -> Result<S> {
        if set.is_empty() {
            return Err(LeafpressError::EmptyInput);
        }
        let engine = PageLayout::new(policy)?;
        let total = set.len();
        info!(total, ?policy, "Starting export");

        for (index, item) in set.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(completed = index, total, "Export cancelled");
                return Err(LeafpressError::Cancelled);
            }
            progress(ExportProgress {
                current: index + 1,
                total,
            });

            let source = item.source.clone();
            let rotation = item.rotation;
            let max_dimension = self.config.max_dimension_px;
            let quality = self.config.jpeg_quality;
            let raster = tokio::task::spawn_blocking(move || {
                normalize(&source, rotation, max_dimension, quality)
            })
            .await
            .map_err(|err| LeafpressError::Task(err.to_string()))
            .and_then(|normalized| normalized)
            .map_err(|err| err.at_index(index))?;

            let plan = engine.place(raster.pixel_width, raster.pixel_height);
            let page_index = sink.add_page(plan.page);
            sink.place_image(page_index, &raster, &plan.placement)?;

            debug!(
                index,
                page_index,
                pixel_width = raster.pixel_width,
                pixel_height = raster.pixel_height,
                scale = plan.scale,
                "Item laid out"
            );
        }

        // A cancel that lands while the last item is in flight still wins.
        if cancel.is_cancelled() {
            warn!(completed = total, total, "Export cancelled");
            return Err(LeafpressError::Cancelled);
        }
        Ok(sink)
    }
}
