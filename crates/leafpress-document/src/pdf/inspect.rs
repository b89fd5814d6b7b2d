// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector: load a finished PDF with `lopdf` and report its page
// geometry, so exports can be checked without a renderer.

use lopdf::{Dictionary, Document, Object, ObjectId};
use leafpress_core::PageSpec;
use leafpress_core::error::{LeafpressError, Result};
use tracing::{debug, instrument};

/// Millimetres per PDF point.
const MM_PER_PT: f64 = 25.4 / 72.0;

/// Read-only view of an existing PDF.
pub struct PdfInspector {
    document: Document,
}

impl PdfInspector {
    /// Load a PDF already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LeafpressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Size of every page, in page order, taken from its `/MediaBox`.
    pub fn page_sizes_mm(&self) -> Result<Vec<PageSpec>> {
        // `get_pages` is keyed by 1-based page number in a BTreeMap, so
        // iteration is already in page order.
        self.document
            .get_pages()
            .into_iter()
            .map(|(page_number, page_id)| -> Result<PageSpec> {
                let media_box = self.media_box(page_id).map_err(|err| {
                    LeafpressError::PdfError(format!("page {}: {}", page_number, err))
                })?;
                Ok(PageSpec::new(
                    (media_box[2] - media_box[0]) * MM_PER_PT,
                    (media_box[3] - media_box[1]) * MM_PER_PT,
                ))
            })
            .collect()
    }

    /// Pixel size of every embedded image XObject, in object order.
    pub fn image_dimensions(&self) -> Result<Vec<(u32, u32)>> {
        let mut sizes = Vec::new();
        for (id, object) in &self.document.objects {
            let Ok(stream) = object.as_stream() else {
                continue;
            };
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Image");
            if !is_image {
                continue;
            }
            let side = |key: &[u8]| -> Result<u32> {
                stream
                    .dict
                    .get(key)
                    .and_then(Object::as_i64)
                    .ok()
                    .and_then(|value| u32::try_from(value).ok())
                    .ok_or_else(|| {
                        LeafpressError::PdfError(format!(
                            "image {:?} has no valid /{}",
                            id,
                            String::from_utf8_lossy(key)
                        ))
                    })
            };
            sizes.push((side(b"Width")?, side(b"Height")?));
        }
        Ok(sizes)
    }

    /// Resolve a page's `/MediaBox`, following `/Parent` links for inherited
    /// values.
    fn media_box(&self, page_id: ObjectId) -> std::result::Result<[f64; 4], String> {
        let mut node_id = page_id;
        loop {
            let dict = self.dictionary(node_id)?;
            if let Ok(value) = dict.get(b"MediaBox") {
                return self.rectangle(value);
            }
            node_id = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| "no /MediaBox in page tree".to_string())?;
        }
    }

    fn dictionary(&self, id: ObjectId) -> std::result::Result<&Dictionary, String> {
        self.document
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|err| format!("object {:?} is not a dictionary: {}", id, err))
    }

    fn rectangle(&self, value: &Object) -> std::result::Result<[f64; 4], String> {
        let value = match value {
            Object::Reference(id) => self
                .document
                .get_object(*id)
                .map_err(|err| format!("dangling /MediaBox reference: {}", err))?,
            other => other,
        };
        let items = value
            .as_array()
            .map_err(|_| "/MediaBox is not an array".to_string())?;
        if items.len() != 4 {
            return Err(format!("/MediaBox has {} entries", items.len()));
        }
        let mut rect = [0.0; 4];
        for (slot, item) in rect.iter_mut().zip(items) {
            *slot = item
                .as_float()
                .map_err(|_| "/MediaBox entry is not a number".to_string())?
                as f64;
        }
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_bytes() {
        let result = PdfInspector::from_bytes(b"not a pdf");
        assert!(matches!(result, Err(LeafpressError::PdfError(_))));
    }

    #[test]
    fn reads_inherited_media_box() {
        use lopdf::dictionary;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(72),
                    Object::Integer(144),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let inspector = PdfInspector::from_bytes(&bytes).unwrap();
        assert_eq!(inspector.page_count(), 1);
        let sizes = inspector.page_sizes_mm().unwrap();
        assert!((sizes[0].width_mm - 25.4).abs() < 1e-6);
        assert!((sizes[0].height_mm - 50.8).abs() < 1e-6);
    }
}
