// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Working set: the ordered list of images staged for export. Its order is
// the page order of the exported document.

use std::path::Path;

use leafpress_core::error::{LeafpressError, Result};
use leafpress_core::{ItemId, Rotation, SourceImage};
use tracing::{debug, warn};

/// One staged image.
#[derive(Debug, Clone)]
pub struct WorkingItem {
    pub id: ItemId,
    pub source: SourceImage,
    pub rotation: Rotation,
    /// Display label, usually the original file name.
    pub name: Option<String>,
}

impl WorkingItem {
    pub fn new(source: SourceImage) -> Self {
        Self {
            id: ItemId::new(),
            source,
            rotation: Rotation::None,
            name: None,
        }
    }

    /// Load a file from disk, named after its file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let item = Self::new(SourceImage::from_path(path)?);
        Ok(match path.file_name() {
            Some(name) => item.with_name(name.to_string_lossy()),
            None => item,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<SourceImage> for WorkingItem {
    fn from(source: SourceImage) -> Self {
        Self::new(source)
    }
}

/// Ordered, single-owner collection of [`WorkingItem`]s.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    items: Vec<WorkingItem>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[WorkingItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkingItem> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&WorkingItem> {
        self.items.get(index)
    }

    /// Current position of the item with `id`.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Append items in order. Entries whose declared media type is not
    /// `image/*` are skipped. Returns the ids of the items actually added.
    pub fn add_items<I, T>(&mut self, items: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = T>,
        T: Into<WorkingItem>,
    {
        let mut added = Vec::new();
        for item in items {
            let item = item.into();
            if !item.source.media_type.is_image() {
                warn!(
                    media_type = %item.source.media_type,
                    name = item.name.as_deref().unwrap_or(""),
                    "Skipping non-image input"
                );
                continue;
            }
            added.push(item.id);
            self.items.push(item);
        }
        debug!(added = added.len(), total = self.items.len(), "Items added");
        added
    }

    /// Remove and return the item at `index`; later items shift down by one.
    pub fn remove_item(&mut self, index: usize) -> Result<WorkingItem> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Move the item at `from` so it ends up at `to`. Items in between shift
    /// to close the gap; this is a relocation, not a swap.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        debug!(from, to, "Item moved");
        Ok(())
    }

    pub fn set_rotation(&mut self, index: usize, rotation: Rotation) -> Result<()> {
        self.check_index(index)?;
        self.items[index].rotation = rotation;
        Ok(())
    }

    /// Turn the item at `index` a further quarter clockwise and return its
    /// new rotation.
    pub fn rotate_clockwise(&mut self, index: usize) -> Result<Rotation> {
        self.check_index(index)?;
        let item = &mut self.items[index];
        item.rotation = item.rotation.turned_clockwise();
        Ok(item.rotation)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(LeafpressError::Validation(format!(
                "item {} out of range (working set has {} items)",
                index,
                self.items.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafpress_core::MediaType;

    fn item(tag: u8) -> WorkingItem {
        WorkingItem::new(SourceImage::new(vec![tag], MediaType::new("image/png")))
            .with_name(format!("img{tag}.png"))
    }

    fn names(set: &WorkingSet) -> Vec<&str> {
        set.iter().filter_map(|item| item.name.as_deref()).collect()
    }

    fn four() -> WorkingSet {
        let mut set = WorkingSet::new();
        set.add_items((0..4).map(item));
        set
    }

    #[test]
    fn move_relocates_single_item() {
        let mut set = four();
        set.move_item(2, 0).unwrap();
        assert_eq!(names(&set), ["img2.png", "img0.png", "img1.png", "img3.png"]);

        set.move_item(0, 3).unwrap();
        assert_eq!(names(&set), ["img0.png", "img1.png", "img3.png", "img2.png"]);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let mut set = four();
        set.move_item(1, 1).unwrap();
        assert_eq!(names(&set), ["img0.png", "img1.png", "img2.png", "img3.png"]);
    }

    #[test]
    fn remove_shifts_later_items_down() {
        let mut set = four();
        let removed = set.remove_item(1).unwrap();
        assert_eq!(removed.name.as_deref(), Some("img1.png"));
        assert_eq!(names(&set), ["img0.png", "img2.png", "img3.png"]);
        assert_eq!(set.position(set.items()[1].id), Some(1));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut set = four();
        assert!(matches!(set.remove_item(4), Err(LeafpressError::Validation(_))));
        assert!(set.move_item(0, 9).is_err());
        assert!(set.set_rotation(7, Rotation::Half).is_err());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn non_images_are_skipped() {
        let mut set = WorkingSet::new();
        let added = set.add_items([
            SourceImage::new(vec![1], MediaType::new("image/jpeg")),
            SourceImage::new(vec![2], MediaType::new("application/pdf")),
            SourceImage::new(vec![3], MediaType::new("image/webp")),
        ]);
        assert_eq!(added.len(), 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.position(added[1]), Some(1));
    }

    #[test]
    fn rotation_is_stored_per_item() {
        let mut set = four();
        set.set_rotation(3, Rotation::Clockwise90).unwrap();
        assert_eq!(set.get(3).map(|item| item.rotation), Some(Rotation::Clockwise90));
        assert_eq!(set.get(0).map(|item| item.rotation), Some(Rotation::None));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn rotate_clockwise_cycles_quarter_turns() {
        let mut set = four();
        assert_eq!(set.rotate_clockwise(1).unwrap(), Rotation::Clockwise90);
        assert_eq!(set.rotate_clockwise(1).unwrap(), Rotation::Half);
        assert_eq!(set.rotate_clockwise(1).unwrap(), Rotation::Clockwise270);
        assert_eq!(set.rotate_clockwise(1).unwrap(), Rotation::None);
        assert!(set.rotate_clockwise(4).is_err());
    }

    #[test]
    fn files_are_typed_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("Photo.JPG");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&photo, [0xFF, 0xD8]).unwrap();
        std::fs::write(&notes, b"hello").unwrap();

        let photo = WorkingItem::from_path(&photo).unwrap();
        assert_eq!(photo.name.as_deref(), Some("Photo.JPG"));
        assert_eq!(photo.source.media_type.as_str(), "image/jpeg");

        let mut set = WorkingSet::new();
        let added = set.add_items([photo, WorkingItem::from_path(&notes).unwrap()]);
        assert_eq!(added.len(), 1);
        assert!(WorkingItem::from_path(dir.path().join("missing.png")).is_err());
    }
}
