use super::data::EditedImage;

/// Session history of edited images, newest first
///
/// Insertion-only: no capacity bound, no deduplication. Each entry owns
/// its image buffer; any future eviction must drop the entry to release it.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    entries: Vec<EditedImage>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result at the front
    pub fn prepend(&mut self, image: EditedImage) {
        self.entries.insert(0, image);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn first(&self) -> Option<&EditedImage> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditedImage> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::png_bytes;

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut gallery = Gallery::new();
        assert!(gallery.is_empty());

        let a = EditedImage::decode(png_bytes(1)).unwrap();
        let b = EditedImage::decode(png_bytes(2)).unwrap();
        gallery.prepend(a.clone());
        gallery.prepend(b.clone());

        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.first(), Some(&b));
        assert_eq!(gallery.iter().last(), Some(&a));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut gallery = Gallery::new();
        let a = EditedImage::decode(png_bytes(1)).unwrap();
        gallery.prepend(a.clone());
        gallery.prepend(a);
        assert_eq!(gallery.len(), 2);
    }
}
