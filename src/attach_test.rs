use std::collections::HashMap;

use super::*;

// =============================================================
// Fake host
// =============================================================

/// In-memory page: images are ids, some inside message containers.
#[derive(Default)]
struct FakePage {
    /// (image id, inside a message container)
    images: Vec<(u32, bool)>,
    keys: HashMap<u32, ImageKey>,
    next_key: u64,
    /// Click handlers registered per image.
    handlers: HashMap<u32, usize>,
}

impl FakePage {
    fn with_images(images: &[(u32, bool)]) -> Self {
        Self { images: images.to_vec(), ..Self::default() }
    }

    fn add(&mut self, id: u32, in_container: bool) {
        self.images.push((id, in_container));
    }

    /// How many open triggers fire for one click on `id`.
    fn click(&self, id: u32) -> usize {
        self.handlers.get(&id).copied().unwrap_or(0)
    }
}

impl ImageHost for FakePage {
    type Image = u32;

    fn eligible_images(&self) -> Vec<u32> {
        self.images.iter().filter(|(_, eligible)| *eligible).map(|(id, _)| *id).collect()
    }

    fn key_of(&mut self, image: &u32) -> ImageKey {
        let next = &mut self.next_key;
        *self.keys.entry(*image).or_insert_with(|| {
            *next += 1;
            ImageKey(*next)
        })
    }

    fn bind(&mut self, image: &u32) {
        *self.handlers.entry(*image).or_insert(0) += 1;
    }
}

// =============================================================
// Registry
// =============================================================

#[test]
fn registry_starts_empty() {
    let r = BoundImageRegistry::new();
    assert!(r.is_empty());
    assert_eq!(r.len(), 0);
}

#[test]
fn registry_insert_once() {
    let mut r = BoundImageRegistry::new();
    assert!(r.insert(ImageKey(7)));
    assert!(!r.insert(ImageKey(7)));
    assert!(r.contains(ImageKey(7)));
    assert_eq!(r.len(), 1);
}

// =============================================================
// scan
// =============================================================

#[test]
fn scan_binds_only_container_images() {
    let mut page = FakePage::with_images(&[(1, true), (2, false), (3, true)]);
    let mut registry = BoundImageRegistry::new();
    assert_eq!(scan(&mut registry, &mut page), 2);
    assert_eq!(page.click(1), 1);
    assert_eq!(page.click(2), 0);
    assert_eq!(page.click(3), 1);
}

#[test]
fn scanning_twice_binds_each_image_once() {
    let mut page = FakePage::with_images(&[(1, true), (2, true)]);
    let mut registry = BoundImageRegistry::new();
    scan(&mut registry, &mut page);
    assert_eq!(scan(&mut registry, &mut page), 0);
    assert_eq!(page.click(1), 1);
    assert_eq!(page.click(2), 1);
    assert_eq!(registry.len(), 2);
}

#[test]
fn rescan_picks_up_new_images() {
    let mut page = FakePage::with_images(&[(1, true)]);
    let mut registry = BoundImageRegistry::new();
    scan(&mut registry, &mut page);
    page.add(2, true);
    page.add(3, false);
    assert_eq!(scan(&mut registry, &mut page), 1);
    assert_eq!(page.click(1), 1);
    assert_eq!(page.click(2), 1);
    assert_eq!(page.click(3), 0);
}

#[test]
fn scan_of_empty_page_binds_nothing() {
    let mut page = FakePage::default();
    let mut registry = BoundImageRegistry::new();
    assert_eq!(scan(&mut registry, &mut page), 0);
    assert!(registry.is_empty());
}

// =============================================================
// should_rescan
// =============================================================

#[test]
fn rescan_when_any_record_adds_nodes() {
    assert!(should_rescan([0, 0, 2]));
    assert!(should_rescan([1]));
}

#[test]
fn no_rescan_for_removals_or_attribute_changes() {
    assert!(!should_rescan([0, 0]));
    assert!(!should_rescan(std::iter::empty()));
}
