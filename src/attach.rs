//! Discovery and binding of eligible images.
//!
//! A scan walks every image the host reports as eligible and binds the ones
//! the registry has not seen. Scans are coarse: the host re-runs them on
//! mutation batches or a poll tick, and the registry keeps binding
//! idempotent per element.

#[cfg(test)]
#[path = "attach_test.rs"]
mod attach_test;

use std::collections::HashSet;

/// Stable identity of an image element for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageKey(pub u64);

/// Access to the page's images, abstracted so scanning runs without a DOM.
pub trait ImageHost {
    type Image;

    /// Every image currently inside a message container.
    fn eligible_images(&self) -> Vec<Self::Image>;

    /// The image's key, minting one on first sight.
    fn key_of(&mut self, image: &Self::Image) -> ImageKey;

    /// Register the open trigger and the zoom-in cursor on `image`.
    fn bind(&mut self, image: &Self::Image);
}

/// Keys of images already carrying the open trigger. Entries are never
/// removed; detached elements are not reused.
#[derive(Debug, Default)]
pub struct BoundImageRegistry {
    bound: HashSet<ImageKey>,
}

impl BoundImageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`. Returns `false` if it was already bound.
    pub fn insert(&mut self, key: ImageKey) -> bool {
        self.bound.insert(key)
    }

    #[must_use]
    pub fn contains(&self, key: ImageKey) -> bool {
        self.bound.contains(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Bind every eligible, not-yet-bound image. Returns how many were bound.
pub fn scan<H: ImageHost>(registry: &mut BoundImageRegistry, host: &mut H) -> usize {
    let mut bound = 0;
    for image in host.eligible_images() {
        let key = host.key_of(&image);
        if registry.insert(key) {
            host.bind(&image);
            bound += 1;
        }
    }
    if bound > 0 {
        log::debug!("bound {bound} image(s), {} total", registry.len());
    }
    bound
}

/// Whether a mutation batch warrants a rescan: any record added nodes.
/// Takes the added-node count of each record.
pub fn should_rescan(added_per_record: impl IntoIterator<Item = u32>) -> bool {
    added_per_record.into_iter().any(|n| n > 0)
}
