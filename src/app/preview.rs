// CropCure - app/preview.rs
//
// Scoped preview resources for the selected image.
//
// A `PreviewHandle` is live from creation until it is dropped; the tracker
// counts live handles so callers (and tests) can check that at most one
// preview exists at a time and none survive a reset.

use crate::core::model::PreviewImage;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Issues preview handles and counts the ones still alive.
#[derive(Debug, Clone, Default)]
pub struct PreviewTracker {
    live: Arc<AtomicUsize>,
    next_id: Arc<AtomicU64>,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created by this tracker and not yet dropped.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Wrap decoded pixels in a new live handle.
    pub fn create(&self, image: PreviewImage) -> PreviewHandle {
        // Ids start at 1 so 0 never names a real preview.
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(preview_id = id, live, "Preview created");
        PreviewHandle {
            id,
            image,
            live: Arc::clone(&self.live),
        }
    }
}

/// A live preview. Dropping it releases the preview.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    image: PreviewImage,
    live: Arc<AtomicUsize>,
}

impl PreviewHandle {
    /// Unique id; a UI texture cache keys on this to notice replacement.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn image(&self) -> &PreviewImage {
        &self.image
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let live = self.live.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::trace!(preview_id = self.id, live, "Preview released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels() -> PreviewImage {
        PreviewImage {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn test_handles_are_counted_until_dropped() {
        let tracker = PreviewTracker::new();
        let a = tracker.create(pixels());
        let b = tracker.create(pixels());
        assert_eq!(tracker.live(), 2);
        assert_ne!(a.id(), b.id());

        drop(a);
        assert_eq!(tracker.live(), 1);
        drop(b);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_clones_share_the_count() {
        let tracker = PreviewTracker::new();
        let clone = tracker.clone();
        let _h = clone.create(pixels());
        assert_eq!(tracker.live(), 1);
    }
}
