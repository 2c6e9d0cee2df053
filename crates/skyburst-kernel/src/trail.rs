//! Fixed-capacity trail buffer.
//!
//! Holds the most recent positions of a moving point, oldest first. Pushing
//! past capacity evicts the oldest sample. Purely visual; nothing reads it
//! back for physics.

use std::collections::VecDeque;

use glam::Vec3;

/// Default capacity of a launch trail.
pub const LAUNCH_TRAIL_CAPACITY: usize = 50;

/// Default capacity of a burst sparkle trail.
pub const SPARKLE_TRAIL_CAPACITY: usize = 15_000;

/// Ordered ring of recent positions.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    /// Samples, oldest at the front
    samples: VecDeque<Vec3>,
    /// Maximum number of samples kept
    capacity: usize,
}

impl TrailBuffer {
    /// Creates an empty trail that keeps at most `capacity` samples.
    ///
    /// Storage is allocated lazily so a large sparkle trail costs nothing
    /// until it is actually written to.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one when full.
    pub fn push(&mut self, sample: Vec3) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Number of samples currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the trail holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the next push will evict a sample.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.samples.len() == self.capacity
    }

    /// Oldest sample.
    #[must_use]
    pub fn oldest(&self) -> Option<Vec3> {
        self.samples.front().copied()
    }

    /// Most recent sample.
    #[must_use]
    pub fn newest(&self) -> Option<Vec3> {
        self.samples.back().copied()
    }

    /// Iterates samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.samples.iter()
    }

    /// Samples as two contiguous runs, oldest first.
    #[must_use]
    pub fn as_slices(&self) -> (&[Vec3], &[Vec3]) {
        self.samples.as_slices()
    }

    /// Drops all samples and frees the backing storage. Idempotent.
    pub fn release(&mut self) {
        self.samples = VecDeque::new();
    }
}
