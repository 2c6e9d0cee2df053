//! Render-surface boundary.
//!
//! The kernel never draws. Each tick it hands borrowed point batches to a
//! [`RenderSurface`]; the surface must copy what it needs before returning,
//! because the underlying buffers are overwritten in place on the next tick.
//!
//! # Example
//!
//! ```
//! use skyburst_kernel::render::{PointBatch, VertexBuffer, BatchKind, RenderSurface};
//! use skyburst_common::{Color, Vec3};
//!
//! let positions = [Vec3::ZERO, Vec3::ONE];
//! let batch = PointBatch::new(BatchKind::Stars, &positions, Color::WHITE, 1.0, 0.5);
//!
//! let mut vertices = VertexBuffer::new();
//! vertices.draw_points(&batch);
//! assert_eq!(vertices.len(), 2);
//! ```

use glam::Vec3;
use skyburst_common::Color;

/// What a batch of points depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Rising launch trail
    LaunchTrail,
    /// Burst stars
    Stars,
    /// Sparkle trail left behind by burst stars
    SparkleTrail,
}

/// Borrowed view of one point cloud for a single frame.
///
/// Positions may live in a ring buffer, so they are exposed as two runs
/// (`head` then `tail`) in draw order.
#[derive(Debug, Clone, Copy)]
pub struct PointBatch<'a> {
    /// What these points are
    pub kind: BatchKind,
    /// First run of positions
    pub head: &'a [Vec3],
    /// Second run of positions (often empty)
    pub tail: &'a [Vec3],
    /// Material color
    pub color: Color,
    /// Material opacity (0-1)
    pub opacity: f32,
    /// Point sprite size in world units
    pub point_size: f32,
}

impl<'a> PointBatch<'a> {
    /// Creates a batch from one contiguous run of positions.
    #[must_use]
    pub fn new(
        kind: BatchKind,
        positions: &'a [Vec3],
        color: Color,
        opacity: f32,
        point_size: f32,
    ) -> Self {
        Self {
            kind,
            head: positions,
            tail: &[],
            color,
            opacity,
            point_size,
        }
    }

    /// Creates a batch from a ring buffer's two runs.
    #[must_use]
    pub fn from_slices(
        kind: BatchKind,
        (head, tail): (&'a [Vec3], &'a [Vec3]),
        color: Color,
        opacity: f32,
        point_size: f32,
    ) -> Self {
        Self {
            kind,
            head,
            tail,
            color,
            opacity,
            point_size,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Whether the batch has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates positions in draw order.
    pub fn positions(&self) -> impl Iterator<Item = &'a Vec3> + 'a {
        self.head.iter().chain(self.tail.iter())
    }
}

/// Consumer of per-frame point batches.
pub trait RenderSurface {
    /// Receives one batch. Must not keep the borrowed positions.
    fn draw_points(&mut self, batch: &PointBatch<'_>);
}

/// GPU-friendly point instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    /// World position
    pub position: [f32; 3],
    /// Point sprite size
    pub size: f32,
    /// Color with alpha
    pub color: [f32; 4],
}

impl PointVertex {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Packs one point of a batch.
    #[must_use]
    pub fn new(position: Vec3, batch: &PointBatch<'_>) -> Self {
        Self {
            position: position.to_array(),
            size: batch.point_size,
            color: batch.color.with_alpha(batch.opacity),
        }
    }
}

/// Render surface that flattens every batch into a vertex list, ready for
/// upload to a point-cloud pipeline.
#[derive(Debug, Default)]
pub struct VertexBuffer {
    /// Packed vertices for the current frame
    vertices: Vec<PointVertex>,
}

impl VertexBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the frame, keeping the allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Packed vertices.
    #[must_use]
    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    /// Raw bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl RenderSurface for VertexBuffer {
    fn draw_points(&mut self, batch: &PointBatch<'_>) {
        self.vertices.reserve(batch.len());
        for position in batch.positions() {
            self.vertices.push(PointVertex::new(*position, batch));
        }
    }
}
