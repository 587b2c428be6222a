//! Axis-aligned geometry shared by the world and pure systems.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default playfield width measured in pixels.
pub const DEFAULT_FIELD_WIDTH: f32 = 1200.0;
/// Default playfield height measured in pixels.
pub const DEFAULT_FIELD_HEIGHT: f32 = 900.0;

/// Axis-aligned bounding box described by its centre and full size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    center: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box centred on `center` spanning `size` pixels.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        let size = size.max(Vec2::ZERO);
        Self {
            center: min + size * 0.5,
            size,
        }
    }

    /// Centre of the box.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Full width and height of the box.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Top-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Reports whether the two boxes share any interior area.
    ///
    /// Boxes that merely touch along an edge do not overlap, and a box with
    /// zero area never overlaps anything.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Returns a copy grown by `amount` in total (half on each side).
    #[must_use]
    pub fn inflate(&self, amount: Vec2) -> Self {
        Self::from_center_size(self.center, self.size + amount)
    }

    /// Returns a copy moved so that it lies inside `container`.
    ///
    /// When the box is larger than the container along an axis it is centred
    /// on that axis instead.
    #[must_use]
    pub fn clamped_inside(&self, container: &Aabb) -> Self {
        let center = Vec2::new(
            clamp_axis(self.center.x, self.size.x, container.min().x, container.max().x),
            clamp_axis(self.center.y, self.size.y, container.min().y, container.max().y),
        );
        Self::from_center_size(center, self.size)
    }

    fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

fn clamp_axis(center: f32, extent: f32, low: f32, high: f32) -> f32 {
    if extent >= high - low {
        return (low + high) * 0.5;
    }
    let half = extent * 0.5;
    center.clamp(low + half, high - half)
}

/// Rectangular playfield that bounds the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield with explicit dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the playfield in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the playfield in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre point of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Bounding box covering the whole playfield.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_min_size(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}
