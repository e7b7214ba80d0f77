//! Capsule shape and the shape-cast query the solver runs against the world

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_core::WORLD_UP;

/// Default skin width kept between the capsule and the surfaces it touches
pub const DEFAULT_SKIN_WIDTH: f32 = 0.015;

/// Errors produced when validating a capsule
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("Capsule radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("Capsule height {height} must exceed twice its radius {radius}")]
    InvalidHeight { height: f32, radius: f32 },

    #[error("Skin width must be positive, got {0}")]
    InvalidSkinWidth(f32),
}

/// Upright capsule used as the character's collision volume.
///
/// Positions passed around with a capsule refer to its base (the lowest point),
/// not its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CapsuleDimensions", into = "CapsuleDimensions")]
pub struct CapsuleShape {
    radius: f32,
    height: f32,
    skin_width: f32,
}

/// Unvalidated capsule dimensions, as they appear in configuration files
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapsuleDimensions {
    pub radius: f32,
    pub height: f32,
    #[serde(default = "default_skin_width")]
    pub skin_width: f32,
}

fn default_skin_width() -> f32 {
    DEFAULT_SKIN_WIDTH
}

impl CapsuleShape {
    /// Create a capsule with the default skin width
    pub fn new(radius: f32, height: f32) -> Result<Self, ShapeError> {
        Self::with_skin_width(radius, height, DEFAULT_SKIN_WIDTH)
    }

    /// Create a capsule with an explicit skin width
    pub fn with_skin_width(radius: f32, height: f32, skin_width: f32) -> Result<Self, ShapeError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(ShapeError::InvalidRadius(radius));
        }
        if !(height > 2.0 * radius) || !height.is_finite() {
            return Err(ShapeError::InvalidHeight { height, radius });
        }
        if !(skin_width > 0.0) || !skin_width.is_finite() {
            return Err(ShapeError::InvalidSkinWidth(skin_width));
        }
        Ok(Self {
            radius,
            height,
            skin_width,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn skin_width(&self) -> f32 {
        self.skin_width
    }

    /// Center of the lower hemisphere for a capsule standing at `base`
    pub fn bottom_center(&self, base: Vec3) -> Vec3 {
        base + WORLD_UP * self.radius
    }

    /// Center of the upper hemisphere for a capsule standing at `base`
    pub fn top_center(&self, base: Vec3) -> Vec3 {
        base + WORLD_UP * (self.height - self.radius)
    }
}

impl Default for CapsuleShape {
    fn default() -> Self {
        Self {
            radius: 0.25,
            height: 1.85,
            skin_width: DEFAULT_SKIN_WIDTH,
        }
    }
}

impl TryFrom<CapsuleDimensions> for CapsuleShape {
    type Error = ShapeError;

    fn try_from(dims: CapsuleDimensions) -> Result<Self, Self::Error> {
        Self::with_skin_width(dims.radius, dims.height, dims.skin_width)
    }
}

impl From<CapsuleShape> for CapsuleDimensions {
    fn from(shape: CapsuleShape) -> Self {
        Self {
            radius: shape.radius,
            height: shape.height,
            skin_width: shape.skin_width,
        }
    }
}

/// Nearest obstruction found by a shape cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Distance travelled along the cast direction before contact
    pub distance: f32,
    /// Surface normal of the obstruction, pointing away from it
    pub normal: Vec3,
}

impl ShapeHit {
    /// A hit the solver can act on: finite, non-negative distance and a usable normal
    pub fn is_well_formed(&self) -> bool {
        self.distance.is_finite()
            && self.distance >= 0.0
            && self.normal.is_finite()
            && self.normal.length_squared() > 1.0e-8
    }
}

/// Read-only capsule sweep against static world geometry.
///
/// Implementations return `None` both when nothing is in the way and when the
/// query cannot be answered.
pub trait ShapeCaster {
    /// Sweep a capsule spanned by the two hemisphere centers along `direction`
    /// (unit length) for up to `max_distance`, considering only colliders that
    /// match `collision_mask`.
    fn cast_capsule(
        &self,
        bottom_center: Vec3,
        top_center: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        collision_mask: u32,
    ) -> Option<ShapeHit>;
}

impl<T: ShapeCaster + ?Sized> ShapeCaster for &T {
    fn cast_capsule(
        &self,
        bottom_center: Vec3,
        top_center: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        collision_mask: u32,
    ) -> Option<ShapeHit> {
        (**self).cast_capsule(
            bottom_center,
            top_center,
            radius,
            direction,
            max_distance,
            collision_mask,
        )
    }
}
