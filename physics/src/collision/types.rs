/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the collider registry (`resolver`)
- broad-phase rejection (`broad`)
- narrow-phase containment tests (`narrow_phase`)
- the authored shape table (`shapes`)
*/

use std::fmt;

use nalgebra as na;

pub use rapier3d::parry::bounding_volume::Aabb;

/// Crate-wide math aliases; every module imports them from here.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;

/// Identity of the renderable that owns a collider.
///
/// The registry holds at most one collider per owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderOwner(pub u64);

impl fmt::Display for ColliderOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An authored, vertical (Y-aligned) cylinder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderSpec {
    /// Planar center `(x, z)`.
    pub center: Vec2,
    pub radius: f32,
    /// Bottom of the cylinder (world Y).
    pub min_y: f32,
    /// Top surface of the cylinder (world Y). Bodies can stand here.
    pub max_y: f32,
}

impl CylinderSpec {
    #[inline]
    pub fn new(center: Vec2, radius: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            center,
            radius,
            min_y,
            max_y,
        }
    }

    fn is_valid(&self) -> bool {
        let finite = self.center.iter().all(|c| c.is_finite())
            && self.radius.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite();
        finite && self.radius > 0.0 && self.max_y > self.min_y
    }
}

/// Static collider shapes supported by the registry.
///
/// - Box: world-space axis-aligned box, usually derived from a mesh's bounds.
/// - Cylinder: authored vertical cylinder with a walkable top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    Box(Aabb),
    Cylinder(CylinderSpec),
}

/// A registered collider plus its precomputed broad-phase circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderEntry {
    pub shape: ColliderShape,
    /// Planar center `(x, z)` of the bounding circle.
    pub center: Vec2,
    /// Radius of the bounding circle (bounding sphere radius for boxes).
    pub radius: f32,
}

impl ColliderEntry {
    pub fn from_box(aabb: Aabb) -> Self {
        let c = aabb.center();
        Self {
            shape: ColliderShape::Box(aabb),
            center: Vec2::new(c.x, c.z),
            radius: aabb.half_extents().norm(),
        }
    }

    pub fn from_cylinder(cylinder: CylinderSpec) -> Self {
        Self {
            shape: ColliderShape::Cylinder(cylinder),
            center: cylinder.center,
            radius: cylinder.radius,
        }
    }

    /// Validate a box against the plausible volume range.
    pub(crate) fn checked_box(
        aabb: Aabb,
        min_volume: f32,
        max_volume: f32,
    ) -> Result<Self, ColliderRejected> {
        let finite = aabb.mins.iter().chain(aabb.maxs.iter()).all(|c| c.is_finite());
        if !finite {
            return Err(ColliderRejected::NonFinite);
        }
        let volume = aabb.volume();
        if !(min_volume..=max_volume).contains(&volume) {
            return Err(ColliderRejected::DegenerateVolume { volume });
        }
        Ok(Self::from_box(aabb))
    }

    pub(crate) fn checked_cylinder(cylinder: CylinderSpec) -> Result<Self, ColliderRejected> {
        if !cylinder.is_valid() {
            return Err(ColliderRejected::InvalidDimensions);
        }
        Ok(Self::from_cylinder(cylinder))
    }
}

/// Why a collider registration was skipped. The registry is unchanged in every case.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderRejected {
    /// Bounds contained NaN or infinity.
    NonFinite,
    /// Box volume outside the plausible range; likely a container node.
    DegenerateVolume { volume: f32 },
    /// Cylinder with non-positive radius or an empty height band.
    InvalidDimensions,
    /// The authored table disables collision for this asset.
    Disabled,
}

impl fmt::Display for ColliderRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "bounds are not finite"),
            Self::DegenerateVolume { volume } => {
                write!(f, "box volume {volume} is outside the plausible range")
            }
            Self::InvalidDimensions => write!(f, "cylinder has invalid dimensions"),
            Self::Disabled => write!(f, "collision disabled for asset"),
        }
    }
}

impl std::error::Error for ColliderRejected {}
