//! Authored collision overrides keyed by asset identifier.
//!
//! Most obstacles collide with the box derived from their world bounds. Assets whose
//! silhouette is poorly described by that box (rocks, trunks, pillars) get a row in
//! this table describing a vertical cylinder instead, or are disabled entirely. The
//! lookup happens once at registration; nothing here is consulted per tick.

use std::collections::HashMap;

use super::types::{Aabb, CylinderSpec, Vec2};

/// One authored row: `{ radius, height, vertical_offset, enabled }`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeOverride {
    pub radius: f32,
    pub height: f32,
    /// Offset of the cylinder base from the bottom of the object's bounds.
    pub vertical_offset: f32,
    pub enabled: bool,
}

impl ShapeOverride {
    pub fn cylinder(radius: f32, height: f32, vertical_offset: f32) -> Self {
        Self {
            radius,
            height,
            vertical_offset,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            radius: 0.0,
            height: 0.0,
            vertical_offset: 0.0,
            enabled: false,
        }
    }
}

/// The collision shape an asset resolves to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuthoredShape {
    /// No override: use the bounds-derived box.
    Box,
    Cylinder {
        radius: f32,
        height: f32,
        vertical_offset: f32,
    },
    /// Collision explicitly turned off for this asset.
    Disabled,
}

impl AuthoredShape {
    /// Place an authored cylinder on an object with world `bounds`.
    ///
    /// Centered on the bounds' planar center; base at `bounds.min.y + vertical_offset`.
    pub fn cylinder_on(radius: f32, height: f32, vertical_offset: f32, bounds: &Aabb) -> CylinderSpec {
        let c = bounds.center();
        let min_y = bounds.mins.y + vertical_offset;
        CylinderSpec::new(Vec2::new(c.x, c.z), radius, min_y, min_y + height)
    }
}

/// Read-only asset key → override table, built by the caller from its own data.
#[derive(Clone, Debug, Default)]
pub struct CollisionShapeTable {
    rows: HashMap<String, ShapeOverride>,
}

impl CollisionShapeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset_key: impl Into<String>, row: ShapeOverride) {
        self.rows.insert(asset_key.into(), row);
    }

    pub fn get(&self, asset_key: &str) -> Option<&ShapeOverride> {
        self.rows.get(asset_key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve the shape for `asset_key`.
    pub fn shape_for(&self, asset_key: &str) -> AuthoredShape {
        match self.rows.get(asset_key) {
            None => AuthoredShape::Box,
            Some(row) if !row.enabled => AuthoredShape::Disabled,
            Some(row) => AuthoredShape::Cylinder {
                radius: row.radius,
                height: row.height,
                vertical_offset: row.vertical_offset,
            },
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ShapeOverride)> for CollisionShapeTable {
    fn from_iter<I: IntoIterator<Item = (K, ShapeOverride)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn table() -> CollisionShapeTable {
        [
            ("rock_large", ShapeOverride::cylinder(1.5, 2.0, 0.0)),
            ("grass_tuft", ShapeOverride::disabled()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn unknown_assets_resolve_to_box() {
        assert_eq!(table().shape_for("crate_01"), AuthoredShape::Box);
    }

    #[test]
    fn disabled_rows_resolve_to_disabled() {
        assert_eq!(table().shape_for("grass_tuft"), AuthoredShape::Disabled);
    }

    #[test]
    fn cylinder_is_placed_on_bounds() {
        let AuthoredShape::Cylinder {
            radius,
            height,
            vertical_offset,
        } = table().shape_for("rock_large")
        else {
            panic!("expected cylinder");
        };
        let bounds = Aabb::new(Point3::new(4.0, 1.0, -2.0), Point3::new(6.0, 3.0, 2.0));
        let cyl = AuthoredShape::cylinder_on(radius, height, vertical_offset + 0.5, &bounds);

        assert_eq!(cyl.center, Vec2::new(5.0, 0.0));
        assert!((cyl.min_y - 1.5).abs() < 1.0e-6);
        assert!((cyl.max_y - 3.5).abs() < 1.0e-6);
    }
}
