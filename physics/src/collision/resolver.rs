use std::collections::BTreeMap;

use crate::utils::to_planar;

use super::{
    broad, narrow_phase,
    settings::ResolverSettings,
    shapes::{AuthoredShape, CollisionShapeTable},
    types::{Aabb, ColliderEntry, ColliderOwner, ColliderRejected, ColliderShape, CylinderSpec, Vec3},
};

/// Registry of immovable obstacles and the queries that keep bodies out of them.
///
/// Notes
/// - Entries are keyed by owner and iterated in owner order, so results never depend
///   on registration order.
/// - Register/unregister at load time or on object lifecycle events. The per-tick
///   queries (`resolve`, `resolve_sliding`, `check_land_on_top`) only read.
#[derive(Clone, Debug, Default)]
pub struct StaticColliders {
    entries: BTreeMap<ColliderOwner, ColliderEntry>,
    settings: ResolverSettings,
}

impl StaticColliders {
    pub fn new(settings: ResolverSettings) -> Self {
        Self {
            entries: BTreeMap::new(),
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, owner: ColliderOwner) -> Option<&ColliderEntry> {
        self.entries.get(&owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderOwner, &ColliderEntry)> {
        self.entries.iter().map(|(owner, entry)| (*owner, entry))
    }

    /// Register a box collider from an object's world bounds.
    ///
    /// Boxes with a volume outside `[min_box_volume, max_box_volume]` are skipped.
    pub fn register_box(&mut self, owner: ColliderOwner, bounds: Aabb) -> Result<(), ColliderRejected> {
        let entry = ColliderEntry::checked_box(
            bounds,
            self.settings.min_box_volume,
            self.settings.max_box_volume,
        );
        self.insert_checked(owner, entry)
    }

    /// Register an authored vertical cylinder.
    pub fn register_cylinder(
        &mut self,
        owner: ColliderOwner,
        cylinder: CylinderSpec,
    ) -> Result<(), ColliderRejected> {
        let entry = ColliderEntry::checked_cylinder(cylinder);
        self.insert_checked(owner, entry)
    }

    /// Register an object, resolving its shape once through the authored table.
    pub fn register_object(
        &mut self,
        owner: ColliderOwner,
        asset_key: &str,
        bounds: Aabb,
        table: &CollisionShapeTable,
    ) -> Result<(), ColliderRejected> {
        match table.shape_for(asset_key) {
            AuthoredShape::Box => self.register_box(owner, bounds),
            AuthoredShape::Cylinder {
                radius,
                height,
                vertical_offset,
            } => {
                let cylinder = AuthoredShape::cylinder_on(radius, height, vertical_offset, &bounds);
                self.register_cylinder(owner, cylinder)
            }
            AuthoredShape::Disabled => self.insert_checked(owner, Err(ColliderRejected::Disabled)),
        }
    }

    /// Remove the collider owned by `owner`. Returns whether one existed.
    pub fn unregister(&mut self, owner: ColliderOwner) -> bool {
        let removed = self.entries.remove(&owner).is_some();
        if !removed {
            log::debug!("unregister: no collider for owner {owner}");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert_checked(
        &mut self,
        owner: ColliderOwner,
        entry: Result<ColliderEntry, ColliderRejected>,
    ) -> Result<(), ColliderRejected> {
        match entry {
            Ok(entry) => {
                self.entries.insert(owner, entry);
                Ok(())
            }
            Err(reason) => {
                log::debug!("skipping collider for owner {owner}: {reason}");
                Err(reason)
            }
        }
    }

    /// Would a body of `body_radius` at `position` overlap any collider?
    pub fn is_blocked(&self, position: Vec3, body_radius: f32) -> bool {
        let r = sanitize_radius(body_radius);
        let planar = to_planar(&position);
        self.entries.values().any(|entry| {
            broad::within_reach(entry, planar, r)
                && narrow_phase::entry_blocks(entry, position, r, self.settings.stand_on_top_tolerance)
        })
    }

    /// Resolve a proposed move with a full horizontal stop.
    ///
    /// When `to` is blocked the body keeps `from`'s X/Z but takes `to`'s Y, so falling
    /// and jumping continue against walls. No push-out is attempted.
    pub fn resolve(&self, from: Vec3, to: Vec3, body_radius: f32) -> Vec3 {
        if !is_finite(&to) {
            return from;
        }
        if self.is_blocked(to, body_radius) {
            return hold(from, to);
        }
        to
    }

    /// Resolve a proposed move, sliding along obstacles on a single axis if possible.
    ///
    /// When the direct move is blocked, the X-only and Z-only moves are tried. If both
    /// are free, the one travelling further from `from` wins. If neither is, the body
    /// holds position (keeping `to`'s Y).
    pub fn resolve_sliding(&self, from: Vec3, to: Vec3, body_radius: f32) -> Vec3 {
        if !is_finite(&to) {
            return from;
        }
        if !self.is_blocked(to, body_radius) {
            return to;
        }

        let x_only = Vec3::new(to.x, to.y, from.z);
        let z_only = Vec3::new(from.x, to.y, to.z);
        let x_free = !self.is_blocked(x_only, body_radius);
        let z_free = !self.is_blocked(z_only, body_radius);

        match (x_free, z_free) {
            (true, true) => {
                if (to.x - from.x).abs() >= (to.z - from.z).abs() {
                    x_only
                } else {
                    z_only
                }
            }
            (true, false) => x_only,
            (false, true) => z_only,
            (false, false) => hold(from, to),
        }
    }

    /// Highest cylinder top a body at `position` can land on, if any.
    ///
    /// A cylinder qualifies when its planar footprint (grown by `body_radius`) contains
    /// the body and its top is at or below the body, at most `landing_tolerance` down.
    pub fn check_land_on_top(&self, position: Vec3, body_radius: f32) -> Option<f32> {
        if !is_finite(&position) {
            return None;
        }
        let r = sanitize_radius(body_radius);
        let planar = to_planar(&position);
        let tolerance = self.settings.landing_tolerance;

        self.entries
            .values()
            .filter_map(|entry| match &entry.shape {
                ColliderShape::Cylinder(cylinder) => Some(cylinder),
                ColliderShape::Box(_) => None,
            })
            .filter(|cylinder| {
                let reach = cylinder.radius + r;
                let drop = position.y - cylinder.max_y;
                (planar - cylinder.center).norm_squared() <= reach * reach
                    && (0.0..=tolerance).contains(&drop)
            })
            .map(|cylinder| cylinder.max_y)
            .fold(None, |best: Option<f32>, top| Some(best.map_or(top, |b| b.max(top))))
    }
}

#[inline]
fn hold(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(from.x, to.y, from.z)
}

#[inline]
fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[inline]
fn sanitize_radius(r: f32) -> f32 {
    if r.is_finite() { r.max(0.0) } else { 0.0 }
}
