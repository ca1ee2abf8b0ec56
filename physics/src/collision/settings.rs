/*!
Static collision resolver settings and tolerances.

Defaults come from `crate::constants`; keep them as sensible values and override
per registry from game data when needed.

Notes
- Distances are world units.
- The stand-on-top tolerance is a tuning value, not load-bearing precision.
*/

use crate::constants::{LANDING_TOLERANCE, MAX_BOX_VOLUME, MIN_BOX_VOLUME, STAND_ON_TOP_TOLERANCE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolverSettings {
    /// A body within this distance below a cylinder's top is standing on it and
    /// is not blocked horizontally.
    pub stand_on_top_tolerance: f32,
    /// Vertical window around a cylinder's top in which `check_land_on_top` reports it.
    pub landing_tolerance: f32,
    /// Accepted volume range for auto-derived boxes.
    pub min_box_volume: f32,
    pub max_box_volume: f32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            stand_on_top_tolerance: STAND_ON_TOP_TOLERANCE,
            landing_tolerance: LANDING_TOLERANCE,
            min_box_volume: MIN_BOX_VOLUME,
            max_box_volume: MAX_BOX_VOLUME,
        }
    }
}
