//! Immutable ship templates (spec §3 "Ship Type").

use serde::{Deserialize, Serialize};

/// Broad category driving baseline tuning; narrow enough to match spec,
/// not meant to be exhaustive of every hull in a full game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    Light,
    Medium,
    Heavy,
    Merchant,
    Pirate,
    Supernatural,
}

/// Read-only prototype shared by every [`crate::ship::instance::ShipInstance`]
/// built from it. Grounded on the source's per-class constant sets
/// (`systems::ship::spawn_player_ship` hardcoding mass/inertia/collider per
/// spawn site); generalized here into a reusable, data-driven template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipType {
    pub class: ShipClass,
    pub base_mass: f32,
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub draft: f32,
    pub base_health: f32,
    pub base_cargo_capacity: f32,
    pub base_crew_capacity: u32,
    pub base_maneuverability: f32,
    pub base_stability: f32,
}

impl ShipType {
    pub const fn new(
        class: ShipClass,
        base_mass: f32,
        length: f32,
        width: f32,
        height: f32,
        draft: f32,
        base_health: f32,
        base_cargo_capacity: f32,
        base_crew_capacity: u32,
        base_maneuverability: f32,
        base_stability: f32,
    ) -> Self {
        Self {
            class,
            base_mass,
            length,
            width,
            height,
            draft,
            base_health,
            base_cargo_capacity,
            base_crew_capacity,
            base_maneuverability,
            base_stability,
        }
    }

    /// A small, self-consistent catalog for tests and demos. Not a claim
    /// about full-game tuning — callers are expected to supply their own.
    ///
    /// Footprint (`length * width = 24.5 m^2`) is chosen so this hull's
    /// mass and draft settle at static equilibrium at exactly
    /// `sea_level - draft` under the buoyancy sampler's `/N^2` term (spec
    /// §4.3 step 2, `buoyancy_samples = 7`) — see DESIGN.md Open Question 5.
    pub fn light_sloop() -> Self {
        Self::new(ShipClass::Light, 1000.0, 7.0, 3.5, 8.0, 1.0, 300.0, 50.0, 8, 1.4, 1.1)
    }

    pub fn medium_frigate() -> Self {
        Self::new(ShipClass::Medium, 2000.0, 32.0, 9.0, 11.0, 1.8, 600.0, 150.0, 20, 1.0, 1.0)
    }

    pub fn heavy_galleon() -> Self {
        Self::new(ShipClass::Heavy, 5000.0, 45.0, 13.0, 15.0, 2.6, 1200.0, 400.0, 40, 0.7, 1.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_have_positive_draft_and_mass() {
        for ty in [ShipType::light_sloop(), ShipType::medium_frigate(), ShipType::heavy_galleon()] {
            assert!(ty.base_mass > 0.0);
            assert!(ty.draft > 0.0);
            assert!(ty.length > 0.0 && ty.width > 0.0);
        }
    }
}
