//! Tunable simulation constants (spec §6 configuration table).
//!
//! Grounded on the source's per-domain `Resource` config structs
//! (`resources::wind::Wind`, `features::water::fluid_dynamics::FluidConfig`,
//! `resources::combat::CannonState`) which each carried a small, documented
//! `Default` struct of tunables rather than free-floating constants.

use serde::{Deserialize, Serialize};

/// Canonical fixed timestep: 1/60 s.
pub const TICK_DT: f32 = 1.0 / 60.0;

/// All tunable physical/behavioral constants for one simulation instance.
///
/// Threaded explicitly through [`crate::sim::tick`] rather than read from
/// any global — see Design Notes "Global singletons" in `SPEC_FULL.md`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Upper bound on concurrent wave components.
    pub max_waves: usize,
    /// Per-tick amplitude decay factor, applied as `decay.powf(dt)`.
    pub wave_decay: f32,
    /// Amplitude below which a wave component is pruned.
    pub min_wave_height: f32,
    /// Reference still-water height.
    pub sea_level: f32,
    /// Water density, kg/m^3.
    pub water_density: f32,
    /// Air density, kg/m^3.
    pub air_density: f32,
    /// Gravitational acceleration, m/s^2.
    pub gravity: f32,
    /// Generic drag coefficient used by hull/sail/rudder drag terms.
    pub drag_coefficient: f32,
    /// Angular velocity damping coefficient.
    pub angular_drag: f32,
    /// Per-axis sample count for the buoyancy/wave-coupling grid (N in NxN).
    pub buoyancy_samples: usize,
    /// Restitution for ship/ship collisions.
    pub collision_restitution_ship: f32,
    /// Restitution for entity/entity collisions.
    pub collision_restitution_entity: f32,
    /// Canonical fixed timestep used by the driver; informational, the
    /// integrator itself accepts an explicit `dt` each tick.
    pub tick_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_waves: 8,
            wave_decay: 0.95,
            min_wave_height: 0.02,
            sea_level: 64.0,
            water_density: 1000.0,
            air_density: 1.225,
            gravity: 9.81,
            drag_coefficient: 0.8,
            angular_drag: 0.8,
            buoyancy_samples: 7,
            collision_restitution_ship: 0.3,
            collision_restitution_entity: 0.5,
            tick_dt: TICK_DT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.max_waves, 8);
        assert!((cfg.wave_decay - 0.95).abs() < 1e-6);
        assert!((cfg.gravity - 9.81).abs() < 1e-6);
        assert_eq!(cfg.buoyancy_samples, 7);
        assert!((cfg.collision_restitution_ship - 0.3).abs() < 1e-6);
        assert!((cfg.collision_restitution_entity - 0.5).abs() < 1e-6);
    }
}
