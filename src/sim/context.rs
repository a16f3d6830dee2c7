//! Explicit simulation state, threaded through `tick` rather than read
//! from any global (Design Notes "Global singletons").

use rand::Rng;
use rand_pcg::Pcg32;

use crate::collision::DynamicEntity;
use crate::config::SimConfig;
use crate::ids::EntityId;
use crate::ocean::OceanEnvironment;
use crate::ship::ShipRegistry;
use crate::terrain::TerrainQuery;
use crate::wave::WaveField;

/// Everything one simulation instance owns. Not `Clone`-able by design
/// (it owns a boxed terrain provider); construct one per simulation, not
/// per tick.
pub struct SimulationContext {
    pub config: SimConfig,
    pub waves: WaveField,
    pub ocean: OceanEnvironment,
    pub ships: ShipRegistry,
    pub entities: Vec<DynamicEntity>,
    pub terrain: Box<dyn TerrainQuery>,
    pub time: f32,
    rng: Pcg32,
    next_entity_id: u32,
}

fn misfire_rng(seed: u64) -> Pcg32 {
    Pcg32::new(seed.wrapping_mul(2685821657736338717).wrapping_add(1), 0x14057b7ef767814f)
}

impl SimulationContext {
    pub fn new(config: SimConfig, terrain: Box<dyn TerrainQuery>, seed: u64) -> Self {
        Self {
            waves: WaveField::new(config.max_waves, config.wave_decay, config.min_wave_height, seed),
            ocean: OceanEnvironment::new(config.sea_level, seed as u32),
            ships: ShipRegistry::new(),
            entities: Vec::new(),
            terrain,
            time: 0.0,
            rng: misfire_rng(seed),
            next_entity_id: 0,
            config,
        }
    }

    pub fn spawn_entity(&mut self, entity: crate::collision::DynamicEntity) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        let mut entity = entity;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub fn prune_dead_entities(&mut self) {
        self.entities.retain(|e| e.alive);
    }

    /// Draws one `[0, 1)` sample from the context's seeded RNG, used for
    /// cannon misfire rolls and rudder jam rolls (spec §4.4) — kept
    /// separate from the wave field's own RNG so wave generation and
    /// component-level randomness don't perturb each other's sequences.
    pub fn roll(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;

    #[test]
    fn rolls_are_reproducible_given_the_same_seed() {
        let mut a = SimulationContext::new(SimConfig::default(), Box::new(FlatTerrain::open_water(0.0)), 42);
        let mut b = SimulationContext::new(SimConfig::default(), Box::new(FlatTerrain::open_water(0.0)), 42);
        for _ in 0..10 {
            assert_eq!(a.roll(), b.roll());
        }
    }
}
