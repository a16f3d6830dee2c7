//! The seam named in spec §6: `terrainQuery(cx, cz) -> { height,
//! materialHint }`, used by narrow-phase collision tests to classify reef
//! vs open water. Chunk streaming itself is out of scope (Design Notes
//! open question 1): the core only consumes the trait, never owns a
//! loader.

use serde::{Deserialize, Serialize};

use crate::ids::ChunkId;

/// Coarse material classification a terrain provider can report back;
/// collision response uses `Reef` to apply the shallow-water damage
/// multiplier (spec §4.5 "Response — ship/terrain").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialHint {
    OpenWater,
    Reef,
    Sand,
    Rock,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    pub height: f32,
    pub material: MaterialHint,
}

impl TerrainSample {
    /// Reef classification threshold: chunks shallower than 5 units
    /// (spec §4.5 "Shallow-water chunks (y<5) are reefs").
    pub const REEF_HEIGHT_THRESHOLD: f32 = 5.0;

    pub fn is_reef(&self) -> bool {
        matches!(self.material, MaterialHint::Reef) || self.height < Self::REEF_HEIGHT_THRESHOLD
    }
}

/// External terrain lookup, resolved by chunk coordinate. Implementors
/// back this with whatever chunk-streaming system they already run; the
/// core never blocks on it (spec §5 "The core itself performs no
/// blocking I/O").
pub trait TerrainQuery {
    fn sample(&self, chunk: ChunkId) -> TerrainSample;

    /// Resolves the chunk containing world position `(x, z)` at a fixed
    /// chunk size. Implementors with a different chunking scheme should
    /// override this; the default assumes 16-unit chunks.
    fn chunk_at(&self, x: f32, z: f32) -> ChunkId {
        ChunkId((x / 16.0).floor() as i32, (z / 16.0).floor() as i32)
    }

    fn sample_world(&self, x: f32, z: f32) -> TerrainSample {
        self.sample(self.chunk_at(x, z))
    }
}

/// Trivial fixed-height in-memory terrain used by tests and the demo
/// binary; not a chunk streaming system.
#[derive(Debug, Clone, Default)]
pub struct FlatTerrain {
    pub height: f32,
    pub material: Option<MaterialHint>,
}

impl FlatTerrain {
    pub fn open_water(height: f32) -> Self {
        Self { height, material: Some(MaterialHint::OpenWater) }
    }

    pub fn reef(height: f32) -> Self {
        Self { height, material: Some(MaterialHint::Reef) }
    }
}

impl TerrainQuery for FlatTerrain {
    fn sample(&self, _chunk: ChunkId) -> TerrainSample {
        TerrainSample {
            height: self.height,
            material: self.material.unwrap_or(MaterialHint::OpenWater),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_height_classifies_as_reef_even_without_hint() {
        let sample = TerrainSample { height: 3.0, material: MaterialHint::OpenWater };
        assert!(sample.is_reef());
    }

    #[test]
    fn deep_open_water_is_not_reef() {
        let sample = TerrainSample { height: 40.0, material: MaterialHint::OpenWater };
        assert!(!sample.is_reef());
    }

    #[test]
    fn flat_terrain_resolves_any_world_position() {
        let terrain = FlatTerrain::reef(2.0);
        let sample = terrain.sample_world(123.4, -56.7);
        assert!(sample.is_reef());
    }
}
