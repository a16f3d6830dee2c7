//! Stable handles used instead of owning pointers or Bevy `Entity`s.
//!
//! Grounded on Design Notes "Cyclic references (ship ↔ component)": ships
//! own a `Vec` of components; components hold back-references by index,
//! never by pointer. The same handle style stands in for the source's
//! `Entity`-keyed `Query` lookups (`systems::combat::projectile_collision_system`
//! resolved ships by `Entity`; here the equivalent is a `ShipId` resolved
//! through [`crate::ship::registry::ShipRegistry`]).

use serde::{Deserialize, Serialize};

/// Handle to a ship inside a [`crate::ship::registry::ShipRegistry`].
/// Resolves to `None` once the ship has been pruned — never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// Handle to a component inside its owning ship's component arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

/// Handle to a non-ship collidable entity (debris, projectiles, hazards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Handle to a terrain chunk, as returned by [`crate::terrain::TerrainQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(pub i32, pub i32);

/// Closed enum of collidable bodies (Design Notes "Dynamic dispatch on
/// `Object`"): replaces runtime type checks with a pattern-matchable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Ship(ShipId),
    Entity(EntityId),
    Terrain(ChunkId),
}
