//! Broad-phase pair generation, narrow-phase tests, impulse response, and
//! damage routing (spec §4.5). Operates over the closed [`crate::ids::Body`]
//! enum rather than dynamic dispatch (Design Notes "Dynamic dispatch on
//! `Object`").

pub mod broad_phase;
pub mod damage;
pub mod narrow_phase;
pub mod response;

pub use broad_phase::find_candidate_pairs;
pub use damage::apply_explosion;
pub use response::{
    resolve_entity_entity, resolve_ship_entity, resolve_ship_ship, resolve_ship_terrain, CollisionEvent, CollisionKind,
};

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A non-ship collidable (debris, cannon shot, hazard) — spec §3/§4.5
/// "entity/entity" collisions. Lighter-weight than a [`crate::ship::ShipInstance`]:
/// no components, no damage routing beyond a flat health scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicEntity {
    pub id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub health: f32,
    pub alive: bool,
}

impl DynamicEntity {
    pub fn new(id: EntityId, position: Vec3, velocity: Vec3, mass: f32, radius: f32, health: f32) -> Self {
        Self { id, position, velocity, mass: mass.max(f32::EPSILON), radius: radius.max(0.01), health, alive: true }
    }

    pub fn take_damage(&mut self, magnitude: f32) {
        self.health = (self.health - magnitude).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
    }
}
