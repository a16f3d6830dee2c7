//! Impulse resolution and damage application for a confirmed contact
//! (spec §4.5 "Response — ..."). Ship-ship and entity-entity share the
//! same impulse formula with different restitution/energy coefficients;
//! ship-terrain instead reflects-and-scales velocity.

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collision::narrow_phase::Contact;
use crate::collision::DynamicEntity;
use crate::ids::Body;
use crate::ship::damage::DamageKind;
use crate::ship::instance::ShipInstance;
use crate::terrain::TerrainSample;

/// Energy-to-damage coefficient for ship/ship ramming (spec §4.5:
/// "Ramming damage = KE * 0.001").
const SHIP_RAMMING_COEFFICIENT: f32 = 0.001;
/// Energy-to-damage coefficient for ship/terrain impacts (spec §4.5 /
/// scenario S4).
const TERRAIN_DAMAGE_COEFFICIENT: f32 = 0.0005;
/// Post-terrain-impact velocity retention (spec §4.5 "scale by 0.3").
const TERRAIN_VELOCITY_RETENTION: f32 = 0.3;
/// Energy-to-damage coefficient for entity/entity impacts (spec §4.5:
/// "entities take damage more easily").
const ENTITY_DAMAGE_COEFFICIENT: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    ShipShip,
    ShipTerrain,
    EntityEntity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: Body,
    pub b: Body,
    pub point: Vec3,
    pub energy: f32,
    pub kind: CollisionKind,
    pub damage_kind: DamageKind,
}

fn world_to_local(ship: &ShipInstance, world_point: Vec3) -> Vec3 {
    ship.orientation.inverse() * (world_point - ship.position)
}

fn bow_local(ship: &ShipInstance) -> Vec3 {
    Vec3::new(0.0, 0.0, ship.ship_type.length * 0.5)
}

/// Resolves a ship/ship impulse (spec §4.5 "Response — ship/ship").
/// Returns `None` if the pair is already separating (early-out).
pub fn resolve_ship_ship(a: &mut ShipInstance, b: &mut ShipInstance, contact: Contact, restitution: f32) -> Option<CollisionEvent> {
    let relative_velocity = a.linear_velocity - b.linear_velocity;
    let v_rel = relative_velocity.dot(contact.normal);
    if v_rel < 0.0 {
        return None;
    }

    let inv_mass_a = 1.0 / a.mass.max(f32::EPSILON);
    let inv_mass_b = 1.0 / b.mass.max(f32::EPSILON);
    let j = -(1.0 + restitution) * v_rel / (inv_mass_a + inv_mass_b);

    a.linear_velocity += contact.normal * (j * inv_mass_a);
    b.linear_velocity -= contact.normal * (j * inv_mass_b);

    let reduced_mass = (a.mass * b.mass) / (a.mass + b.mass);
    let energy = 0.5 * reduced_mass * v_rel * v_rel;
    let damage = energy * SHIP_RAMMING_COEFFICIENT;

    let a_local = bow_local(a);
    let b_local = bow_local(b);
    a.take_damage(a_local, damage, DamageKind::Ramming);
    b.take_damage(b_local, damage, DamageKind::Ramming);
    info!(ship_a = a.id.0, ship_b = b.id.0, energy, "ship-ship ramming collision resolved");

    Some(CollisionEvent {
        a: Body::Ship(a.id),
        b: Body::Ship(b.id),
        point: contact.point,
        energy,
        kind: CollisionKind::ShipShip,
        damage_kind: DamageKind::Ramming,
    })
}

/// Resolves a ship/terrain impact (spec §4.5 "Response — ship/terrain").
pub fn resolve_ship_terrain(ship: &mut ShipInstance, sample: TerrainSample, contact: Contact) -> CollisionEvent {
    let forward = ship.forward();
    let alignment = forward.dot(contact.normal);
    let (impact_multiplier, damage_kind) = if sample.is_reef() {
        let base = classify_alignment_multiplier(alignment);
        (base * 1.3, DamageKind::Reef)
    } else {
        (classify_alignment_multiplier(alignment), DamageKind::Collision)
    };

    let speed = ship.linear_velocity.length();
    let energy = 0.5 * ship.mass * speed * speed;
    let damage = energy * TERRAIN_DAMAGE_COEFFICIENT * impact_multiplier;

    let incoming = ship.linear_velocity.dot(contact.normal);
    if incoming < 0.0 {
        ship.linear_velocity -= contact.normal * (2.0 * incoming);
    }
    ship.linear_velocity *= TERRAIN_VELOCITY_RETENTION;

    let local_point = world_to_local(ship, contact.point);
    ship.take_damage(local_point, damage, damage_kind);
    info!(ship = ship.id.0, reef = sample.is_reef(), damage, "ship-terrain collision resolved");

    CollisionEvent {
        a: Body::Ship(ship.id),
        b: Body::Terrain(crate::ids::ChunkId(0, 0)),
        point: contact.point,
        energy,
        kind: CollisionKind::ShipTerrain,
        damage_kind,
    }
}

/// bow<-0.5 ×1.5, side(|dot|<0.5) ×1.0, stern ×0.8 (spec §4.5).
fn classify_alignment_multiplier(alignment: f32) -> f32 {
    if alignment < -0.5 {
        1.5
    } else if alignment.abs() < 0.5 {
        1.0
    } else {
        0.8
    }
}

/// Resolves a ship/entity impulse. The spec names ship/ship, ship/terrain,
/// and entity/entity response formulas explicitly but leaves ship/entity
/// unspecified; resolved here as the ship/ship formula with the entity
/// restitution and the entity-side damage coefficient, treating the
/// entity as a very light "ship" for impulse purposes (see `DESIGN.md`).
pub fn resolve_ship_entity(ship: &mut ShipInstance, entity: &mut DynamicEntity, contact: Contact, restitution: f32) -> Option<CollisionEvent> {
    let relative_velocity = ship.linear_velocity - entity.velocity;
    let v_rel = relative_velocity.dot(contact.normal);
    if v_rel < 0.0 {
        return None;
    }

    let inv_mass_ship = 1.0 / ship.mass.max(f32::EPSILON);
    let inv_mass_entity = 1.0 / entity.mass;
    let j = -(1.0 + restitution) * v_rel / (inv_mass_ship + inv_mass_entity);

    ship.linear_velocity += contact.normal * (j * inv_mass_ship);
    entity.velocity -= contact.normal * (j * inv_mass_entity);

    let reduced_mass = (ship.mass * entity.mass) / (ship.mass + entity.mass);
    let energy = 0.5 * reduced_mass * v_rel * v_rel;

    let local_point = world_to_local(ship, contact.point);
    ship.take_damage(local_point, energy * SHIP_RAMMING_COEFFICIENT, DamageKind::Collision);
    entity.take_damage(energy * ENTITY_DAMAGE_COEFFICIENT);

    Some(CollisionEvent {
        a: Body::Ship(ship.id),
        b: Body::Entity(entity.id),
        point: contact.point,
        energy,
        kind: CollisionKind::EntityEntity,
        damage_kind: DamageKind::Collision,
    })
}

/// Resolves an entity/entity impulse (spec §4.5 "Response — entity/entity").
pub fn resolve_entity_entity(a: &mut DynamicEntity, b: &mut DynamicEntity, contact: Contact, restitution: f32) -> Option<CollisionEvent> {
    let relative_velocity = a.velocity - b.velocity;
    let v_rel = relative_velocity.dot(contact.normal);
    if v_rel < 0.0 {
        return None;
    }

    let inv_mass_a = 1.0 / a.mass;
    let inv_mass_b = 1.0 / b.mass;
    let j = -(1.0 + restitution) * v_rel / (inv_mass_a + inv_mass_b);

    a.velocity += contact.normal * (j * inv_mass_a);
    b.velocity -= contact.normal * (j * inv_mass_b);

    let reduced_mass = (a.mass * b.mass) / (a.mass + b.mass);
    let energy = 0.5 * reduced_mass * v_rel * v_rel;
    let damage = energy * ENTITY_DAMAGE_COEFFICIENT;
    a.take_damage(damage);
    b.take_damage(damage);

    Some(CollisionEvent {
        a: Body::Entity(a.id),
        b: Body::Entity(b.id),
        point: contact.point,
        energy,
        kind: CollisionKind::EntityEntity,
        damage_kind: DamageKind::Collision,
    })
}
