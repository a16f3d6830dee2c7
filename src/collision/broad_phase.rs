//! O(n²) candidate pair enumeration over active ships and entities
//! (spec §4.5 "Broad phase"). Terrain is not enumerated here — each ship
//! samples its own chunk directly once per tick (see `sim::tick`), since
//! terrain coverage is total rather than a finite set of bodies to pair
//! against.

use bevy_math::Vec3;

use crate::collision::DynamicEntity;
use crate::ids::{Body, EntityId, ShipId};
use crate::ship::ShipRegistry;

/// Bounding-sphere radius is inflated by this factor for pairs where
/// either body moves fast enough to tunnel through a narrow gap in one
/// tick (spec §4.5 "inflated 1.5x for fast-moving pairs").
const FAST_MOVER_INFLATION: f32 = 1.5;
/// Speed (m/s) past which a body is considered "fast" for inflation
/// purposes.
const FAST_MOVER_SPEED_THRESHOLD: f32 = 10.0;

struct BoundingSphere {
    center: Vec3,
    radius: f32,
    speed: f32,
}

fn ship_sphere(ships: &ShipRegistry, id: ShipId) -> Option<BoundingSphere> {
    let ship = ships.get(id)?;
    let ty = ship.ship_type;
    Some(BoundingSphere {
        center: ship.position,
        radius: ty.length.max(ty.width) * 0.5,
        speed: ship.linear_velocity.length(),
    })
}

fn entity_sphere(entity: &DynamicEntity) -> BoundingSphere {
    BoundingSphere { center: entity.position, radius: entity.radius, speed: entity.velocity.length() }
}

fn overlaps(a: &BoundingSphere, b: &BoundingSphere) -> bool {
    let inflate = |s: &BoundingSphere| {
        if s.speed > FAST_MOVER_SPEED_THRESHOLD {
            s.radius * FAST_MOVER_INFLATION
        } else {
            s.radius
        }
    };
    let distance = a.center.distance(b.center);
    distance <= inflate(a) + inflate(b)
}

/// Enumerates every ship/ship, ship/entity, and entity/entity pair whose
/// (possibly inflated) bounding spheres overlap. Deterministic order:
/// ships iterate in ascending [`ShipId`] order (per [`ShipRegistry::iter`]),
/// entities in slice order.
pub fn find_candidate_pairs(ships: &ShipRegistry, entities: &[DynamicEntity]) -> Vec<(Body, Body)> {
    let mut pairs = Vec::new();

    let ship_ids: Vec<ShipId> = ships.ids().collect();
    for i in 0..ship_ids.len() {
        let Some(sphere_a) = ship_sphere(ships, ship_ids[i]) else { continue };
        for j in (i + 1)..ship_ids.len() {
            let Some(sphere_b) = ship_sphere(ships, ship_ids[j]) else { continue };
            if overlaps(&sphere_a, &sphere_b) {
                pairs.push((Body::Ship(ship_ids[i]), Body::Ship(ship_ids[j])));
            }
        }
    }

    for &ship_id in &ship_ids {
        let Some(sphere_a) = ship_sphere(ships, ship_id) else { continue };
        for entity in entities.iter().filter(|e| e.alive) {
            let sphere_b = entity_sphere(entity);
            if overlaps(&sphere_a, &sphere_b) {
                pairs.push((Body::Ship(ship_id), Body::Entity(entity.id)));
            }
        }
    }

    for i in 0..entities.len() {
        if !entities[i].alive {
            continue;
        }
        let sphere_a = entity_sphere(&entities[i]);
        for j in (i + 1)..entities.len() {
            if !entities[j].alive {
                continue;
            }
            let sphere_b = entity_sphere(&entities[j]);
            if overlaps(&sphere_a, &sphere_b) {
                pairs.push((Body::Entity(entities[i].id), Body::Entity(entities[j].id)));
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Quat;

    #[test]
    fn far_apart_entities_do_not_pair() {
        let entities = vec![
            DynamicEntity::new(EntityId(0), Vec3::ZERO, Vec3::ZERO, 1.0, 1.0, 10.0),
            DynamicEntity::new(EntityId(1), Vec3::new(1000.0, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0, 10.0),
        ];
        let registry = ShipRegistry::new();
        assert!(find_candidate_pairs(&registry, &entities).is_empty());
    }

    #[test]
    fn overlapping_ships_pair_up() {
        let mut registry = ShipRegistry::new();
        let a = registry.spawn("A", crate::ship::ShipType::light_sloop(), Vec3::ZERO, Quat::IDENTITY);
        let b = registry.spawn("B", crate::ship::ShipType::light_sloop(), Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY);
        let pairs = find_candidate_pairs(&registry, &[]);
        assert_eq!(pairs, vec![(Body::Ship(a), Body::Ship(b))]);
    }
}
