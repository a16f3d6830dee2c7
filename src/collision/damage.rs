//! Explosion propagation to nearby components (spec §4.4 "On destruction
//! with ammunition present ... Explosion damages nearby components with
//! linear falloff").

use bevy_math::Vec3;

use crate::ship::damage::DamageKind;
use crate::ship::instance::ShipInstance;

/// Minimum damage fraction applied at the edge of the explosion radius
/// (spec §4.4: "linear falloff (min 20% at edge)").
const EDGE_FALLOFF_FRACTION: f32 = 0.2;

/// Applies `damage` at `origin_local` with linear falloff to every live
/// component within `radius`, routed the same way any other local-point
/// damage is (closest-component-first is irrelevant here — every
/// component within range takes its own falloff-scaled share).
pub fn apply_explosion(ship: &mut ShipInstance, origin_local: Vec3, radius: f32, damage: f32, kind: DamageKind) {
    if radius <= 0.0 || damage <= 0.0 {
        return;
    }
    let ids: Vec<_> = ship
        .components()
        .iter()
        .filter(|c| !c.destroyed)
        .map(|c| (c.id, c.local_position.distance(origin_local)))
        .filter(|(_, d)| *d <= radius)
        .collect();

    for (id, distance) in ids {
        let falloff = 1.0 - (1.0 - EDGE_FALLOFF_FRACTION) * (distance / radius).clamp(0.0, 1.0);
        if let Some(component) = ship.component_mut(id) {
            component.take_damage(damage * falloff, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Quat;
    use crate::ids::ShipId;
    use crate::ship::component::{CannonPayload, ComponentPayload};
    use crate::ship::ShipType;

    #[test]
    fn closer_components_take_more_damage_than_farther_ones() {
        let mut ship = ShipInstance::new(ShipId(0), "A", ShipType::medium_frigate(), Vec3::ZERO, Quat::IDENTITY);
        let near = ship.add_component(Vec3::new(1.0, 0.0, 0.0), 100.0, 50.0, ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 2.0)));
        let far = ship.add_component(Vec3::new(9.0, 0.0, 0.0), 100.0, 50.0, ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 2.0)));

        apply_explosion(&mut ship, Vec3::ZERO, 10.0, 100.0, DamageKind::Explosion);

        let near_health = ship.component(near).unwrap().health;
        let far_health = ship.component(far).unwrap().health;
        assert!(near_health < far_health);
    }

    #[test]
    fn components_outside_radius_are_untouched() {
        let mut ship = ShipInstance::new(ShipId(0), "A", ShipType::medium_frigate(), Vec3::ZERO, Quat::IDENTITY);
        let far = ship.add_component(Vec3::new(50.0, 0.0, 0.0), 100.0, 50.0, ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 2.0)));
        apply_explosion(&mut ship, Vec3::ZERO, 10.0, 100.0, DamageKind::Explosion);
        assert_eq!(ship.component(far).unwrap().health, 100.0);
    }
}
