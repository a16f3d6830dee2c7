//! A single ship: rigid-body state plus its component arena (spec §3
//! "Ship Instance"). Grounded on `components::ship::Ship` (the source's
//! marker component holding `current_health`/`max_health`) and
//! `components::health::Health`, generalized into the full rigid-body +
//! arena model the Design Notes require instead of an ECS component graph.

use bevy_math::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ids::{ComponentId, ShipId};
use crate::ship::component::{Component, ComponentKindTag, ComponentPayload};
use crate::ship::damage::DamageKind;
use crate::ship::ship_type::ShipType;

/// A single recorded impact (spec §3 "ordered collection of damage points").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagePoint {
    pub local_position: Vec3,
    pub magnitude: f32,
    pub kind: DamageKind,
    pub age: f32,
}

/// Water-intrusion threshold past which a ship is classified sinking
/// (spec §4.3 step 10, glossary "Water intrusion").
const SINKING_INTRUSION_FRACTION: f32 = 1.0;

/// Rate (per second) water intrusion rises, proportional to current level.
const INTRUSION_GROWTH_RATE: f32 = 0.01;
/// Rate (per second) water intrusion drains in the absence of growth.
const INTRUSION_DRAIN_RATE: f32 = 0.1;
/// Rate (per second) buoyancy relaxes toward its target.
const BUOYANCY_RELAX_RATE: f32 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipInstance {
    pub id: ShipId,
    pub name: String,
    pub ship_type: ShipType,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub water_intrusion: f32,
    pub buoyancy: f32,
    pub max_buoyancy: f32,
    pub is_sinking: bool,
    pub mass: f32,
    /// External force accumulated this tick via `applyExternalForce`
    /// (spec §6 inputs); consumed and reset by the integrator each tick.
    pub external_force: Vec3,
    pub damage_points: Vec<DamagePoint>,
    components: Vec<Component>,
    next_component_id: u32,
}

impl ShipInstance {
    pub fn new(id: ShipId, name: impl Into<String>, ship_type: ShipType, position: Vec3, orientation: Quat) -> Self {
        let mass = ship_type.base_mass;
        Self {
            id,
            name: name.into(),
            ship_type,
            position,
            orientation: orientation.normalize(),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            water_intrusion: 0.0,
            buoyancy: 1.0,
            max_buoyancy: 1.0,
            is_sinking: false,
            mass,
            external_force: Vec3::ZERO,
            damage_points: Vec::new(),
            components: Vec::new(),
            next_component_id: 0,
        }
    }

    pub fn add_component(&mut self, local_position: Vec3, max_health: f32, mass: f32, payload: ComponentPayload) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        let component = Component::new(id, self.id, local_position, max_health, mass, payload);
        self.components.push(component);
        self.recompute_mass();
        id
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn components_of_kind(&self, tag: ComponentKindTag) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.kind_tag() == tag)
    }

    pub fn components_of_kind_mut(&mut self, tag: ComponentKindTag) -> impl Iterator<Item = &mut Component> {
        self.components.iter_mut().filter(move |c| c.kind_tag() == tag)
    }

    /// mass = baseMass + Σ component.mass (spec §3 invariant 2, live or not
    /// — destroyed components remain attached with reduced mass-equivalent
    /// buoyancy, not reduced mass).
    pub fn recompute_mass(&mut self) {
        let component_mass: f32 = self.components.iter().map(|c| c.mass).sum();
        self.mass = self.ship_type.base_mass + component_mass;
        debug_assert!(self.mass > 0.0, "ship mass must stay positive");
        self.mass = self.mass.max(f32::EPSILON);
    }

    /// Center of mass in ship-local space, weighted by the hull's base mass
    /// (assumed at the ship origin) plus each component's local position.
    pub fn center_of_mass(&self) -> Vec3 {
        let mut weighted = Vec3::ZERO;
        let mut total = self.ship_type.base_mass.max(0.0);
        for c in &self.components {
            weighted += c.local_position * c.mass;
            total += c.mass;
        }
        if total <= f32::EPSILON {
            Vec3::ZERO
        } else {
            weighted / total
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Total live hull health across all Hull components (spec §8
    /// invariant 3 is checked per-hull-component; ships typically carry
    /// exactly one).
    pub fn hull_health(&self) -> f32 {
        self.components
            .iter()
            .filter_map(|c| match &c.payload {
                ComponentPayload::Hull { sections, .. } => Some(sections.total_health()),
                _ => None,
            })
            .sum()
    }

    pub fn hull_max_health(&self) -> f32 {
        self.components
            .iter()
            .filter_map(|c| match &c.payload {
                ComponentPayload::Hull { sections, .. } => Some(sections.total_max_health()),
                _ => None,
            })
            .sum()
    }

    pub fn total_hull_volume(&self) -> f32 {
        self.components.iter().map(Component::hull_volume).sum()
    }

    /// Renormalizes the orientation quaternion (Design Notes "Exceptions
    /// and throws"/"Impossible" class in §7): debug-assert the drift was
    /// small, then always clamp back to unit length in release.
    pub fn normalize_orientation(&mut self) {
        let len = self.orientation.length();
        debug_assert!((len - 1.0).abs() < 0.05, "orientation drifted far from unit length: {len}");
        if len > f32::EPSILON {
            self.orientation = self.orientation.normalize();
        } else {
            self.orientation = Quat::IDENTITY;
        }
    }

    pub fn roll_pitch(&self) -> (f32, f32) {
        let (_, pitch, roll) = self.orientation.to_euler(EulerRot::YXZ);
        (roll, pitch)
    }

    /// Routes damage to the closest live component to `local_position`
    /// (spec §4.5 "Invariants": "Ship::takeDamage ... internally selects
    /// the closest live component"). Returns the id damaged and the
    /// magnitude actually applied, or `None` if no live component exists.
    pub fn take_damage(&mut self, local_position: Vec3, magnitude: f32, kind: DamageKind) -> Option<(ComponentId, f32)> {
        let closest = self
            .components
            .iter_mut()
            .filter(|c| !c.destroyed)
            .min_by(|a, b| {
                let da = a.local_position.distance_squared(local_position);
                let db = b.local_position.distance_squared(local_position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })?;
        let applied = closest.take_damage(magnitude, kind);
        let id = closest.id;
        self.damage_points.push(DamagePoint { local_position, magnitude: applied, kind, age: 0.0 });
        if closest.destroyed {
            if let ComponentPayload::Hull { .. } = &closest.payload {
                self.is_sinking = true;
                warn!(ship = self.id.0, "hull destroyed, ship sinking");
            }
        }
        Some((id, applied))
    }

    /// Advances per-component timers, ages damage points, and propagates
    /// water-intrusion/buoyancy state (spec §4.3 step 10).
    pub fn update_components_and_intrusion(&mut self, dt: f32, wind_speed: f32, rng_roll: f32) {
        let ship_speed = self.linear_velocity.length();
        for c in &mut self.components {
            c.update(dt, wind_speed, ship_speed, rng_roll);
        }
        for p in &mut self.damage_points {
            p.age += dt;
        }

        if self.water_intrusion > 0.0 {
            self.water_intrusion += self.water_intrusion * INTRUSION_GROWTH_RATE * dt;
        }
        self.water_intrusion = (self.water_intrusion - INTRUSION_DRAIN_RATE * dt).max(0.0);

        let target_buoyancy = (self.max_buoyancy - self.water_intrusion).max(0.0);
        self.buoyancy += (target_buoyancy - self.buoyancy) * (BUOYANCY_RELAX_RATE * dt).clamp(0.0, 1.0);

        if self.water_intrusion >= self.max_buoyancy * SINKING_INTRUSION_FRACTION
            || self.buoyancy <= 0.0
            || self.hull_max_health() > 0.0 && self.hull_health() <= 0.0
        {
            if !self.is_sinking {
                warn!(ship = self.id.0, "ship entering sinking state");
            }
            self.is_sinking = true;
        }
    }

    pub fn health_fraction(&self) -> f32 {
        let max = self.ship_type.base_health.max(f32::EPSILON);
        (self.hull_health().max(self.ship_type.base_health * (1.0 - self.water_intrusion)) / max).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship::component::{HullSections, SailKind, SailPayload};
    use crate::ship::damage::HullMaterial;
    use crate::ship::ship_type::ShipType;

    fn ship_with_hull() -> ShipInstance {
        let mut ship = ShipInstance::new(ShipId(0), "Test", ShipType::light_sloop(), Vec3::ZERO, Quat::IDENTITY);
        ship.add_component(
            Vec3::ZERO,
            300.0,
            200.0,
            ComponentPayload::Hull {
                sections: HullSections::new(300.0 / 8.0),
                material: HullMaterial::Oak,
                thickness: 1.0,
                base_volume: 150.0,
            },
        );
        ship
    }

    #[test]
    fn mass_includes_component_mass() {
        let ship = ship_with_hull();
        assert!((ship.mass - (1000.0 + 200.0)).abs() < 1e-3);
    }

    #[test]
    fn take_damage_routes_to_closest_component() {
        let mut ship = ship_with_hull();
        ship.add_component(
            Vec3::new(10.0, 0.0, 0.0),
            40.0,
            20.0,
            ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)),
        );
        let (id, applied) = ship.take_damage(Vec3::ZERO, 50.0, DamageKind::Ramming).unwrap();
        assert_eq!(id, ComponentId(0));
        assert!(applied > 0.0);
    }

    #[test]
    fn destroyed_hull_marks_sinking() {
        let mut ship = ship_with_hull();
        ship.take_damage(Vec3::ZERO, 100_000.0, DamageKind::Ramming);
        assert!(ship.is_sinking);
    }

    #[test]
    fn normalize_orientation_recovers_unit_length() {
        let mut ship = ship_with_hull();
        ship.orientation = Quat::from_xyzw(0.1, 0.1, 0.1, 0.1);
        ship.normalize_orientation();
        assert!((ship.orientation.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn water_intrusion_drains_when_zero() {
        let mut ship = ship_with_hull();
        ship.update_components_and_intrusion(1.0 / 60.0, 0.0, 0.5);
        assert_eq!(ship.water_intrusion, 0.0);
    }
}
