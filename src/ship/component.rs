//! Ship components: tagged-variant replacement for the source's abstract
//! base class + concrete subclasses (Design Notes "Inheritance
//! hierarchies"). Common state (position, health, mass, upgrade level,
//! destroyed flag, parent handle) lives in [`Component`]; kind-specific
//! state lives in [`ComponentPayload`].

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::{ComponentId, ShipId};
use crate::ship::damage::{apply_resistance, component_kind_resistance, DamageKind, HullMaterial};

/// Cheap discriminant for dispatch tables and resistance lookups without
/// having to match the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKindTag {
    Hull,
    Sail,
    Cannon,
    Engine,
    Mast,
    Rudder,
    Anchor,
    Cargo,
    Quarters,
    Navigation,
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HullSection {
    Bow,
    Stern,
    Port,
    Starboard,
    Keel,
    Deck,
    Upper,
    Lower,
}

impl HullSection {
    pub const ALL: [HullSection; 8] = [
        HullSection::Bow,
        HullSection::Stern,
        HullSection::Port,
        HullSection::Starboard,
        HullSection::Keel,
        HullSection::Deck,
        HullSection::Upper,
        HullSection::Lower,
    ];

    /// Damage-kind-specific distribution multiplier (spec §4.4 "Hull").
    fn damage_multiplier(self, kind: DamageKind) -> f32 {
        match (kind, self) {
            (DamageKind::Ramming, HullSection::Bow) => 3.0,
            (DamageKind::Ramming, _) => 0.5,
            (DamageKind::Reef, HullSection::Keel) => 4.0,
            (DamageKind::Reef, _) => 0.25,
            (DamageKind::CannonBall, HullSection::Port | HullSection::Starboard) => 2.0,
            (DamageKind::CannonBall, _) => 1.0,
            _ => 1.0,
        }
    }
}

/// Per-section hull hit points (spec §4.4 "8 named sections").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullSections {
    pub hp: [f32; 8],
    pub max_hp: [f32; 8],
}

impl HullSections {
    pub fn new(max_hp_each: f32) -> Self {
        Self {
            hp: [max_hp_each; 8],
            max_hp: [max_hp_each; 8],
        }
    }

    fn index(section: HullSection) -> usize {
        HullSection::ALL.iter().position(|s| *s == section).unwrap()
    }

    pub fn health(&self, section: HullSection) -> f32 {
        self.hp[Self::index(section)]
    }

    pub fn total_health(&self) -> f32 {
        self.hp.iter().sum()
    }

    pub fn total_max_health(&self) -> f32 {
        self.max_hp.iter().sum()
    }

    /// Distributes `magnitude` across all 8 sections per the damage kind's
    /// multiplier table, clamping each section at 0.
    fn distribute(&mut self, magnitude: f32, kind: DamageKind) {
        for (i, section) in HullSection::ALL.iter().enumerate() {
            let share = magnitude * section.damage_multiplier(kind);
            self.hp[i] = (self.hp[i] - share).max(0.0);
        }
    }

    pub fn repair(&mut self, amount: f32) {
        let per_section = amount / HullSection::ALL.len() as f32;
        for i in 0..self.hp.len() {
            self.hp[i] = (self.hp[i] + per_section).min(self.max_hp[i]);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SailKind {
    Square,
    Lateen,
    Jib,
    MagicalSilk,
}

/// Cumulative storm damage, as a fraction of max health, past which a sail
/// is forced to reef regardless of crew input (spec §3 "Storm damage >
/// thresholds forces reef at 0.6"). The spec names no exact number; chosen
/// to match the fraction the rest of this struct already uses for other
/// health-derived thresholds — see DESIGN.md Open Question 5.
const STORM_FORCED_REEF_FRACTION: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SailPayload {
    pub sail_kind: SailKind,
    pub area: f32,
    pub current_deployment: f32,
    pub target_deployment: f32,
    pub deployment_speed: f32,
    pub reefed: bool,
    pub reef_factor: f32,
    pub tear_damage: f32,
    pub optimal_angle: f32,
    /// Cumulative applied damage from `DamageKind::Storm` only, tracked
    /// separately from `health` (which blends every damage kind) so the
    /// forced-reef trigger below responds to storms specifically, not to
    /// cannon fire or ramming that happens to cross the same fraction.
    pub storm_damage: f32,
}

impl SailPayload {
    pub fn new(sail_kind: SailKind, area: f32) -> Self {
        Self {
            sail_kind,
            area,
            current_deployment: 0.0,
            target_deployment: 0.0,
            deployment_speed: 0.5,
            reefed: false,
            reef_factor: 0.0,
            tear_damage: 0.0,
            optimal_angle: std::f32::consts::FRAC_PI_2,
            storm_damage: 0.0,
        }
    }

    pub fn set_target_deployment(&mut self, deployment: f32) {
        self.target_deployment = deployment.clamp(0.0, 1.0);
    }

    fn update(&mut self, dt: f32, wind_speed: f32, max_health: f32) {
        let delta = self.target_deployment - self.current_deployment;
        let step = self.deployment_speed * dt;
        if delta.abs() <= step {
            self.current_deployment = self.target_deployment;
        } else {
            self.current_deployment += step * delta.signum();
        }

        if wind_speed > 25.0 && self.current_deployment > 0.8 && !self.reefed {
            self.tear_damage += (wind_speed - 20.0) * 0.1 * dt;
        }

        if max_health > 0.0 && self.storm_damage / max_health >= STORM_FORCED_REEF_FRACTION {
            self.reefed = true;
            self.reef_factor = self.reef_factor.max(0.6);
        }
    }

    /// Wind-angle effectiveness: peaks at `optimal_angle`, decays
    /// piecewise-linearly to 0.1 past 90 degrees from it. `MagicalSilk`
    /// sails are omnidirectional (always 1.0).
    pub fn angle_efficiency(&self, wind_angle_from_forward: f32) -> f32 {
        if self.sail_kind == SailKind::MagicalSilk {
            return 1.0;
        }
        let offset = (wind_angle_from_forward - self.optimal_angle).abs();
        let offset = offset.min(std::f32::consts::TAU - offset);
        if offset <= std::f32::consts::FRAC_PI_2 {
            1.0 - 0.9 * (offset / std::f32::consts::FRAC_PI_2)
        } else {
            let past = (offset - std::f32::consts::FRAC_PI_2) / std::f32::consts::FRAC_PI_2;
            (0.1 * (1.0 - past)).max(0.1)
        }
    }

    pub fn effective_area(&self, max_health: f32, health: f32) -> f32 {
        let tear_fraction = if max_health > 0.0 { self.tear_damage / max_health } else { 0.0 };
        (self.area
            * self.current_deployment
            * (1.0 - self.reef_factor)
            * (1.0 - tear_fraction.min(1.0)))
        .max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoKind {
    Ball,
    Chain,
    Grape,
    Explosive,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmmoInventory {
    pub ball: u32,
    pub chain: u32,
    pub grape: u32,
    pub explosive: u32,
}

impl AmmoInventory {
    pub fn total(&self) -> u32 {
        self.ball + self.chain + self.grape + self.explosive
    }

    pub fn count(&self, kind: AmmoKind) -> u32 {
        match kind {
            AmmoKind::Ball => self.ball,
            AmmoKind::Chain => self.chain,
            AmmoKind::Grape => self.grape,
            AmmoKind::Explosive => self.explosive,
        }
    }

    fn count_mut(&mut self, kind: AmmoKind) -> &mut u32 {
        match kind {
            AmmoKind::Ball => &mut self.ball,
            AmmoKind::Chain => &mut self.chain,
            AmmoKind::Grape => &mut self.grape,
            AmmoKind::Explosive => &mut self.explosive,
        }
    }

    /// Weighted sum used by the explosion damage formula (spec §4.4).
    fn explosive_weighted_sum(&self) -> f32 {
        self.ball as f32 * 1.0 + self.chain as f32 * 0.8 + self.grape as f32 * 0.6 + self.explosive as f32 * 3.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CannonPayload {
    pub cannon_damage: f32,
    pub required_crew: u32,
    pub assigned_crew: u32,
    pub reload_timer: f32,
    pub base_reload_time: f32,
    pub loaded: bool,
    pub ammo_loaded: Option<AmmoKind>,
    pub ammo_inventory: AmmoInventory,
    pub barrel_wear: f32,
    pub overheat: f32,
    pub misfired: bool,
    pub consecutive_fires: u32,
    pub aim_direction: Vec3,
}

impl CannonPayload {
    pub fn new(cannon_damage: f32, required_crew: u32, base_reload_time: f32) -> Self {
        Self {
            cannon_damage,
            required_crew,
            assigned_crew: required_crew,
            reload_timer: 0.0,
            base_reload_time,
            loaded: false,
            ammo_loaded: None,
            ammo_inventory: AmmoInventory { ball: 0, chain: 0, grape: 0, explosive: 0 },
            barrel_wear: 0.0,
            overheat: 0.0,
            misfired: false,
            consecutive_fires: 0,
            aim_direction: Vec3::Z,
        }
    }

    fn update(&mut self, dt: f32) {
        if self.reload_timer > 0.0 {
            self.reload_timer = (self.reload_timer - dt).max(0.0);
        }
        self.overheat = (self.overheat - 5.0 * dt).max(0.0);
    }

    pub fn load(&mut self, kind: AmmoKind) -> bool {
        if self.ammo_inventory.count(kind) == 0 {
            return false;
        }
        self.loaded = true;
        self.ammo_loaded = Some(kind);
        true
    }

    /// Misfire probability (spec §4.4), capped at 0.2.
    pub fn misfire_probability(&self, max_health: f32, upgrade_level: u32) -> f32 {
        let wear_term = if max_health > 0.0 { (self.barrel_wear / max_health) * 0.1 } else { 0.0 };
        let overheat_term = (self.overheat / 100.0) * 0.05;
        let consecutive_term = self.consecutive_fires as f32 * 0.01;
        let raw = 0.02 + wear_term + overheat_term + consecutive_term;
        (raw.min(0.2)) * (1.0 - upgrade_level as f32 * 0.1).max(0.0)
    }

    /// Returns `true` if the requirements to fire are satisfied, without
    /// mutating state; callers should consult [`CoreError`] semantics for
    /// rejecting the command before calling [`Self::consume_for_fire`].
    ///
    /// [`CoreError`]: crate::error::CoreError
    pub fn can_fire(&self, destroyed: bool, active: bool) -> bool {
        self.loaded
            && !self.misfired
            && self.reload_timer <= 0.0
            && self.assigned_crew >= self.required_crew
            && !destroyed
            && active
    }

    /// Consumes the loaded round and resets the reload timer; returns the
    /// ammo kind fired. Caller is responsible for rolling the misfire and
    /// recording the resulting `consecutive_fires`/`misfired` state.
    pub fn consume_for_fire(&mut self) -> Option<AmmoKind> {
        let kind = self.ammo_loaded.take()?;
        *self.ammo_inventory.count_mut(kind) -= 1;
        self.loaded = false;
        self.reload_timer = self.base_reload_time;
        self.overheat = (self.overheat + 15.0).min(150.0);
        self
            .barrel_wear += 0.5;
        kind.into()
    }

    /// Explosion parameters on destruction with ammunition present
    /// (spec §4.4). Returns `None` if there is no ammo to detonate.
    pub fn explosion(&self, kind_multiplier: f32) -> Option<(f32, f32)> {
        let ammo = self.ammo_inventory.total();
        if ammo == 0 {
            return None;
        }
        let radius = 5.0
            * (1.0 + ammo as f32 / 50.0)
            * (1.0 + 0.5 * self.ammo_inventory.explosive as f32)
            * kind_multiplier;
        let damage = 0.8 * self.cannon_damage * (1.0 + ammo as f32 / 30.0)
            + self.ammo_inventory.explosive_weighted_sum();
        Some((radius, damage))
    }
}

impl From<AmmoKind> for Option<AmmoKind> {
    fn from(value: AmmoKind) -> Self {
        Some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnginePayload {
    pub running: bool,
    pub thrust_force: f32,
    pub power: f32,
    pub fuel: f32,
    pub fuel_consumption_rate: f32,
}

impl EnginePayload {
    pub fn new(thrust_force: f32, power: f32, fuel: f32, fuel_consumption_rate: f32) -> Self {
        Self { running: false, thrust_force, power, fuel, fuel_consumption_rate }
    }

    fn update(&mut self, dt: f32) {
        if self.running {
            self.fuel = (self.fuel - self.fuel_consumption_rate * dt).max(0.0);
            if self.fuel <= 0.0 {
                self.running = false;
            }
        }
    }

    pub fn start(&mut self) -> bool {
        if self.fuel > 0.0 {
            self.running = true;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RudderPayload {
    pub max_angle: f32,
    pub target_angle: f32,
    pub current_angle: f32,
    pub response_rate: f32,
    pub stall_angle_fraction: f32,
    pub area: f32,
    pub efficiency: f32,
    pub fouling: f32,
    pub wear: f32,
    pub jammed: bool,
}

impl RudderPayload {
    pub fn new(max_angle: f32, response_rate: f32, area: f32) -> Self {
        Self {
            max_angle,
            target_angle: 0.0,
            current_angle: 0.0,
            response_rate,
            stall_angle_fraction: 0.8,
            area,
            efficiency: 1.0,
            fouling: 0.0,
            wear: 0.0,
            jammed: false,
        }
    }

    pub fn set_target_angle(&mut self, angle: f32) {
        self.target_angle = angle.clamp(-self.max_angle, self.max_angle);
    }

    fn update(&mut self, dt: f32, structural_damage_fraction: f32, rng_roll: f32) {
        if !self.jammed {
            let delta = self.target_angle - self.current_angle;
            let step = self.response_rate * dt;
            if delta.abs() <= step {
                self.current_angle = self.target_angle;
            } else {
                self.current_angle += step * delta.signum();
            }
        }

        self.efficiency = (1.0 - self.fouling * 0.5 - self.wear * 0.5).clamp(0.0, 1.0);

        let jam_risk = structural_damage_fraction > 0.8 || self.wear > 0.9;
        if jam_risk && rng_roll < 0.01 * dt {
            self.jammed = true;
        }
    }

    /// Turning force magnitude = f(speed^2, |angle|, area, efficiency) with
    /// stall reduction past `stall_angle_fraction * max_angle`.
    pub fn turning_force(&self, ship_speed: f32) -> f32 {
        let stall_angle = self.max_angle * self.stall_angle_fraction;
        let angle_mag = self.current_angle.abs();
        let effective_angle = if angle_mag > stall_angle {
            stall_angle + (angle_mag - stall_angle) * 0.2
        } else {
            angle_mag
        };
        ship_speed * ship_speed * effective_angle * self.area * self.efficiency * 0.1
    }

    pub fn drag(&self, ship_speed: f32) -> f32 {
        ship_speed * ship_speed * self.current_angle.abs() * 0.02
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MastPayload {
    pub sail_slots: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPayload {
    pub deployed: bool,
    pub holding_force: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoPayload {
    pub capacity: f32,
    pub current_load: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuartersPayload {
    pub crew_capacity: u32,
    pub current_crew: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationPayload {
    pub accuracy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationPayload;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentPayload {
    Hull { sections: HullSections, material: HullMaterial, thickness: f32, base_volume: f32 },
    Sail(SailPayload),
    Cannon(CannonPayload),
    Engine(EnginePayload),
    Mast(MastPayload),
    Rudder(RudderPayload),
    Anchor(AnchorPayload),
    Cargo(CargoPayload),
    Quarters(QuartersPayload),
    Navigation(NavigationPayload),
    Decoration(DecorationPayload),
}

impl ComponentPayload {
    pub fn tag(&self) -> ComponentKindTag {
        match self {
            ComponentPayload::Hull { .. } => ComponentKindTag::Hull,
            ComponentPayload::Sail(_) => ComponentKindTag::Sail,
            ComponentPayload::Cannon(_) => ComponentKindTag::Cannon,
            ComponentPayload::Engine(_) => ComponentKindTag::Engine,
            ComponentPayload::Mast(_) => ComponentKindTag::Mast,
            ComponentPayload::Rudder(_) => ComponentKindTag::Rudder,
            ComponentPayload::Anchor(_) => ComponentKindTag::Anchor,
            ComponentPayload::Cargo(_) => ComponentKindTag::Cargo,
            ComponentPayload::Quarters(_) => ComponentKindTag::Quarters,
            ComponentPayload::Navigation(_) => ComponentKindTag::Navigation,
            ComponentPayload::Decoration(_) => ComponentKindTag::Decoration,
        }
    }
}

/// A positioned ship part (spec §3 "Ship Component"). Holds a stable
/// back-reference to its owning ship by id, never by pointer (Design
/// Notes "Parent back-references" / "Cyclic references").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub ship: ShipId,
    pub local_position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub mass: f32,
    pub upgrade_level: u32,
    pub active: bool,
    pub destroyed: bool,
    pub payload: ComponentPayload,
}

impl Component {
    pub fn new(
        id: ComponentId,
        ship: ShipId,
        local_position: Vec3,
        max_health: f32,
        mass: f32,
        payload: ComponentPayload,
    ) -> Self {
        Self {
            id,
            ship,
            local_position,
            health: max_health,
            max_health,
            mass,
            upgrade_level: 0,
            active: true,
            destroyed: false,
            payload,
        }
    }

    pub fn kind_tag(&self) -> ComponentKindTag {
        self.payload.tag()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Combined multiplier of health fraction, wear, crew, and
    /// environmental modifiers (spec glossary "Effectiveness").
    pub fn effectiveness(&self) -> f32 {
        if self.destroyed || !self.active {
            return 0.0;
        }
        let base = self.health_fraction();
        match &self.payload {
            ComponentPayload::Cannon(c) => {
                let crew_fraction = if c.required_crew > 0 {
                    (c.assigned_crew as f32 / c.required_crew as f32).min(1.0)
                } else {
                    1.0
                };
                base * crew_fraction
            }
            ComponentPayload::Rudder(r) => base * r.efficiency,
            _ => base,
        }
    }

    /// Advances kind-specific timers (spec §4.4 "Common lifecycle").
    pub fn update(&mut self, dt: f32, wind_speed: f32, ship_speed: f32, rng_roll: f32) {
        if self.destroyed {
            return;
        }
        let structural_damage_fraction = 1.0 - self.health_fraction();
        match &mut self.payload {
            ComponentPayload::Sail(s) => s.update(dt, wind_speed, self.max_health),
            ComponentPayload::Cannon(c) => c.update(dt),
            ComponentPayload::Engine(e) => e.update(dt),
            ComponentPayload::Rudder(r) => r.update(dt, structural_damage_fraction, rng_roll),
            _ => {}
        }
        let _ = ship_speed;
    }

    /// Subtracts `magnitude` from health after resistance (spec §4.4
    /// "Common lifecycle"). For `Hull`, distributes across sections
    /// instead of a single scalar. Returns the actual applied magnitude.
    pub fn take_damage(&mut self, magnitude: f32, kind: DamageKind) -> f32 {
        if self.destroyed || magnitude <= 0.0 {
            return 0.0;
        }
        let resistance = match &self.payload {
            ComponentPayload::Hull { material, .. } => material.resistance(kind),
            _ => component_kind_resistance(self.kind_tag(), kind),
        };
        let applied = apply_resistance(magnitude, resistance);

        if let ComponentPayload::Hull { sections, .. } = &mut self.payload {
            sections.distribute(applied, kind);
            self.health = sections.total_health();
        } else {
            self.health = (self.health - applied).max(0.0);
        }

        match kind {
            DamageKind::Fire => {
                if let ComponentPayload::Sail(s) = &mut self.payload {
                    s.tear_damage *= 2.0;
                }
            }
            DamageKind::Storm => {
                if let ComponentPayload::Sail(s) = &mut self.payload {
                    s.storm_damage += applied;
                }
            }
            _ => {}
        }

        if self.health <= 0.0 {
            self.on_destroyed();
        }
        applied
    }

    pub fn repair(&mut self, amount: f32) {
        if self.destroyed || amount <= 0.0 {
            return;
        }
        if let ComponentPayload::Hull { sections, .. } = &mut self.payload {
            sections.repair(amount);
            self.health = sections.total_health();
        } else {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    pub fn upgrade(&mut self) {
        self.upgrade_level += 1;
        match &mut self.payload {
            ComponentPayload::Cannon(c) => c.barrel_wear = (c.barrel_wear - 5.0).max(0.0),
            ComponentPayload::Rudder(r) => r.wear = (r.wear - 0.05).max(0.0),
            ComponentPayload::Sail(s) => s.deployment_speed *= 1.1,
            _ => {}
        }
    }

    fn on_destroyed(&mut self) {
        self.destroyed = true;
        self.active = false;
        if let ComponentPayload::Hull { .. } = &self.payload {
            // Hull destruction is routed to the sinking state by the
            // owning ShipInstance (spec §3 "Lifecycle").
        }
    }

    /// Contribution to hull volume (spec §4.4 "Hull"). Zero for all other
    /// kinds.
    pub fn hull_volume(&self) -> f32 {
        match &self.payload {
            ComponentPayload::Hull { material, thickness, base_volume, .. } => {
                base_volume * thickness * material.buoyancy_factor()
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hull_component() -> Component {
        Component::new(
            ComponentId(0),
            ShipId(0),
            Vec3::ZERO,
            400.0,
            500.0,
            ComponentPayload::Hull {
                sections: HullSections::new(50.0),
                material: HullMaterial::Oak,
                thickness: 1.0,
                base_volume: 200.0,
            },
        )
    }

    #[test]
    fn ramming_concentrates_on_bow() {
        let mut hull = hull_component();
        hull.take_damage(10.0, DamageKind::Ramming);
        if let ComponentPayload::Hull { sections, .. } = &hull.payload {
            assert!(sections.health(HullSection::Bow) < sections.health(HullSection::Stern));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn hull_section_health_never_exceeds_max() {
        let mut hull = hull_component();
        hull.repair(10_000.0);
        if let ComponentPayload::Hull { sections, .. } = &hull.payload {
            assert!(sections.total_health() <= sections.total_max_health() + 1e-3);
        }
    }

    #[test]
    fn destroyed_hull_sets_flag() {
        let mut hull = hull_component();
        hull.take_damage(100_000.0, DamageKind::Ramming);
        assert!(hull.destroyed);
        assert_eq!(hull.health, 0.0);
    }

    #[test]
    fn cannon_misfire_probability_bounds_at_full_wear() {
        let mut cannon = CannonPayload::new(40.0, 4, 2.0);
        cannon.barrel_wear = 400.0;
        let p = cannon.misfire_probability(400.0, 0);
        assert!(p >= 0.12 && p <= 0.20);
    }

    #[test]
    fn cannon_damage_alone_does_not_force_reef() {
        let mut sail = Component::new(
            ComponentId(1),
            ShipId(0),
            Vec3::ZERO,
            100.0,
            20.0,
            ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)),
        );
        // Enough cannon-kind damage to drop well under the old 40% health
        // threshold, but zero of it is Storm damage.
        sail.take_damage(60.0, DamageKind::CannonBall);
        sail.update(1.0 / 60.0, 10.0, 0.0, 0.0);
        if let ComponentPayload::Sail(s) = &sail.payload {
            assert!(!s.reefed, "cannon damage alone should not force a reef");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn accumulated_storm_damage_forces_reef() {
        let mut sail = Component::new(
            ComponentId(1),
            ShipId(0),
            Vec3::ZERO,
            100.0,
            20.0,
            ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)),
        );
        sail.take_damage(45.0, DamageKind::Storm);
        sail.update(1.0 / 60.0, 10.0, 0.0, 0.0);
        if let ComponentPayload::Sail(s) = &sail.payload {
            assert!(s.reefed, "sail should force-reef once storm damage crosses the threshold");
            assert!((s.reef_factor - 0.6).abs() < 1e-6);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn fire_damage_doubles_sail_tear() {
        let mut sail = Component::new(
            ComponentId(1),
            ShipId(0),
            Vec3::ZERO,
            100.0,
            20.0,
            ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)),
        );
        if let ComponentPayload::Sail(s) = &mut sail.payload {
            s.tear_damage = 5.0;
        }
        sail.take_damage(1.0, DamageKind::Fire);
        if let ComponentPayload::Sail(s) = &sail.payload {
            assert!((s.tear_damage - 10.0).abs() < 1e-6);
        }
    }
}
