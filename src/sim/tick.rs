//! The fixed nine-step tick sequence (spec §5): advance time, advance
//! wave field, advance environment, gather inputs, integrate each ship,
//! broad phase, narrow phase + response, prune, publish snapshot.

use bevy_math::Vec3;
use tracing::{info, warn};

use crate::collision::{self, narrow_phase, response};
use crate::error::CoreError;
use crate::ids::{Body, ComponentId, ShipId};
use crate::ship::component::{AmmoInventory, ComponentPayload};
use crate::ship::damage::DamageKind;
use crate::sim::commands::{EnvironmentCommand, ShipCommand, TickInputs};
use crate::sim::context::SimulationContext;
use crate::sim::snapshot::{
    CommandRejectionReason, ComponentSnapshot, ComponentStateSnapshot, ShipSnapshot, SimEvent, Snapshot,
};

/// Probability a destroyed cannon with live ammunition explodes
/// (spec §4.4: "On destruction with ammunition present, 40% chance of
/// explosion").
const CANNON_EXPLOSION_PROBABILITY: f32 = 0.4;
/// Explosion-kind radius multiplier for a plain cannon blast (no special
/// kind coupling beyond the ammunition-driven formula).
const EXPLOSION_KIND_MULTIPLIER: f32 = 1.0;

/// Runs one fixed-Δt simulation step and returns the resulting snapshot.
/// Pure function of `(ctx, inputs, dt)` aside from the in-place mutation
/// of `ctx` itself (spec §5 "Determinism").
pub fn tick(ctx: &mut SimulationContext, dt: f32, inputs: TickInputs) -> Snapshot {
    let mut events = Vec::new();

    // 1. Advance time.
    ctx.time += dt;

    // Environmental overrides are applied before their subsystem's
    // advance step (spec §4.1/§4.2; see `DESIGN.md` for why this
    // ordering was chosen over the alternative reading of §5).
    for cmd in &inputs.environment_commands {
        match *cmd {
            EnvironmentCommand::SetWind { direction, speed } => {
                ctx.waves.set_wind(direction, speed);
                ctx.ocean.set_wind(direction, speed);
            }
            EnvironmentCommand::InjectDisturbance { origin, intensity, radius } => {
                ctx.waves.inject_disturbance(origin, intensity, radius);
            }
        }
    }

    // 2. Advance wave field.
    ctx.waves.advance(dt, ctx.config.gravity);
    // 3. Advance environment (wind/current relaxation).
    ctx.ocean.advance(dt);

    // 4. Apply per-ship commands.
    for (ship_id, command) in &inputs.ship_commands {
        if let Err(err) = apply_ship_command(ctx, *ship_id, *command) {
            warn!(ship = ship_id.0, error = %err, "command rejected");
            events.push(SimEvent::CommandRejected { ship: *ship_id, reason: CommandRejectionReason::from(&err) });
        }
    }

    // 5. Integrate each ship. Rudder-jam rolls are drawn up front, one per
    // ship, before any mutable borrow of the registry is taken.
    let ship_ids: Vec<ShipId> = ctx.ships.ids().collect();
    let rolls: Vec<f32> = ship_ids.iter().map(|_| ctx.roll()).collect();
    let wind_speed = ctx.ocean.wind_speed();
    for (id, roll) in ship_ids.iter().zip(rolls) {
        if let Some(ship) = ctx.ships.get_mut(*id) {
            if !ship.is_sinking {
                ship.update_components_and_intrusion(dt, wind_speed, roll);
            }
        }
    }

    resolve_destruction_chains(ctx, &mut events);

    let config = ctx.config;
    for (_, ship) in ctx.ships.iter_mut() {
        crate::dynamics::integrate_ship(ship, &ctx.waves, &ctx.ocean, &config, dt);
    }

    // 6. Broad-phase pairs.
    let pairs = collision::find_candidate_pairs(&ctx.ships, &ctx.entities);

    // 7. Narrow-phase + response.
    for (a, b) in pairs {
        resolve_pair(ctx, a, b, &mut events);
    }
    resolve_terrain_contacts(ctx, &mut events);

    // 8. Prune destroyed bodies.
    ctx.prune_dead_entities();
    for id in ctx.ships.prune_sunk() {
        events.push(SimEvent::ShipSunk { target: id });
    }

    // 9. Publish snapshot.
    publish_snapshot(ctx, events)
}

fn resolve_pair(ctx: &mut SimulationContext, a: Body, b: Body, events: &mut Vec<SimEvent>) {
    match (a, b) {
        (Body::Ship(sa), Body::Ship(sb)) => {
            let restitution = ctx.config.collision_restitution_ship;
            if let Some((ship_a, ship_b)) = ctx.ships.get_pair_mut(sa, sb) {
                if let Some(contact) = narrow_phase::ship_ship_contact(ship_a, ship_b) {
                    if let Some(event) = response::resolve_ship_ship(ship_a, ship_b, contact, restitution) {
                        events.push(SimEvent::Collision { a: event.a, b: event.b, point: event.point, energy: event.energy, kind: event.kind });
                    }
                }
            }
        }
        (Body::Entity(ea), Body::Entity(eb)) => {
            let restitution = ctx.config.collision_restitution_entity;
            let Some(ia) = ctx.entities.iter().position(|e| e.id == ea) else { return };
            let Some(ib) = ctx.entities.iter().position(|e| e.id == eb) else { return };
            if ia == ib {
                return;
            }
            let (lo, hi) = if ia < ib { (ia, ib) } else { (ib, ia) };
            let (left, right) = ctx.entities.split_at_mut(hi);
            let entity_a = &mut left[lo];
            let entity_b = &mut right[0];
            if let Some(contact) = narrow_phase::entity_entity_contact(entity_a, entity_b) {
                if let Some(event) = response::resolve_entity_entity(entity_a, entity_b, contact, restitution) {
                    events.push(SimEvent::Collision { a: event.a, b: event.b, point: event.point, energy: event.energy, kind: event.kind });
                    if !entity_a.alive {
                        events.push(SimEvent::EntityDestroyed { entity: entity_a.id });
                    }
                    if !entity_b.alive {
                        events.push(SimEvent::EntityDestroyed { entity: entity_b.id });
                    }
                }
            }
        }
        (Body::Ship(sid), Body::Entity(eid)) | (Body::Entity(eid), Body::Ship(sid)) => {
            let restitution = ctx.config.collision_restitution_entity;
            let Some(entity_index) = ctx.entities.iter().position(|e| e.id == eid) else { return };
            if let Some(ship) = ctx.ships.get_mut(sid) {
                let entity = &mut ctx.entities[entity_index];
                if let Some(contact) = narrow_phase::ship_entity_contact(ship, entity) {
                    if let Some(event) = response::resolve_ship_entity(ship, entity, contact, restitution) {
                        events.push(SimEvent::Collision { a: event.a, b: event.b, point: event.point, energy: event.energy, kind: event.kind });
                        if !entity.alive {
                            events.push(SimEvent::EntityDestroyed { entity: entity.id });
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn resolve_terrain_contacts(ctx: &mut SimulationContext, events: &mut Vec<SimEvent>) {
    let ship_ids: Vec<ShipId> = ctx.ships.ids().collect();
    for id in ship_ids {
        let Some(ship) = ctx.ships.get_mut(id) else { continue };
        let sample = ctx.terrain.sample_world(ship.position.x, ship.position.z);
        if let Some(contact) = narrow_phase::ship_terrain_contact(ship, sample) {
            let event = response::resolve_ship_terrain(ship, sample, contact);
            events.push(SimEvent::Collision { a: event.a, b: event.b, point: event.point, energy: event.energy, kind: event.kind });
        }
    }
}

/// Resolves destroyed, ammunition-bearing cannons into explosions (spec
/// §4.4, scenario S6): each eligible cannon rolls independently, and a
/// detonation can destroy neighboring components that are themselves
/// armed cannons, so the scan repeats until a pass produces no further
/// explosions.
fn resolve_destruction_chains(ctx: &mut SimulationContext, events: &mut Vec<SimEvent>) {
    let ship_ids: Vec<ShipId> = ctx.ships.ids().collect();
    for id in ship_ids {
        loop {
            let pending: Vec<ComponentId> = {
                let Some(ship) = ctx.ships.get(id) else { break };
                ship.components()
                    .iter()
                    .filter(|c| c.destroyed)
                    .filter_map(|c| match &c.payload {
                        ComponentPayload::Cannon(cannon) if cannon.ammo_inventory.total() > 0 => Some(c.id),
                        _ => None,
                    })
                    .collect()
            };
            if pending.is_empty() {
                break;
            }

            let mut exploded_any = false;
            for component_id in pending {
                let roll = ctx.roll();
                let Some(ship) = ctx.ships.get_mut(id) else { continue };
                let Some(component) = ship.component_mut(component_id) else { continue };

                if roll >= CANNON_EXPLOSION_PROBABILITY {
                    clear_ammo(component);
                    continue;
                }

                let (local_position, explosion) = match &component.payload {
                    ComponentPayload::Cannon(cannon) => (component.local_position, cannon.explosion(EXPLOSION_KIND_MULTIPLIER)),
                    _ => (Vec3::ZERO, None),
                };
                clear_ammo(component);
                let Some((radius, damage)) = explosion else { continue };

                events.push(SimEvent::Destruction { target: id, component: component_id, position: local_position });
                collision::apply_explosion(ship, local_position, radius, damage, DamageKind::Explosion);
                info!(ship = id.0, component = component_id.0, "cannon explosion chain resolved");
                exploded_any = true;
            }

            if !exploded_any {
                break;
            }
        }
    }
}

fn clear_ammo(component: &mut crate::ship::Component) {
    if let ComponentPayload::Cannon(cannon) = &mut component.payload {
        cannon.ammo_inventory = AmmoInventory { ball: 0, chain: 0, grape: 0, explosive: 0 };
    }
}

fn apply_ship_command(ctx: &mut SimulationContext, ship_id: ShipId, command: ShipCommand) -> Result<(), CoreError> {
    // FireCannon and ApplyExternalForce are handled up front: the former
    // needs a roll drawn before any ship borrow is taken, the latter
    // targets the whole ship rather than one of its components.
    match command {
        ShipCommand::FireCannon { component } => return fire_cannon(ctx, ship_id, component),
        ShipCommand::ApplyExternalForce { force } => {
            let ship = ctx.ships.get_mut(ship_id).ok_or(CoreError::UnknownShip(ship_id))?;
            ship.external_force += force;
            return Ok(());
        }
        _ => {}
    }

    let ship = ctx.ships.get_mut(ship_id).ok_or(CoreError::UnknownShip(ship_id))?;
    match command {
        ShipCommand::SetRudder { component, angle } => {
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Rudder(r) => {
                    r.set_target_angle(angle);
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::SetSail { component, deployment } => {
            if !(0.0..=1.0).contains(&deployment) {
                return Err(CoreError::OutOfRange(format!("sail deployment {deployment} outside [0,1]")));
            }
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Sail(s) => {
                    s.set_target_deployment(deployment);
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::LoadCannon { component, ammo } => {
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Cannon(cannon) => {
                    cannon.load(ammo);
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::AimCannon { component, target } => {
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Cannon(cannon) => {
                    cannon.aim_direction = target.normalize_or_zero();
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::StartEngine { component } => {
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Engine(e) => {
                    e.start();
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::StopEngine { component } => {
            let c = require_component(ship, component, ship_id)?;
            match &mut c.payload {
                ComponentPayload::Engine(e) => {
                    e.stop();
                    Ok(())
                }
                _ => Err(CoreError::WrongComponentKind(component, ship_id)),
            }
        }
        ShipCommand::FireCannon { .. } | ShipCommand::ApplyExternalForce { .. } => unreachable!("handled above"),
    }
}

fn require_component<'a>(
    ship: &'a mut crate::ship::ShipInstance,
    component: ComponentId,
    ship_id: ShipId,
) -> Result<&'a mut crate::ship::Component, CoreError> {
    let c = ship.component_mut(component).ok_or(CoreError::UnknownComponent(component, ship_id))?;
    if c.destroyed {
        return Err(CoreError::ComponentDestroyed(component, ship_id));
    }
    Ok(c)
}

fn fire_cannon(ctx: &mut SimulationContext, ship_id: ShipId, component: ComponentId) -> Result<(), CoreError> {
    let roll = ctx.roll();
    let ship = ctx.ships.get_mut(ship_id).ok_or(CoreError::UnknownShip(ship_id))?;
    let c = require_component(ship, component, ship_id)?;
    let ComponentPayload::Cannon(cannon) = &mut c.payload else {
        return Err(CoreError::WrongComponentKind(component, ship_id));
    };
    if !cannon.can_fire(c.destroyed, c.active) {
        return Err(CoreError::OutOfRange("cannon cannot fire: not loaded, reloading, or undercrewed".into()));
    }
    let misfire_probability = cannon.misfire_probability(c.max_health, c.upgrade_level);
    let Some(_ammo) = cannon.consume_for_fire() else {
        return Err(CoreError::OutOfRange("no ammunition loaded".into()));
    };
    if roll < misfire_probability {
        cannon.misfired = true;
        cannon.consecutive_fires = 0;
    } else {
        cannon.consecutive_fires += 1;
    }
    Ok(())
}

fn publish_snapshot(ctx: &SimulationContext, events: Vec<SimEvent>) -> Snapshot {
    let ships = ctx
        .ships
        .iter()
        .map(|(_, ship)| ShipSnapshot {
            id: ship.id,
            name: ship.name.clone(),
            position: ship.position,
            orientation: ship.orientation,
            linear_velocity: ship.linear_velocity,
            angular_velocity: ship.angular_velocity,
            health_fraction: ship.health_fraction(),
            water_intrusion: ship.water_intrusion,
            is_sinking: ship.is_sinking,
            components: ship.components().iter().map(component_snapshot).collect(),
        })
        .collect();

    Snapshot { time: ctx.time, ships, events }
}

fn component_snapshot(c: &crate::ship::Component) -> ComponentSnapshot {
    let state = match &c.payload {
        ComponentPayload::Hull { .. } => ComponentStateSnapshot::Hull,
        ComponentPayload::Sail(s) => {
            ComponentStateSnapshot::Sail { deployment: s.current_deployment, reefed: s.reefed, tear_damage: s.tear_damage }
        }
        ComponentPayload::Cannon(cannon) => ComponentStateSnapshot::Cannon {
            reload_timer: cannon.reload_timer,
            loaded: cannon.loaded,
            misfired: cannon.misfired,
            ammo_total: cannon.ammo_inventory.total(),
        },
        ComponentPayload::Engine(e) => ComponentStateSnapshot::Engine { running: e.running, fuel: e.fuel },
        ComponentPayload::Mast(_) => ComponentStateSnapshot::Mast,
        ComponentPayload::Rudder(r) => ComponentStateSnapshot::Rudder { angle: r.current_angle, jammed: r.jammed },
        ComponentPayload::Anchor(a) => ComponentStateSnapshot::Anchor { deployed: a.deployed },
        ComponentPayload::Cargo(cargo) => {
            ComponentStateSnapshot::Cargo { current_load: cargo.current_load, capacity: cargo.capacity }
        }
        ComponentPayload::Quarters(q) => {
            ComponentStateSnapshot::Quarters { current_crew: q.current_crew, crew_capacity: q.crew_capacity }
        }
        ComponentPayload::Navigation(_) => ComponentStateSnapshot::Navigation,
        ComponentPayload::Decoration(_) => ComponentStateSnapshot::Decoration,
    };

    ComponentSnapshot {
        id: c.id,
        kind: c.kind_tag(),
        health: c.health,
        max_health: c.max_health,
        effectiveness: c.effectiveness(),
        destroyed: c.destroyed,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::{Quat, Vec2};

    use crate::config::SimConfig;
    use crate::ship::component::{HullSections, SailKind, SailPayload};
    use crate::ship::damage::HullMaterial;
    use crate::ship::ShipType;
    use crate::terrain::FlatTerrain;

    fn context_with_ship() -> (SimulationContext, ShipId) {
        let mut ctx = SimulationContext::new(SimConfig::default(), Box::new(FlatTerrain::open_water(0.0)), 7);
        let id = ctx.ships.spawn("Test", ShipType::light_sloop(), Vec3::new(0.0, ctx.config.sea_level - 1.0, 0.0), Quat::IDENTITY);
        let ship = ctx.ships.get_mut(id).unwrap();
        ship.add_component(
            Vec3::ZERO,
            300.0,
            0.0,
            ComponentPayload::Hull {
                sections: HullSections::new(300.0 / 8.0),
                material: HullMaterial::Oak,
                thickness: 1.0,
                base_volume: 150.0,
            },
        );
        (ctx, id)
    }

    #[test]
    fn tick_advances_time_and_produces_a_snapshot_per_ship() {
        let (mut ctx, _id) = context_with_ship();
        let snapshot = tick(&mut ctx, 1.0 / 60.0, TickInputs::new());
        assert!((snapshot.time - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(snapshot.ships.len(), 1);
    }

    #[test]
    fn unknown_ship_command_is_rejected_not_panicking() {
        let (mut ctx, _id) = context_with_ship();
        let inputs = TickInputs::new().with_ship_command(ShipId(9999), ShipCommand::StartEngine { component: ComponentId(0) });
        let snapshot = tick(&mut ctx, 1.0 / 60.0, inputs);
        assert!(matches!(snapshot.events.as_slice(), [SimEvent::CommandRejected { .. }]));
    }

    #[test]
    fn set_sail_converges_to_target_deployment_over_ticks() {
        let (mut ctx, id) = context_with_ship();
        let sail_id = {
            let ship = ctx.ships.get_mut(id).unwrap();
            ship.add_component(Vec3::ZERO, 100.0, 20.0, ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)))
        };
        let inputs = TickInputs::new().with_ship_command(id, ShipCommand::SetSail { component: sail_id, deployment: 1.0 });
        tick(&mut ctx, 1.0 / 60.0, inputs);
        for _ in 0..200 {
            tick(&mut ctx, 1.0 / 60.0, TickInputs::new());
        }
        let ship = ctx.ships.get(id).unwrap();
        if let ComponentPayload::Sail(s) = &ship.component(sail_id).unwrap().payload {
            assert!((s.current_deployment - 1.0).abs() < 1e-3);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn set_wind_propagates_to_both_wave_field_and_ocean() {
        let (mut ctx, _id) = context_with_ship();
        let inputs = TickInputs::new().with_environment_command(EnvironmentCommand::SetWind { direction: Vec2::new(0.0, 1.0), speed: 12.0 });
        tick(&mut ctx, 1.0 / 60.0, inputs);
        assert!((ctx.ocean.wind_speed() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn load_and_fire_cannon_consumes_ammunition() {
        let (mut ctx, id) = context_with_ship();
        let cannon_id = {
            let ship = ctx.ships.get_mut(id).unwrap();
            let cid = ship.add_component(Vec3::ZERO, 100.0, 50.0, ComponentPayload::Cannon(crate::ship::component::CannonPayload::new(40.0, 4, 2.0)));
            if let ComponentPayload::Cannon(cannon) = &mut ship.component_mut(cid).unwrap().payload {
                cannon.ammo_inventory.ball = 2;
            }
            cid
        };
        let inputs = TickInputs::new()
            .with_ship_command(id, ShipCommand::LoadCannon { component: cannon_id, ammo: crate::ship::component::AmmoKind::Ball })
            .with_ship_command(id, ShipCommand::FireCannon { component: cannon_id });
        tick(&mut ctx, 1.0 / 60.0, inputs);
        let ship = ctx.ships.get(id).unwrap();
        if let ComponentPayload::Cannon(cannon) = &ship.component(cannon_id).unwrap().payload {
            assert_eq!(cannon.ammo_inventory.ball, 1);
            assert!(!cannon.loaded);
        } else {
            unreachable!();
        }
    }
}
