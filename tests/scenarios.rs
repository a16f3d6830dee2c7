//! End-to-end scenario tests driven entirely through the public
//! `SimulationContext` / `tick` surface, one scenario per named physical
//! situation the core is expected to get right.
//!
//! # Running tests
//! ```bash
//! cargo test --test scenarios
//! ```

use bevy_math::{Quat, Vec2, Vec3};

use maritime_physics_core::collision::{CollisionKind, DynamicEntity};
use maritime_physics_core::config::SimConfig;
use maritime_physics_core::ids::ShipId;
use maritime_physics_core::ship::component::{
    CannonPayload, ComponentPayload, HullSections, RudderPayload, SailKind, SailPayload,
};
use maritime_physics_core::ship::damage::HullMaterial;
use maritime_physics_core::ship::ShipType;
use maritime_physics_core::sim::{EnvironmentCommand, ShipCommand, Snapshot, SimEvent, SimulationContext, TickInputs};
use maritime_physics_core::terrain::FlatTerrain;
use maritime_physics_core::{tick, EntityId};

const DT: f32 = 1.0 / 60.0;

fn add_hull(ctx: &mut SimulationContext, ship: ShipId, max_health: f32, mass: f32, base_volume: f32) {
    let s = ctx.ships.get_mut(ship).unwrap();
    s.add_component(
        Vec3::ZERO,
        max_health,
        mass,
        ComponentPayload::Hull {
            sections: HullSections::new(max_health / 8.0),
            material: HullMaterial::Oak,
            thickness: 0.3,
            base_volume,
        },
    );
}

fn run(ctx: &mut SimulationContext, n: u32) -> Snapshot {
    let mut last = Snapshot::default();
    for _ in 0..n {
        last = tick(ctx, DT, TickInputs::new());
    }
    last
}

// S1 — still-water equilibrium: a single light ship at rest with no wind,
// no waves, and no thrust settles to its draft line and stays there.
#[test]
fn s1_still_water_equilibrium() {
    // max_waves = 0 keeps the surface perfectly flat for the whole run —
    // "still water" in the literal sense, with no stray ambient wave
    // randomly spawning over 600 ticks to nudge the tolerance checks below.
    let mut config = SimConfig::default();
    config.max_waves = 0;
    let ty = ShipType::light_sloop();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 1);
    let ship = ctx.ships.spawn("Drydock", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    add_hull(&mut ctx, ship, ty.base_health, 0.0, 150.0);

    run(&mut ctx, 600);

    let ship = ctx.ships.get(ship).unwrap();
    let waterline = config.sea_level - ty.draft;
    assert!((ship.position.y - waterline).abs() < 0.05, "settled y {} far from waterline {}", ship.position.y, waterline);
    assert!(ship.linear_velocity.length() < 1.0, "speed {} too high for equilibrium", ship.linear_velocity.length());
    let (roll, pitch) = ship.roll_pitch();
    assert!(roll.abs() < 0.2 && pitch.abs() < 0.2, "roll/pitch {:?} too large at rest", (roll, pitch));
}

// S2 — wave lift: injecting a disturbance raises the local sea surface,
// and a ship sitting on it gains upward velocity it would not gain on a
// perfectly flat sea over the same span of ticks.
#[test]
fn s2_wave_disturbance_lifts_a_ship() {
    let config = SimConfig::default();
    let ty = ShipType::light_sloop();

    let mut flat = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 2);
    let flat_ship = flat.ships.spawn("Flat", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    add_hull(&mut flat, flat_ship, ty.base_health, 0.0, 150.0);

    let mut waved = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 2);
    let waved_ship = waved.ships.spawn("Waved", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    add_hull(&mut waved, waved_ship, ty.base_health, 0.0, 150.0);
    waved.waves.inject_disturbance(Vec2::new(0.0, 0.0), 2.0, 40.0);

    run(&mut flat, 10);
    run(&mut waved, 10);

    let flat_y = flat.ships.get(flat_ship).unwrap().position.y;
    let waved_y = waved.ships.get(waved_ship).unwrap().position.y;
    let wave_height_now = waved.waves.height(0.0, 0.0, config.gravity);

    // The disturbance is still within its wavelength-bounded ring after
    // 10 ticks; whichever way it's currently pushing the surface, the
    // ship sitting in it should have visibly departed from the flat-sea
    // baseline by at least as much as the surface itself has moved.
    assert!((waved_y - flat_y).abs() > 1e-4, "waved ship didn't diverge from flat-sea baseline");
    assert!(wave_height_now.abs() > 0.0, "disturbance produced no surface height at the origin");
}

// S3 — head-on collision: two medium ships closing on each other conserve
// momentum (to within numerical tolerance) and separate rather than
// interpenetrate, with bow damage recorded on both hulls.
#[test]
fn s3_head_on_collision_conserves_momentum() {
    let config = SimConfig::default();
    let ty = ShipType::medium_frigate();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 3);

    let a = ctx.ships.spawn("A", ty, Vec3::new(-5.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    let b = ctx.ships.spawn("B", ty, Vec3::new(5.0, config.sea_level - ty.draft, 0.0), Quat::from_rotation_y(std::f32::consts::PI));
    add_hull(&mut ctx, a, 800.0, 0.0, 400.0);
    add_hull(&mut ctx, b, 800.0, 0.0, 400.0);
    ctx.ships.get_mut(a).unwrap().linear_velocity = Vec3::new(5.0, 0.0, 0.0);
    ctx.ships.get_mut(b).unwrap().linear_velocity = Vec3::new(-5.0, 0.0, 0.0);

    let mass_a = ctx.ships.get(a).unwrap().mass;
    let mass_b = ctx.ships.get(b).unwrap().mass;
    let momentum_before = mass_a * 5.0 - mass_b * 5.0;

    let snapshot = tick(&mut ctx, DT, TickInputs::new());

    let ship_a = ctx.ships.get(a).unwrap();
    let ship_b = ctx.ships.get(b).unwrap();
    let momentum_after = mass_a * ship_a.linear_velocity.x + mass_b * ship_b.linear_velocity.x;
    assert!(
        (momentum_after - momentum_before).abs() / momentum_before.abs().max(1.0) < 0.02,
        "momentum not conserved: before {momentum_before}, after {momentum_after}"
    );
    assert!(ship_a.hull_health() < 800.0, "ship A took no ramming damage");
    assert!(ship_b.hull_health() < 800.0, "ship B took no ramming damage");
    assert!(
        snapshot.events.iter().any(|e| matches!(e, SimEvent::Collision { kind: CollisionKind::ShipShip, .. })),
        "no ship-ship collision event recorded"
    );
}

// S4 — reef strike: a ship running onto a shallow reef takes Reef-kind
// damage and loses most of its forward speed in the same tick.
#[test]
fn s4_reef_strike_bleeds_speed_and_deals_reef_damage() {
    let config = SimConfig::default();
    let ty = ShipType::light_sloop();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::reef(5.0)), 4);
    let ship = ctx.ships.spawn("Runner", ty, Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY);
    add_hull(&mut ctx, ship, 300.0, 0.0, 150.0);
    ctx.ships.get_mut(ship).unwrap().linear_velocity = Vec3::new(0.0, 0.0, 10.0);

    let snapshot = tick(&mut ctx, DT, TickInputs::new());

    let ship_ref = ctx.ships.get(ship).unwrap();
    assert!(ship_ref.linear_velocity.z <= 3.0 + 1e-2, "z-speed {} not bled off by reef strike (70% reduction from 10.0)", ship_ref.linear_velocity.z);
    assert!(
        snapshot.events.iter().any(|e| matches!(e, SimEvent::Collision { kind: CollisionKind::ShipTerrain, .. })),
        "no ship-terrain collision event recorded"
    );
    assert!(ship_ref.hull_health() < 300.0, "reef strike did no hull damage");
}

// S5 — sail in wind: a deployed square sail in a steady beam wind
// produces sustained forward thrust.
#[test]
fn s5_deployed_sail_produces_forward_thrust_in_wind() {
    let config = SimConfig::default();
    let ty = ShipType::light_sloop();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 5);
    let ship = ctx.ships.spawn("Runner", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    add_hull(&mut ctx, ship, ty.base_health, 0.0, 150.0);
    let sail = {
        let s = ctx.ships.get_mut(ship).unwrap();
        s.add_component(Vec3::new(0.0, 5.0, 0.0), 150.0, 40.0, ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)))
    };

    let inputs = TickInputs::new()
        .with_environment_command(EnvironmentCommand::SetWind { direction: Vec2::new(1.0, 0.0), speed: 10.0 })
        .with_ship_command(ship, ShipCommand::SetSail { component: sail, deployment: 1.0 });
    tick(&mut ctx, DT, inputs);

    let before_x = ctx.ships.get(ship).unwrap().position.x;
    run(&mut ctx, 180);
    let after_x = ctx.ships.get(ship).unwrap().position.x;

    assert!(after_x > before_x, "ship did not make forward progress under sail");
    assert!(ctx.ships.get(ship).unwrap().linear_velocity.x > 0.0, "ship lost forward velocity under steady wind");
}

// S6 — cannon explosion chain: a destroyed, ammunition-bearing cannon has
// a real (but not certain) chance of detonating and damaging a
// neighboring cannon within blast radius. Run across many seeds since
// the outcome is a coin flip per the spec's stated 40% probability, not
// a deterministic one.
#[test]
fn s6_destroyed_cannon_sometimes_chains_into_its_neighbor() {
    let mut explosions = 0;
    let mut neighbor_damaged = 0;
    const TRIALS: u64 = 60;

    for seed in 0..TRIALS {
        let config = SimConfig::default();
        let ty = ShipType::medium_frigate();
        let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), seed);
        let ship = ctx.ships.spawn("Gundeck", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
        add_hull(&mut ctx, ship, ty.base_health, 0.0, 400.0);

        let (cannon_a, cannon_b) = {
            let s = ctx.ships.get_mut(ship).unwrap();
            let a = s.add_component(Vec3::new(2.0, 0.0, 0.0), 100.0, 200.0, ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 6.0)));
            let b = s.add_component(Vec3::new(2.5, 0.0, 0.0), 100.0, 200.0, ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 6.0)));
            (a, b)
        };

        {
            let s = ctx.ships.get_mut(ship).unwrap();
            let a = s.component_mut(cannon_a).unwrap();
            a.destroyed = true;
            if let ComponentPayload::Cannon(c) = &mut a.payload {
                c.ammo_inventory.ball = 10;
                c.ammo_inventory.explosive = 2;
            }
            let b = s.component_mut(cannon_b).unwrap();
            if let ComponentPayload::Cannon(c) = &mut b.payload {
                c.ammo_inventory.ball = 10;
                c.ammo_inventory.explosive = 2;
            }
        }

        let b_health_before = ctx.ships.get(ship).unwrap().component(cannon_b).unwrap().health;
        let snapshot = tick(&mut ctx, DT, TickInputs::new());

        if snapshot.events.iter().any(|e| matches!(e, SimEvent::Destruction { component, .. } if *component == cannon_a)) {
            explosions += 1;
            let b_health_after = ctx.ships.get(ship).unwrap().component(cannon_b).unwrap().health;
            if b_health_after < b_health_before {
                neighbor_damaged += 1;
            }
        }

        // Cannon A's ammunition is always cleared once destroyed,
        // win or lose the roll.
        let a_ammo = ctx.ships.get(ship).unwrap().component(cannon_a).unwrap();
        if let ComponentPayload::Cannon(c) = &a_ammo.payload {
            assert_eq!(c.ammo_inventory.total(), 0, "destroyed cannon should always lose its ammunition");
        }
    }

    assert!(explosions > 0, "destroyed cannon never exploded across {TRIALS} trials");
    assert!(explosions < TRIALS as u32, "destroyed cannon always exploded across {TRIALS} trials — roll isn't being taken");
    assert!(neighbor_damaged > 0, "an exploding cannon never damaged its neighbor within blast radius");
}

// Boundary behavior (spec §8 item 9): a fully flooded ship is classified
// sinking and produces no thrust even with sails deployed and full wind.
#[test]
fn fully_flooded_ship_is_sinking_and_produces_no_thrust() {
    let config = SimConfig::default();
    let ty = ShipType::light_sloop();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 6);
    let ship = ctx.ships.spawn("Waterlogged", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
    add_hull(&mut ctx, ship, ty.base_health, 0.0, 150.0);
    {
        let s = ctx.ships.get_mut(ship).unwrap();
        s.add_component(Vec3::ZERO, 100.0, 20.0, ComponentPayload::Sail(SailPayload::new(SailKind::Square, 40.0)));
        s.water_intrusion = 1.0;
        s.is_sinking = true;
    }

    let inputs = TickInputs::new()
        .with_environment_command(EnvironmentCommand::SetWind { direction: Vec2::new(1.0, 0.0), speed: 20.0 });
    let before_y = ctx.ships.get(ship).unwrap().position.y;
    tick(&mut ctx, DT, inputs);
    let ship_ref = ctx.ships.get(ship).unwrap();

    assert!(ship_ref.is_sinking);
    assert!(ship_ref.position.y <= before_y, "sinking ship gained altitude");
}

// Unknown-target commands are rejected at the validation boundary rather
// than panicking or silently mutating state (spec §7).
#[test]
fn unknown_component_command_is_rejected_with_a_reason() {
    let config = SimConfig::default();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 7);
    let ship = ctx.ships.spawn("Lonely", ShipType::light_sloop(), Vec3::new(0.0, config.sea_level, 0.0), Quat::IDENTITY);
    add_hull(&mut ctx, ship, 300.0, 0.0, 150.0);

    let bogus = maritime_physics_core::ComponentId(9999);
    let inputs = TickInputs::new().with_ship_command(ship, ShipCommand::SetRudder { component: bogus, angle: 0.2 });
    let snapshot = tick(&mut ctx, DT, inputs);

    assert!(matches!(snapshot.events.as_slice(), [SimEvent::CommandRejected { .. }]));
}

// Entity/entity collisions (debris impacts) damage both bodies. Entities
// carry no thrust of their own and are never integrated by `tick` — they
// only collide if already overlapping when spawned, so the two spheres
// here start with their surfaces well inside one another.
#[test]
fn debris_collision_damages_both_entities() {
    let config = SimConfig::default();
    let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), 8);
    let a = ctx.spawn_entity(DynamicEntity::new(EntityId(0), Vec3::new(-0.5, 10.0, 0.0), Vec3::new(6.0, 0.0, 0.0), 5.0, 1.0, 20.0));
    let _b = ctx.spawn_entity(DynamicEntity::new(EntityId(0), Vec3::new(0.5, 10.0, 0.0), Vec3::new(-6.0, 0.0, 0.0), 5.0, 1.0, 20.0));

    let before_health = ctx.entities.iter().find(|e| e.id == a).unwrap().health;
    tick(&mut ctx, DT, TickInputs::new());
    let after_health = ctx.entities.iter().find(|e| e.id == a).unwrap().health;

    assert!(after_health < before_health, "colliding debris took no damage");
}

// Rudder jamming is a real (low-probability) per-tick risk once a rudder
// is worn past its jam threshold, not a fixed outcome — exercised across
// many seeds the same way the cannon-explosion chain above is.
#[test]
fn rudder_occasionally_jams_once_badly_worn() {
    let config = SimConfig::default();
    let mut jammed_at_least_once = false;
    const SEEDS: u64 = 30;
    const TICKS_PER_SEED: u32 = 3000;

    for seed in 0..SEEDS {
        let ty = ShipType::light_sloop();
        let mut ctx = SimulationContext::new(config, Box::new(FlatTerrain::open_water(config.sea_level - 200.0)), seed);
        let ship = ctx.ships.spawn("Helm", ty, Vec3::new(0.0, config.sea_level - ty.draft, 0.0), Quat::IDENTITY);
        add_hull(&mut ctx, ship, ty.base_health, 0.0, 150.0);
        let rudder = {
            let s = ctx.ships.get_mut(ship).unwrap();
            let id = s.add_component(Vec3::ZERO, 80.0, 30.0, ComponentPayload::Rudder(RudderPayload::new(0.6, 1.2, 4.0)));
            if let ComponentPayload::Rudder(r) = &mut s.component_mut(id).unwrap().payload {
                r.wear = 0.95;
            }
            id
        };

        for _ in 0..TICKS_PER_SEED {
            tick(&mut ctx, DT, TickInputs::new());
        }

        let s = ctx.ships.get(ship).unwrap();
        if let ComponentPayload::Rudder(r) = &s.component(rudder).unwrap().payload {
            if r.jammed {
                jammed_at_least_once = true;
                break;
            }
        }
    }

    assert!(jammed_at_least_once, "a badly worn rudder never jammed across {SEEDS} seeds of {TICKS_PER_SEED} ticks each");
}
