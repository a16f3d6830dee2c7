//! Headless demo binary: spawns a couple of ships onto a flat sea, feeds
//! them a handful of commands, and runs the fixed-timestep tick loop for
//! a few seconds, printing the final snapshot as JSON.
//!
//! This is a demonstration harness, not a server — a real integrator is
//! expected to own its own command source and transport and call
//! [`maritime_physics_core::tick`] directly.

use bevy_math::{Quat, Vec2, Vec3};
use tracing::info;

use maritime_physics_core::collision::DynamicEntity;
use maritime_physics_core::config::{SimConfig, TICK_DT};
use maritime_physics_core::ship::component::{
    AmmoKind, CannonPayload, ComponentPayload, HullSections, RudderPayload, SailKind, SailPayload,
};
use maritime_physics_core::ship::{HullMaterial, ShipType};
use maritime_physics_core::sim::{
    tick, EnvironmentCommand, ShipCommand, SimulationContext, TickInputs,
};
use maritime_physics_core::terrain::FlatTerrain;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maritime_physics_core=info".into()),
        )
        .init();

    let config = SimConfig::default();
    let terrain = FlatTerrain::open_water(config.sea_level + 40.0);
    let mut ctx = SimulationContext::new(config, Box::new(terrain), 0xC0FFEE);

    let frigate = ctx.ships.spawn(
        "Windlass",
        ShipType::medium_frigate(),
        Vec3::new(0.0, ctx.config.sea_level, 0.0),
        Quat::IDENTITY,
    );
    let sloop = ctx.ships.spawn(
        "Marauder",
        ShipType::light_sloop(),
        Vec3::new(40.0, ctx.config.sea_level, 5.0),
        Quat::from_rotation_y(std::f32::consts::PI),
    );

    let (sail, rudder, cannon) = {
        let ship = ctx.ships.get_mut(frigate).expect("just spawned");
        let hull = ship.add_component(
            Vec3::ZERO,
            600.0,
            800.0,
            ComponentPayload::Hull {
                sections: HullSections::new(600.0 / 8.0),
                material: HullMaterial::Oak,
                thickness: 0.3,
                base_volume: 900.0,
            },
        );
        let sail = ship.add_component(
            Vec3::new(0.0, 6.0, 0.0),
            150.0,
            120.0,
            ComponentPayload::Sail(SailPayload::new(SailKind::Square, 80.0)),
        );
        let rudder = ship.add_component(
            Vec3::new(0.0, 0.0, -15.0),
            80.0,
            40.0,
            ComponentPayload::Rudder(RudderPayload::new(0.6, 1.2, 4.0)),
        );
        let cannon = ship.add_component(
            Vec3::new(2.0, 1.0, 0.0),
            100.0,
            200.0,
            ComponentPayload::Cannon(CannonPayload::new(40.0, 4, 6.0)),
        );
        let _ = hull;
        (sail, rudder, cannon)
    };

    let debris = DynamicEntity::new(
        maritime_physics_core::EntityId(0),
        Vec3::new(20.0, ctx.config.sea_level + 1.0, 2.0),
        Vec3::ZERO,
        40.0,
        1.0,
        5.0,
    );
    ctx.spawn_entity(debris);

    let mut snapshot = maritime_physics_core::sim::Snapshot::default();
    let duration_s = 4.0;
    let steps = (duration_s / TICK_DT) as u32;

    info!(steps, "starting demo run with Windlass and Marauder");

    for step in 0..steps {
        let mut inputs = TickInputs::new();
        if step == 0 {
            inputs = inputs
                .with_environment_command(EnvironmentCommand::SetWind {
                    direction: Vec2::new(1.0, 0.0),
                    speed: 9.0,
                })
                .with_ship_command(frigate, ShipCommand::SetSail { component: sail, deployment: 1.0 })
                .with_ship_command(frigate, ShipCommand::SetRudder { component: rudder, angle: 0.2 })
                .with_ship_command(frigate, ShipCommand::LoadCannon { component: cannon, ammo: AmmoKind::Ball });
        }
        if step == 120 {
            inputs = inputs.with_ship_command(frigate, ShipCommand::FireCannon { component: cannon });
        }

        snapshot = tick(&mut ctx, TICK_DT, inputs);

        if !snapshot.events.is_empty() {
            info!(time = snapshot.time, events = snapshot.events.len(), "tick produced events");
        }
    }

    let _ = sloop;

    let rendered = serde_json::to_string_pretty(&snapshot).expect("snapshot serializes");
    println!("{rendered}");
}
