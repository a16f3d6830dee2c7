//! Per-tick input surface (spec §6 "Inputs"): per-ship commands plus
//! environmental overrides, consumed atomically at tick step (4).

use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::ids::{ComponentId, ShipId};
use crate::ship::component::AmmoKind;

/// One command addressed to a single component (or the whole ship, for
/// `ApplyExternalForce`) on a ship. Unknown ids or out-of-range
/// parameters are rejected at the validation boundary (spec §7
/// "Input-rejected") rather than aborting the tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShipCommand {
    SetRudder { component: ComponentId, angle: f32 },
    SetSail { component: ComponentId, deployment: f32 },
    LoadCannon { component: ComponentId, ammo: AmmoKind },
    AimCannon { component: ComponentId, target: Vec3 },
    FireCannon { component: ComponentId },
    StartEngine { component: ComponentId },
    StopEngine { component: ComponentId },
    ApplyExternalForce { force: Vec3 },
}

/// Environmental overrides applied before their respective subsystem's
/// `advance` step (spec §4.1 "setWind" / "inject a Circular disturbance").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnvironmentCommand {
    SetWind { direction: Vec2, speed: f32 },
    InjectDisturbance { origin: Vec2, intensity: f32, radius: f32 },
}

/// Everything a single `tick` call consumes (spec §6 "tick(Δt, inputs) ->
/// snapshot").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInputs {
    pub ship_commands: Vec<(ShipId, ShipCommand)>,
    pub environment_commands: Vec<EnvironmentCommand>,
}

impl TickInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ship_command(mut self, ship: ShipId, command: ShipCommand) -> Self {
        self.ship_commands.push((ship, command));
        self
    }

    pub fn with_environment_command(mut self, command: EnvironmentCommand) -> Self {
        self.environment_commands.push(command);
        self
    }
}
