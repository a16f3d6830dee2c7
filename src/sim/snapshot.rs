//! Tick output: per-ship/per-component state plus the event stream since
//! the last snapshot (spec §6 "Outputs per snapshot").

use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::CollisionKind;
use crate::ids::{Body, ComponentId, EntityId, ShipId};
use crate::ship::component::ComponentKindTag;
use crate::ship::damage::DamageKind;

/// Kind-specific state surfaced per component (spec §6: "sail
/// deployment, cannon reload, rudder angle, etc.").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ComponentStateSnapshot {
    Hull,
    Sail { deployment: f32, reefed: bool, tear_damage: f32 },
    Cannon { reload_timer: f32, loaded: bool, misfired: bool, ammo_total: u32 },
    Engine { running: bool, fuel: f32 },
    Mast,
    Rudder { angle: f32, jammed: bool },
    Anchor { deployed: bool },
    Cargo { current_load: f32, capacity: f32 },
    Quarters { current_crew: u32, crew_capacity: u32 },
    Navigation,
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub id: ComponentId,
    pub kind: ComponentKindTag,
    pub health: f32,
    pub max_health: f32,
    pub effectiveness: f32,
    pub destroyed: bool,
    pub state: ComponentStateSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    pub id: ShipId,
    pub name: String,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub health_fraction: f32,
    pub water_intrusion: f32,
    pub is_sinking: bool,
    pub components: Vec<ComponentSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Collision { a: Body, b: Body, point: Vec3, energy: f32, kind: CollisionKind },
    Damage { target: ShipId, component: ComponentId, magnitude: f32, kind: DamageKind },
    Destruction { target: ShipId, component: ComponentId, position: Vec3 },
    ShipSunk { target: ShipId },
    CannonFire { ship: ShipId, component: ComponentId, direction: Vec3, ammo: crate::ship::component::AmmoKind },
    EntityDestroyed { entity: EntityId },
    CommandRejected { ship: ShipId, reason: CommandRejectionReason },
}

/// The validation-boundary error class (spec §7 "Input-rejected"),
/// downgraded from [`crate::error::CoreError`] into snapshot data rather
/// than propagated past the tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandRejectionReason {
    UnknownShip,
    UnknownComponent,
    WrongComponentKind,
    ComponentDestroyed,
    OutOfRange,
}

impl From<&crate::error::CoreError> for CommandRejectionReason {
    fn from(err: &crate::error::CoreError) -> Self {
        use crate::error::CoreError;
        match err {
            CoreError::UnknownShip(_) => CommandRejectionReason::UnknownShip,
            CoreError::UnknownComponent(_, _) => CommandRejectionReason::UnknownComponent,
            CoreError::WrongComponentKind(_, _) => CommandRejectionReason::WrongComponentKind,
            CoreError::ComponentDestroyed(_, _) => CommandRejectionReason::ComponentDestroyed,
            CoreError::OutOfRange(_) => CommandRejectionReason::OutOfRange,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f32,
    pub ships: Vec<ShipSnapshot>,
    pub events: Vec<SimEvent>,
}
