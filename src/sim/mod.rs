//! The tick boundary: explicit state, per-tick inputs, and the snapshot
//! produced each step (spec §5/§6). Nothing here reads a global — every
//! piece of state a tick touches is reachable from [`SimulationContext`].

pub mod commands;
pub mod context;
pub mod snapshot;
pub mod tick;

pub use commands::{EnvironmentCommand, ShipCommand, TickInputs};
pub use context::SimulationContext;
pub use snapshot::{
    CommandRejectionReason, ComponentSnapshot, ComponentStateSnapshot, Snapshot, ShipSnapshot,
    SimEvent,
};
pub use tick::tick;
