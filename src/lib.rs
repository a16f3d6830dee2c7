//! Maritime physics core: wave field synthesis, ship rigid-body dynamics,
//! and collision/damage resolution for a voxel seafaring simulation.
//!
//! The crate is headless: it owns no renderer, no network transport, no
//! save format. A host calls [`sim::tick`] once per fixed timestep with a
//! [`sim::SimulationContext`], a batch of [`sim::commands::TickInputs`], and
//! gets back a [`sim::snapshot::Snapshot`] plus the event stream produced by
//! that step.

pub mod collision;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod ids;
pub mod ocean;
pub mod ship;
pub mod sim;
pub mod terrain;
pub mod wave;

pub use config::SimConfig;
pub use error::CoreError;
pub use ids::{ComponentId, EntityId, ShipId};
pub use sim::{tick, SimulationContext};
