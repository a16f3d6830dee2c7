//! Validation-boundary errors (spec §7, "Input-rejected").
//!
//! Nothing else in the core returns `Result`: degraded states are flags in
//! the snapshot, and programmer-error invariants are `debug_assert!` plus
//! release-mode clamping. A tick never panics and never propagates one of
//! these past its own boundary — `sim::tick` downgrades every rejection it
//! encounters into a [`crate::sim::snapshot::SimEvent::CommandRejected`]
//! entry in the event stream instead of failing the tick.

use thiserror::Error;

use crate::ids::{ComponentId, ShipId};

/// A command or query could not be honored. Always non-fatal to the tick
/// that produced it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("unknown ship id {0:?}")]
    UnknownShip(ShipId),

    #[error("unknown component id {0:?} on ship {1:?}")]
    UnknownComponent(ComponentId, ShipId),

    #[error("component {0:?} on ship {1:?} is not of the expected kind")]
    WrongComponentKind(ComponentId, ShipId),

    #[error("parameter out of range: {0}")]
    OutOfRange(String),

    #[error("component {0:?} on ship {1:?} is destroyed and cannot act")]
    ComponentDestroyed(ComponentId, ShipId),
}
