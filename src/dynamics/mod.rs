//! Per-tick rigid-body integration (spec §4.3): the heart of the core.
//! One free function per ship, no shared mutable state between calls
//! (spec §5 "Concurrency contract": "ships do not share mutable state
//! during integration").

pub mod integrator;

pub use integrator::integrate_ship;
