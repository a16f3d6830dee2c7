//! Wind, currents, sea level, and the force-query surface ships/entities
//! pull from (spec §4.2).

pub mod environment;

pub use environment::OceanEnvironment;
