//! Time-parametric ocean surface: a bounded superposition of wave
//! components (spec §4.1).

pub mod component;
pub mod field;

pub use component::{WaveComponent, WaveKind};
pub use field::WaveField;
