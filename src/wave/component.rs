//! A single traveling or radiating sinusoid (spec §3 "Wave Component", §4.1).

use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Phase-speed tuning multiplier K in `c = sqrt(g*lambda/2pi) * K`.
const PHASE_SPEED_MULTIPLIER: f32 = 1.0;

/// Propagation/contribution model of a wave component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaveKind {
    /// Plane wave with a fixed 2-D propagation direction.
    Directional { direction: Vec2 },
    /// Radiating disturbance from a point origin, born at `t0`.
    Circular { origin: Vec2, t0: f32 },
    /// Fixed-node standing wave aligned to the x/z axes.
    Standing { direction: Vec2 },
}

/// One sinusoidal contributor to the wave field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponent {
    pub kind: WaveKind,
    /// Amplitude, always >= 0 (spec invariant).
    pub amplitude: f32,
    /// Wavelength.
    pub wavelength: f32,
    /// Phase offset.
    pub phase: f32,
}

impl WaveComponent {
    pub fn directional(amplitude: f32, wavelength: f32, direction: Vec2, phase: f32) -> Self {
        Self {
            kind: WaveKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            amplitude: amplitude.max(0.0),
            wavelength,
            phase,
        }
    }

    pub fn circular(amplitude: f32, wavelength: f32, origin: Vec2, t0: f32, phase: f32) -> Self {
        Self {
            kind: WaveKind::Circular { origin, t0 },
            amplitude: amplitude.max(0.0),
            wavelength,
            phase,
        }
    }

    pub fn standing(amplitude: f32, wavelength: f32, direction: Vec2, phase: f32) -> Self {
        Self {
            kind: WaveKind::Standing {
                direction: direction.normalize_or_zero(),
            },
            amplitude: amplitude.max(0.0),
            wavelength,
            phase,
        }
    }

    /// Angular wavenumber k = 2*pi/lambda.
    pub fn wavenumber(&self) -> f32 {
        if self.wavelength <= f32::EPSILON {
            0.0
        } else {
            std::f32::consts::TAU / self.wavelength
        }
    }

    /// Phase speed c = sqrt(g*lambda/2pi) * K.
    pub fn phase_speed(&self, gravity: f32) -> f32 {
        (gravity * self.wavelength / std::f32::consts::TAU)
            .max(0.0)
            .sqrt()
            * PHASE_SPEED_MULTIPLIER
    }

    /// Decays amplitude by `decay^dt`, per spec §4.1 generation policy.
    pub fn decay(&mut self, decay_factor: f32, dt: f32) {
        self.amplitude *= decay_factor.powf(dt);
        self.amplitude = self.amplitude.max(0.0);
    }

    /// Height contribution h_i(x, z, t).
    pub fn height(&self, x: f32, z: f32, t: f32, gravity: f32) -> f32 {
        let k = self.wavenumber();
        let c = self.phase_speed(gravity);
        match self.kind {
            WaveKind::Directional { direction } => {
                let proj = direction.x * x + direction.y * z;
                self.amplitude * (k * proj - c * k * t + self.phase).sin()
            }
            WaveKind::Circular { origin, t0 } => {
                let r = ((x - origin.x).powi(2) + (z - origin.y).powi(2)).sqrt();
                let age = t - t0;
                if r <= f32::EPSILON {
                    return 0.0;
                }
                if (r - c * age).abs() >= self.wavelength {
                    return 0.0;
                }
                let attenuated = self.amplitude / (1.0 + 0.1 * r);
                attenuated * (k * r - c * k * t + self.phase).sin()
            }
            WaveKind::Standing { direction: _ } => {
                self.amplitude
                    * (k * x).sin()
                    * (k * z).sin()
                    * (c * k * t + self.phase).cos()
            }
        }
    }

    /// Analytic orbital/radial/vertical velocity contribution v_i(x, z, t).
    pub fn velocity(&self, x: f32, z: f32, t: f32, gravity: f32) -> Vec3 {
        let k = self.wavenumber();
        let c = self.phase_speed(gravity);
        let omega = c * k;
        match self.kind {
            WaveKind::Directional { direction } => {
                let proj = direction.x * x + direction.y * z;
                let phase = k * proj - omega * t + self.phase;
                let vertical = self.amplitude * omega * phase.cos();
                let horizontal_mag = self.amplitude * omega * phase.sin();
                Vec3::new(
                    direction.x * horizontal_mag,
                    vertical,
                    direction.y * horizontal_mag,
                )
            }
            WaveKind::Circular { origin, t0 } => {
                let dx = x - origin.x;
                let dz = z - origin.y;
                let r = (dx * dx + dz * dz).sqrt();
                let age = t - t0;
                if r <= f32::EPSILON || (r - c * age).abs() >= self.wavelength {
                    return Vec3::ZERO;
                }
                let radial_dir = Vec2::new(dx, dz) / r;
                let attenuated = self.amplitude / (1.0 + 0.1 * r);
                let phase = k * r - omega * t + self.phase;
                let vertical = attenuated * omega * phase.cos();
                let radial_mag = attenuated * omega * phase.sin();
                Vec3::new(radial_dir.x * radial_mag, vertical, radial_dir.y * radial_mag)
            }
            WaveKind::Standing { .. } => {
                let vertical =
                    -self.amplitude * omega * (k * x).sin() * (k * z).sin() * (omega * t + self.phase).sin();
                Vec3::new(0.0, vertical, 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_origin_at_t0_is_zero() {
        let w = WaveComponent::directional(2.0, 40.0, Vec2::new(1.0, 0.0), 0.0);
        assert_eq!(w.height(0.0, 0.0, 0.0, 9.81), 0.0);
    }

    #[test]
    fn amplitude_never_negative_after_decay() {
        let mut w = WaveComponent::directional(0.01, 10.0, Vec2::X, 0.0);
        w.decay(0.95, 1.0 / 60.0);
        assert!(w.amplitude >= 0.0);
    }

    #[test]
    fn circular_degenerate_radius_short_circuits() {
        let w = WaveComponent::circular(1.0, 10.0, Vec2::ZERO, 0.0, 0.0);
        assert_eq!(w.height(0.0, 0.0, 5.0, 9.81), 0.0);
        assert_eq!(w.velocity(0.0, 0.0, 5.0, 9.81), Vec3::ZERO);
    }

    #[test]
    fn wavenumber_matches_formula() {
        let w = WaveComponent::directional(1.0, 10.0, Vec2::X, 0.0);
        assert!((w.wavenumber() - std::f32::consts::TAU / 10.0).abs() < 1e-6);
    }
}
