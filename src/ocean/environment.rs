//! Ocean Environment: wind, currents, sea level, and force queries
//! (spec §4.2). Grounded on `resources::wind::Wind` (direction/strength
//! resource with a `velocity()` helper) and `features::water::coupling`'s
//! water-to-ship force application, generalized from a 2-D top-down game to
//! the spec's 3-D buoyancy/drag model.

use bevy_math::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::wave::WaveField;

/// Amplitude of the local current jitter term.
const CURRENT_NOISE_AMPLITUDE: f32 = 0.2;
/// Gain for relaxing the global current direction toward the wind direction.
const CURRENT_DIRECTION_GAIN: f32 = 0.1;
/// Gain for relaxing the global current magnitude toward its wind-driven target.
const CURRENT_MAGNITUDE_GAIN: f32 = 0.2;
/// Fraction of wind speed the global current magnitude relaxes toward.
const CURRENT_WIND_COUPLING: f32 = 0.3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Wind {
    direction: Vec2,
    speed: f32,
}

impl Default for Wind {
    fn default() -> Self {
        Self {
            direction: Vec2::X,
            speed: 0.0,
        }
    }
}

impl Wind {
    fn velocity(&self) -> Vec3 {
        Vec3::new(self.direction.x * self.speed, 0.0, self.direction.y * self.speed)
    }
}

/// Owns sea level, wind, and the slowly-relaxing global current; exposes
/// the buoyancy/drag force helpers every other force-producing term in
/// [`crate::dynamics`] is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanEnvironment {
    sea_level: f32,
    wind: Wind,
    current_direction: Vec2,
    current_magnitude: f32,
    #[serde(skip, default = "default_noise")]
    current_noise: Perlin,
}

fn default_noise() -> Perlin {
    Perlin::new(0)
}

impl OceanEnvironment {
    pub fn new(sea_level: f32, seed: u32) -> Self {
        Self {
            sea_level,
            wind: Wind::default(),
            current_direction: Vec2::X,
            current_magnitude: 0.0,
            current_noise: Perlin::new(seed),
        }
    }

    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    pub fn wind_direction(&self) -> Vec2 {
        self.wind.direction
    }

    pub fn wind_speed(&self) -> f32 {
        self.wind.speed
    }

    pub fn wind_velocity(&self) -> Vec3 {
        self.wind.velocity()
    }

    pub fn set_wind(&mut self, direction: Vec2, speed: f32) {
        self.wind = Wind {
            direction: direction.normalize_or_zero(),
            speed: speed.max(0.0),
        };
    }

    /// Relaxes the global current toward the wind each tick.
    pub fn advance(&mut self, dt: f32) {
        let target_dir = if self.wind.direction == Vec2::ZERO {
            self.current_direction
        } else {
            self.wind.direction
        };
        self.current_direction = self
            .current_direction
            .lerp(target_dir, (CURRENT_DIRECTION_GAIN * dt).clamp(0.0, 1.0))
            .normalize_or_zero();

        let target_mag = CURRENT_WIND_COUPLING * self.wind.speed;
        self.current_magnitude +=
            (target_mag - self.current_magnitude) * (CURRENT_MAGNITUDE_GAIN * dt).clamp(0.0, 1.0);
    }

    /// c(x, z, t) = c_global + local-noise(x*0.01, z*0.01, t*0.1) * 0.2.
    pub fn current(&self, x: f32, z: f32, t: f32) -> Vec2 {
        let global = self.current_direction * self.current_magnitude;
        let nx = self
            .current_noise
            .get([(x * 0.01) as f64, (z * 0.01) as f64, (t * 0.1) as f64]) as f32;
        let nz = self
            .current_noise
            .get([(z * 0.01) as f64, (x * 0.01) as f64, (t * 0.1 + 100.0) as f64]) as f32;
        global + Vec2::new(nx, nz) * CURRENT_NOISE_AMPLITUDE
    }

    /// Water surface height: sea level + wave height.
    pub fn water_height(&self, x: f32, z: f32, waves: &WaveField, gravity: f32) -> f32 {
        self.sea_level + waves.height(x, z, gravity)
    }

    /// Water velocity at a point: wave orbital velocity + surface current,
    /// attenuated with depth below the local water surface.
    pub fn water_velocity(&self, p: Vec3, waves: &WaveField, t: f32, gravity: f32) -> Vec3 {
        let surface = self.water_height(p.x, p.z, waves, gravity);
        let depth_below_surface = (surface - p.y).max(0.0);
        let attenuation = (-depth_below_surface * 0.1).exp();

        let wave_v = waves.velocity(p.x, p.z, gravity);
        let current = self.current(p.x, p.z, t);
        (wave_v + Vec3::new(current.x, 0.0, current.y)) * attenuation
    }

    /// Buoyant force for a body at `p` with volume `v` (density term folded
    /// into the caller via submerged-volume scaling, per spec §4.2).
    pub fn buoyant_force(
        &self,
        p: Vec3,
        volume: f32,
        waves: &WaveField,
        water_density: f32,
        gravity: f32,
    ) -> Vec3 {
        let water_level = self.water_height(p.x, p.z, waves, gravity);
        let depth = (water_level - p.y).max(0.0);
        let submerged_volume = volume.min(depth * volume);
        Vec3::new(0.0, water_density * gravity * submerged_volume, 0.0)
    }

    /// Quadratic drag: F = -1/2 * rho * |v| * v * Cd * A.
    pub fn quadratic_drag(velocity: Vec3, density: f32, drag_coefficient: f32, area: f32) -> Vec3 {
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return Vec3::ZERO;
        }
        -0.5 * density * speed * drag_coefficient * area * velocity
    }

    /// Aggregate ocean force on a mass moving at `velocity` relative to the
    /// local water velocity, combining buoyancy and drag.
    pub fn aggregate_force(
        &self,
        p: Vec3,
        velocity: Vec3,
        volume: f32,
        drag_coefficient: f32,
        area: f32,
        waves: &WaveField,
        water_density: f32,
        gravity: f32,
        t: f32,
    ) -> Vec3 {
        let buoyancy = self.buoyant_force(p, volume, waves, water_density, gravity);
        let water_v = self.water_velocity(p, waves, t, gravity);
        let relative = velocity - water_v;
        let drag = Self::quadratic_drag(relative, water_density, drag_coefficient, area);
        buoyancy + drag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buoyancy_zero_when_fully_above_water() {
        let env = OceanEnvironment::new(64.0, 1);
        let waves = WaveField::new(8, 0.95, 0.02, 1);
        let f = env.buoyant_force(Vec3::new(0.0, 100.0, 0.0), 10.0, &waves, 1000.0, 9.81);
        assert_eq!(f, Vec3::ZERO);
    }

    #[test]
    fn buoyancy_positive_when_submerged() {
        let env = OceanEnvironment::new(64.0, 1);
        let waves = WaveField::new(8, 0.95, 0.02, 1);
        let f = env.buoyant_force(Vec3::new(0.0, 60.0, 0.0), 10.0, &waves, 1000.0, 9.81);
        assert!(f.y > 0.0);
    }

    #[test]
    fn current_relaxes_toward_wind_over_time() {
        let mut env = OceanEnvironment::new(64.0, 1);
        env.set_wind(Vec2::new(0.0, 1.0), 10.0);
        for _ in 0..6000 {
            env.advance(1.0 / 60.0);
        }
        assert!((env.current_magnitude - 0.3 * 10.0).abs() < 0.1);
        assert!(env.current_direction.dot(Vec2::new(0.0, 1.0)) > 0.99);
    }
}
