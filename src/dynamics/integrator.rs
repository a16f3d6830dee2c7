//! The ten-step per-tick ship integration (spec §4.3). Grounded on the
//! source's `systems::movement::ship_movement_system` (thrust → velocity
//! → position update) and `features::water::coupling`'s per-sample
//! buoyancy accumulation, generalized from 2-D top-down kinematics into
//! the full 6-DoF buoyant rigid body the spec requires.

use bevy_math::{Quat, Vec2, Vec3};

use crate::config::SimConfig;
use crate::ocean::OceanEnvironment;
use crate::ship::component::{ComponentKindTag, ComponentPayload};
use crate::ship::instance::ShipInstance;
use crate::wave::WaveField;

/// Fixed relative-to-keel offset used when sampling the buoyancy grid:
/// the grid lies at the ship's draft line, not at its origin.
const KEEL_Y_OFFSET_FRACTION: f32 = 1.0;
/// Center-of-buoyancy vertical offset from center of mass, as a fraction
/// of overall ship height (spec §4.3 step 1).
const BUOYANCY_CENTER_Y_FRACTION: f32 = -0.3;
const LINEAR_DAMPING: f32 = 0.999;
const ANGULAR_DAMPING: f32 = 0.995;
const WIND_EFFICIENCY: f32 = 1.0;
const WAVE_PRESSURE_EPSILON: f32 = 0.02;

struct GridSample {
    world_xz: Vec2,
    local_offset: Vec3,
}

/// Builds an NxN grid of sample offsets across the ship's waterline
/// footprint (length x width), centered on the ship origin in local
/// space (spec §4.3 step 2: "Sample a 7x7 grid across the waterline
/// footprint").
fn buoyancy_grid(length: f32, width: f32, n: usize) -> Vec<(f32, f32)> {
    let n = n.max(1);
    let mut samples = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let fx = if n > 1 { i as f32 / (n - 1) as f32 - 0.5 } else { 0.0 };
            let fz = if n > 1 { j as f32 / (n - 1) as f32 - 0.5 } else { 0.0 };
            samples.push((fx * length, fz * width));
        }
    }
    samples
}

fn world_samples(ship: &ShipInstance, n: usize) -> Vec<GridSample> {
    let ty = ship.ship_type;
    buoyancy_grid(ty.length, ty.width, n)
        .into_iter()
        .map(|(lx, lz)| {
            let local_offset = Vec3::new(lx, -ty.draft * KEEL_Y_OFFSET_FRACTION, lz);
            let world = ship.position + ship.orientation * local_offset;
            GridSample { world_xz: Vec2::new(world.x, world.z), local_offset }
        })
        .collect()
}

/// Integrates one ship by `dt`, reading (never writing) `waves` and
/// `ocean`. Pure function of `(ship, waves, ocean, config, dt, inputs)`
/// aside from the `&mut ShipInstance` it updates in place (spec §5
/// "Ship-ship interactions ... observe each other's pre-tick transform
/// only").
pub fn integrate_ship(ship: &mut ShipInstance, waves: &WaveField, ocean: &OceanEnvironment, config: &SimConfig, dt: f32) {
    if ship.is_sinking {
        integrate_sinking(ship, config, dt);
        return;
    }

    let ty = ship.ship_type;
    let com_local = ship.center_of_mass();
    let com_world = ship.position + ship.orientation * com_local;

    let mut force = Vec3::ZERO;
    let mut torque = Vec3::ZERO;

    // 2. Sampled buoyancy.
    let samples = world_samples(ship, config.buoyancy_samples);
    let n = config.buoyancy_samples.max(1);
    let cell_area = (ty.length / n as f32) * (ty.width / n as f32);
    let mut buoyancy_total = 0.0f32;
    let mut weighted_center = Vec3::ZERO;
    let mut submerged_volume = 0.0f32;
    for sample in &samples {
        let water_level = ocean.water_height(sample.world_xz.x, sample.world_xz.y, waves, config.gravity);
        let sample_world_y = ship.position.y + (ship.orientation * sample.local_offset).y;
        let submersion = (water_level - sample_world_y).max(0.0);
        if submersion > 0.0 {
            let volume = cell_area * submersion;
            let local_force = volume * config.water_density * config.gravity;
            buoyancy_total += local_force;
            weighted_center += sample.local_offset * local_force;
            submerged_volume += volume;
        }
    }
    if buoyancy_total > 0.0 {
        weighted_center /= buoyancy_total;
    }
    // spec §4.3 step 2: "Apply F = (0, ΣF_j/N^2, 0)" — literal division by
    // the sample count, not just a normalized average. See DESIGN.md Open
    // Question 5 for the catalog-tuning consequence of this term.
    let sample_count_sq = (n * n) as f32;
    let buoyancy_force = Vec3::new(0.0, buoyancy_total / sample_count_sq, 0.0);
    force += buoyancy_force;
    let center_of_buoyancy_local = if buoyancy_total > 0.0 {
        weighted_center
    } else {
        com_local + Vec3::new(0.0, BUOYANCY_CENTER_Y_FRACTION * ty.height, 0.0)
    };
    torque += (center_of_buoyancy_local - com_local).cross(buoyancy_force);

    // 3. Thrust from sails and engines.
    let wind_dir = ocean.wind_direction();
    let wind_speed = ocean.wind_speed();
    let forward = ship.forward();
    let forward_xz = Vec2::new(forward.x, forward.z).normalize_or_zero();

    for sail in ship.components_of_kind(ComponentKindTag::Sail) {
        if let ComponentPayload::Sail(s) = &sail.payload {
            let area_eff = s.effective_area(sail.max_health, sail.health);
            if area_eff <= 0.0 || sail.destroyed || !sail.active {
                continue;
            }
            let wind_angle = wind_dir.angle_between(forward_xz).abs();
            let angle_eff = s.angle_efficiency(wind_angle);
            let magnitude = wind_speed * wind_speed * area_eff * angle_eff * WIND_EFFICIENCY * sail.effectiveness();
            let f = forward * magnitude;
            force += f;
            torque += (sail.local_position - com_local).cross(f);
        }
    }

    for engine in ship.components_of_kind(ComponentKindTag::Engine) {
        if let ComponentPayload::Engine(e) = &engine.payload {
            if !e.running || engine.destroyed || !engine.active {
                continue;
            }
            let magnitude = e.thrust_force * engine.effectiveness();
            let f = forward * magnitude;
            force += f;
            torque += (engine.local_position - com_local).cross(f);
        }
    }

    // 4. Restoring torque / stability.
    let (roll, pitch) = ship.roll_pitch();
    let waterline_inertia = ty.length * ty.width.powi(3) / 12.0;
    let gm = if submerged_volume > f32::EPSILON {
        (waterline_inertia / submerged_volume + center_of_buoyancy_local.y - com_local.y).max(0.0)
    } else {
        0.0
    };
    let stability = (ty.base_stability * (1.0 + gm * 0.01)).max(0.0);
    torque += Vec3::new(-pitch, 0.0, -roll) * stability * ship.mass * config.gravity * 0.1;
    torque += -ship.angular_velocity * stability * 0.5;

    let tilt_axis = ship.up().cross(Vec3::Y);
    let tilt_angle = ship.up().angle_between(Vec3::Y);
    if tilt_axis.length() > f32::EPSILON {
        torque += tilt_axis.normalize() * tilt_angle * stability * ship.mass * 0.05;
    }

    // 5. Drag.
    let keel_submerged = buoyancy_total > 0.0;
    let speed = ship.linear_velocity.length();
    if keel_submerged && speed > f32::EPSILON {
        let wet_area = ty.length * ty.draft;
        let drag = -0.5 * config.water_density * speed * speed * config.drag_coefficient * wet_area
            * ship.linear_velocity.normalize();
        force += drag;
    }
    if speed > f32::EPSILON {
        let dry_area = ty.length * (ty.height - ty.draft) * 0.3;
        let drag = -0.5 * config.air_density * speed * speed * config.drag_coefficient * dry_area
            * ship.linear_velocity.normalize();
        force += drag;
    }
    torque += -ship.angular_velocity * config.angular_drag;

    // 6. Wind on hull.
    let wind_velocity = ocean.wind_velocity();
    let relative_wind = wind_velocity - ship.linear_velocity;
    let relative_speed = relative_wind.length();
    if relative_speed > f32::EPSILON {
        let side_area = ty.length * (ty.height - ty.draft) * 0.5;
        let hull_wind_force =
            0.5 * config.air_density * relative_speed * relative_speed * 0.8 * side_area * relative_wind.normalize();
        force += hull_wind_force;
    }

    // 7. Wave coupling.
    let wave_damping = (stability * 0.5).max(0.1);
    let mut wave_force_sum = Vec3::ZERO;
    let mut wave_torque_sum = Vec3::ZERO;
    for sample in &samples {
        let v_wave = waves.velocity(sample.world_xz.x, sample.world_xz.y, config.gravity);
        let speed_sq = v_wave.length_squared();
        if speed_sq <= f32::EPSILON {
            continue;
        }
        let f = v_wave.normalize() * (config.water_density * speed_sq * WAVE_PRESSURE_EPSILON);
        wave_force_sum += f;
        wave_torque_sum += (sample.local_offset - com_local).cross(f);
    }
    let sample_count = samples.len().max(1) as f32;
    force += (wave_force_sum / sample_count) * wave_damping;
    torque += (wave_torque_sum / sample_count) * wave_damping;

    const SLOPE_EPS: f32 = 1.0;
    let normal_px = waves.normal(ship.position.x + SLOPE_EPS, ship.position.z, config.gravity);
    let normal_nx = waves.normal(ship.position.x - SLOPE_EPS, ship.position.z, config.gravity);
    let normal_pz = waves.normal(ship.position.x, ship.position.z + SLOPE_EPS, config.gravity);
    let normal_nz = waves.normal(ship.position.x, ship.position.z - SLOPE_EPS, config.gravity);
    let slope_x = (normal_px.y - normal_nx.y) / (2.0 * SLOPE_EPS);
    let slope_z = (normal_pz.y - normal_nz.y) / (2.0 * SLOPE_EPS);
    torque += Vec3::new(
        slope_z * ship.mass * config.gravity * 0.1,
        0.0,
        -slope_x * ship.mass * config.gravity * 0.1,
    ) * wave_damping;
    torque += -ship.angular_velocity * 0.02 * wave_damping;

    // 8. Gravity.
    force += Vec3::new(0.0, -ship.mass * config.gravity, 0.0);

    // Externally applied force (spec §6 `applyExternalForce`), consumed
    // and reset this tick.
    force += ship.external_force;
    ship.external_force = Vec3::ZERO;

    // 9. Semi-implicit Euler integration.
    debug_assert!(force.is_finite() && torque.is_finite(), "non-finite force/torque in integrator");
    let force = if force.is_finite() { force } else { Vec3::ZERO };
    let torque = if torque.is_finite() { torque } else { Vec3::ZERO };

    let mass = ship.mass.max(f32::EPSILON);
    let moment_of_inertia = (mass * (ty.length * ty.length + ty.width * ty.width) / 12.0).max(f32::EPSILON);

    let linear_accel = force / mass;
    let angular_accel = torque / moment_of_inertia;

    ship.linear_velocity = (ship.linear_velocity + linear_accel * dt) * LINEAR_DAMPING;
    ship.angular_velocity = (ship.angular_velocity + angular_accel * dt) * ANGULAR_DAMPING;

    ship.position += ship.linear_velocity * dt;

    let delta_rotation = Quat::from_scaled_axis(ship.angular_velocity * dt);
    ship.orientation = (ship.orientation * delta_rotation).normalize();
    ship.normalize_orientation();

    let water_level_at_origin = ocean.water_height(ship.position.x, ship.position.z, waves, config.gravity);
    let floor = water_level_at_origin - ty.height;
    if ship.position.y < floor {
        ship.position.y = floor;
        ship.linear_velocity.y = ship.linear_velocity.y.max(0.0);
    }
}

/// A sinking ship continues to integrate gravity and drag only; it
/// produces zero thrust and zero positive buoyancy (spec §4.3 "Failure
/// semantics").
fn integrate_sinking(ship: &mut ShipInstance, config: &SimConfig, dt: f32) {
    ship.external_force = Vec3::ZERO;
    let mass = ship.mass.max(f32::EPSILON);
    let gravity_force = Vec3::new(0.0, -mass * config.gravity, 0.0);
    let speed = ship.linear_velocity.length();
    let drag = if speed > f32::EPSILON {
        -0.5 * config.water_density * speed * config.drag_coefficient * ship.linear_velocity
    } else {
        Vec3::ZERO
    };
    let accel = (gravity_force + drag) / mass;
    ship.linear_velocity = (ship.linear_velocity + accel * dt) * LINEAR_DAMPING;
    ship.angular_velocity *= ANGULAR_DAMPING;
    ship.position += ship.linear_velocity * dt;
    ship.normalize_orientation();
}
