use rand::Rng;
use std::f32::consts::PI;

use crate::config::particles::{MotionConfig, ParticleConfig};
use crate::utils::maths_utils::{Vec3, clamp_length, distance, length, scale};

/// Structure-of-arrays storage for the point cloud.
///
/// Every buffer has exactly `len()` entries for the whole lifetime of the
/// background; updates are index-based and in place.
#[derive(Debug, Clone)]
pub struct ParticleBuffers {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    colors: Vec<Vec3>,
    base_sizes: Vec<f32>,
    sizes: Vec<f32>,
    speed_factors: Vec<f32>,
    radius: f32,
}

/// What happened during one motion step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    pub agitated: usize,
    pub rebounds: usize,
}

/// Uniform volumetric sample: the sqrt on the radius pulls samples toward the
/// center, the angle pair is uniform on the sphere.
pub fn sample_in_sphere<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let r = radius * rng.r#gen::<f32>().sqrt();
    let theta = rng.r#gen::<f32>() * PI * 2.0;
    let phi = (2.0 * rng.r#gen::<f32>() - 1.0).acos();

    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

fn palette_color(rgb: [u8; 3]) -> Vec3 {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

impl ParticleBuffers {
    pub fn generate<R: Rng + ?Sized>(count: usize, config: &ParticleConfig, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut base_sizes = Vec::with_capacity(count);
        let mut speed_factors = Vec::with_capacity(count);

        let speed = config.motion.initial_speed;
        for _ in 0..count {
            positions.push(sample_in_sphere(config.sphere_radius, rng));
            velocities.push([
                rng.gen_range(-speed..=speed),
                rng.gen_range(-speed..=speed),
                rng.gen_range(-speed..=speed),
            ]);
            let swatch = config.palette[rng.gen_range(0..config.palette.len())];
            colors.push(palette_color(swatch));
            base_sizes.push(config.min_size + rng.r#gen::<f32>() * config.size_spread);
            speed_factors
                .push(config.min_speed_factor + rng.r#gen::<f32>() * config.speed_factor_spread);
        }

        Self {
            sizes: base_sizes.clone(),
            positions,
            velocities,
            colors,
            base_sizes,
            speed_factors,
            radius: config.sphere_radius,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Advance, agitate near `attractor`, and rebound off the sphere wall.
    ///
    /// `attractor` is in cloud-local space. After this returns every particle
    /// is inside the sphere (up to float rounding).
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        attractor: Option<Vec3>,
        motion: &MotionConfig,
        rng: &mut R,
    ) -> StepStats {
        let mut stats = StepStats::default();
        let kick = motion.agitation;

        for i in 0..self.positions.len() {
            let v = self.velocities[i];
            let p = &mut self.positions[i];
            p[0] += v[0] * dt;
            p[1] += v[1] * dt;
            p[2] += v[2] * dt;

            if let Some(target) = attractor {
                if distance(*p, target) < motion.pointer_radius {
                    let agitated = [
                        v[0] + rng.gen_range(-kick..=kick),
                        v[1] + rng.gen_range(-kick..=kick),
                        v[2] + rng.gen_range(-kick..=kick),
                    ];
                    self.velocities[i] = clamp_length(agitated, motion.max_speed);
                    stats.agitated += 1;
                }
            }

            let from_center = length(*p);
            if from_center > self.radius {
                *p = scale(*p, self.radius / from_center);
                self.velocities[i] = scale(self.velocities[i], -motion.rebound_damping);
                stats.rebounds += 1;
            }
        }

        stats
    }

    /// Per-particle size breathing, phase-shifted by each speed factor.
    pub fn pulse_sizes(&mut self, time: f32, amplitude: f32) {
        for i in 0..self.sizes.len() {
            let pulse = (time * self.speed_factors[i] * 2.0).sin() * amplitude + 1.0;
            self.sizes[i] = self.base_sizes[i] * pulse;
        }
    }
}
