// Black hole with an accretion disk of orbiting particles.
// Units are geometric (G = c = 1), so the event horizon sits at `2 * mass`.
// Disk particles move on Keplerian circles, `omega = sqrt(mass / r^3)`, and
// glow hotter toward the inner edge.

use std::f32::consts::TAU;

use log::debug;
use palette::{Gradient, LinSrgb};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::config::invalid;
use crate::error::Result;
use crate::utils::Rgb8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackHoleConfig {
    pub seed: u64,
    pub mass: f32,
    pub disk_inner: f32,
    pub disk_outer: f32,
    pub particle_count: u32,
}

impl Default for BlackHoleConfig {
    fn default() -> Self {
        // Inner edge at the innermost stable circular orbit, 6M
        Self {
            seed: 3,
            mass: 1.0,
            disk_inner: 6.0,
            disk_outer: 20.0,
            particle_count: 5_000,
        }
    }
}

impl BlackHoleConfig {
    pub fn horizon_radius(&self) -> f32 {
        2.0 * self.mass
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid(format!("mass must be positive, got {}", self.mass)));
        }
        if self.disk_inner <= self.horizon_radius() {
            return Err(invalid(format!(
                "disk inner radius {} is inside the event horizon {}",
                self.disk_inner,
                self.horizon_radius()
            )));
        }
        if !(self.disk_inner.is_finite() && self.disk_outer.is_finite()) {
            return Err(invalid(format!(
                "disk radii must be finite, got [{}, {}]",
                self.disk_inner, self.disk_outer
            )));
        }
        if !(self.disk_outer > self.disk_inner) {
            return Err(invalid(format!(
                "disk outer radius {} must exceed inner radius {}",
                self.disk_outer, self.disk_inner
            )));
        }
        if self.particle_count == 0 {
            return Err(invalid("accretion disk needs at least one particle"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskParticle {
    pub radius: f32,
    pub angle: f32,
    pub height: f32,
    pub angular_speed: f32,
    pub color: Rgb8,
}

impl DiskParticle {
    pub fn position(&self) -> [f32; 3] {
        let (s, c) = self.angle.sin_cos();
        [c * self.radius, self.height, s * self.radius]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBlackHole {
    pub horizon_radius: f32,
    pub particles: Vec<DiskParticle>,
}

impl GeneratedBlackHole {
    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.angle = (p.angle + p.angular_speed * dt).rem_euclid(TAU);
        }
    }
}

pub fn generate_black_hole(config: &BlackHoleConfig) -> Result<GeneratedBlackHole> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    // Inner edge white-hot, outer edge deep red
    let ramp = Gradient::new(vec![
        LinSrgb::new(1.0, 0.97, 0.9),
        LinSrgb::new(1.0, 0.65, 0.25),
        LinSrgb::new(0.55, 0.12, 0.05),
    ]);
    let span = config.disk_outer - config.disk_inner;

    let particles = (0..config.particle_count)
        .map(|_| {
            let radius = config.disk_inner + span * rng.random::<f32>();
            let t = (radius - config.disk_inner) / span;
            let col = ramp.get(t).into_format::<u8>();
            DiskParticle {
                radius,
                angle: rng.random_range(0.0..TAU),
                // Disk thickens slowly outward
                height: rng.random_range(-1.0f32..1.0) * 0.02 * radius,
                angular_speed: (config.mass / radius.powi(3)).sqrt(),
                color: Rgb8::new(col.red, col.green, col.blue),
            }
        })
        .collect();

    debug!(
        "black hole of mass {} generated with {} disk particles",
        config.mass, config.particle_count
    );
    Ok(GeneratedBlackHole {
        horizon_radius: config.horizon_radius(),
        particles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_stays_outside_horizon() {
        let cfg = BlackHoleConfig::default();
        let bh = generate_black_hole(&cfg).unwrap();
        assert_eq!(bh.horizon_radius, 2.0);
        assert!(bh.particles.iter().all(|p| p.radius >= cfg.disk_inner && p.radius <= cfg.disk_outer));
    }

    #[test]
    fn inner_particles_orbit_faster() {
        let bh = generate_black_hole(&BlackHoleConfig::default()).unwrap();
        let mut ps = bh.particles.clone();
        ps.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        assert!(ps[0].angular_speed > ps[ps.len() - 1].angular_speed);
        // Kepler: omega^2 r^3 = M
        let p = ps[0];
        assert!((p.angular_speed.powi(2) * p.radius.powi(3) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn update_advances_angles() {
        let mut bh = generate_black_hole(&BlackHoleConfig {
            particle_count: 10,
            ..BlackHoleConfig::default()
        })
        .unwrap();
        let before = bh.particles[0];
        bh.update(0.5);
        let expected = (before.angle + before.angular_speed * 0.5).rem_euclid(TAU);
        assert!((bh.particles[0].angle - expected).abs() < 1e-5);
    }

    #[test]
    fn disk_inside_horizon_rejected() {
        let cfg = BlackHoleConfig {
            disk_inner: 1.0,
            ..BlackHoleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn infinite_disk_rejected() {
        let cfg = BlackHoleConfig {
            disk_outer: f32::INFINITY,
            ..BlackHoleConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(generate_black_hole(&cfg).is_err());
    }
}
