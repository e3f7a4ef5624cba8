// Spiral galaxy particle layout.
// Star `i` belongs to arm `i % arms`. Its polar angle is the arm's base angle
// plus `twist * r`, scattered by `arm_spread`. Stars inside `core_radius`
// form a flattened bulge instead. Colors run from a warm core to blue arms.

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
pub struct GalaxyConfig {
    pub seed: u64,
    pub star_count: u32,
    pub arms: u32,
    // Angular scatter around the arm center, radians
    pub arm_spread: f32,
    pub radius: f32,
    pub core_radius: f32,
    // Radians of winding per unit radius
    pub twist: f32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: 11,
            star_count: 20_000,
            arms: 4,
            arm_spread: 0.35,
            radius: 10.0,
            core_radius: 1.5,
            twist: 0.6,
        }
    }
}

impl GalaxyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.star_count == 0 {
            return Err(invalid("galaxy needs at least one star"));
        }
        if self.arms == 0 {
            return Err(invalid("galaxy needs at least one arm"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid(format!("galaxy radius must be positive, got {}", self.radius)));
        }
        if !(0.0..self.radius).contains(&self.core_radius) {
            return Err(invalid(format!(
                "core radius {} must lie in [0, {})",
                self.core_radius, self.radius
            )));
        }
        if !(self.arm_spread.is_finite() && self.arm_spread >= 0.0) {
            return Err(invalid("arm spread must be non-negative"));
        }
        if !self.twist.is_finite() {
            return Err(invalid(format!("twist must be finite, got {}", self.twist)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParticle {
    pub position: [f32; 3],
    pub color: Rgb8,
    pub size: f32,
    // None for bulge stars
    pub arm: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGalaxy {
    pub particles: Vec<GalaxyParticle>,
}

impl GeneratedGalaxy {
    pub fn bulge_count(&self) -> usize {
        self.particles.iter().filter(|p| p.arm.is_none()).count()
    }
}

pub fn generate_galaxy(config: &GalaxyConfig) -> Result<GeneratedGalaxy> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let ramp = Gradient::new(vec![
        LinSrgb::new(1.0, 0.85, 0.6),
        LinSrgb::new(0.95, 0.9, 0.85),
        LinSrgb::new(0.55, 0.7, 1.0),
    ]);

    let mut particles = Vec::with_capacity(config.star_count as usize);
    for i in 0..config.star_count {
        // Squaring the uniform sample crowds stars toward the center
        let u: f32 = rng.random();
        let r = config.radius * u * u;
        let falloff = (-r / config.radius * 3.0).exp();

        let (position, arm) = if r < config.core_radius {
            let theta = rng.random_range(0.0..TAU);
            let y = rng.random_range(-1.0f32..1.0) * config.core_radius * 0.4;
            ([r * theta.cos(), y, r * theta.sin()], None)
        } else {
            let arm = i % config.arms;
            let base = arm as f32 * TAU / config.arms as f32;
            let scatter = rng.random_range(-1.0f32..1.0) * config.arm_spread;
            let angle = base + config.twist * r + scatter;
            let y = rng.random_range(-1.0f32..1.0) * 0.05 * config.radius * falloff;
            ([r * angle.cos(), y, r * angle.sin()], Some(arm))
        };

        let col = ramp.get((r / config.radius).clamp(0.0, 1.0)).into_format::<u8>();
        particles.push(GalaxyParticle {
            position,
            color: Rgb8::new(col.red, col.green, col.blue),
            size: 0.02 + 0.06 * falloff * rng.random::<f32>(),
            arm,
        });
    }

    let galaxy = GeneratedGalaxy { particles };
    debug!(
        "galaxy with {} stars generated, {} in the bulge",
        galaxy.particles.len(),
        galaxy.bulge_count()
    );
    Ok(galaxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GalaxyConfig {
        GalaxyConfig {
            star_count: 2_000,
            ..GalaxyConfig::default()
        }
    }

    #[test]
    fn particle_count_and_bounds() {
        let cfg = small();
        let g = generate_galaxy(&cfg).unwrap();
        assert_eq!(g.particles.len(), 2_000);
        for p in &g.particles {
            let [x, _, z] = p.position;
            assert!((x * x + z * z).sqrt() <= cfg.radius + 1e-3);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(generate_galaxy(&small()).unwrap(), generate_galaxy(&small()).unwrap());
    }

    #[test]
    fn arms_are_round_robin() {
        let g = generate_galaxy(&small()).unwrap();
        let arms: Vec<u32> = g.particles.iter().filter_map(|p| p.arm).collect();
        assert!(arms.iter().all(|&a| a < 4));
        for a in 0..4 {
            assert!(arms.contains(&a));
        }
        assert!(g.bulge_count() > 0);
    }

    #[test]
    fn core_must_fit_inside() {
        let cfg = GalaxyConfig {
            core_radius: 20.0,
            ..GalaxyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_twist_rejected() {
        for twist in [f32::INFINITY, f32::NAN] {
            let cfg = GalaxyConfig {
                twist,
                ..GalaxyConfig::default()
            };
            assert!(generate_galaxy(&cfg).is_err(), "twist {twist} accepted");
        }
    }
}
