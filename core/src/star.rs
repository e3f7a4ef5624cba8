// Star surfaces: blackbody tint modulated by granulation.

use image::{Rgb, RgbImage};
use log::debug;
use palette::{Gradient, LinSrgb};
use serde::{Deserialize, Serialize};

use crate::config::{check_grid, invalid};
use crate::domain_warp::turbulence;
use crate::error::Result;
use crate::utils::{Rgb8, cell_lon_lat, sphere_point};
use crate::Perlin3D;

pub const SOLAR_TEMPERATURE_K: f32 = 5778.0;
pub const MIN_TEMPERATURE_K: f32 = 1000.0;
pub const MAX_TEMPERATURE_K: f32 = 50000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub seed: u64,
    pub temperature_k: f32,
    // In solar radii
    pub radius: f32,
    pub width: u32,
    pub height: u32,
    // 0 is a flat disc, 1 strongly mottled
    pub granulation: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            temperature_k: SOLAR_TEMPERATURE_K,
            radius: 1.0,
            width: 256,
            height: 128,
            granulation: 0.5,
        }
    }
}

impl StarConfig {
    pub fn validate(&self) -> Result<()> {
        check_grid(self.width, self.height)?;
        if !(MIN_TEMPERATURE_K..=MAX_TEMPERATURE_K).contains(&self.temperature_k) {
            return Err(invalid(format!(
                "star temperature {}K outside [{MIN_TEMPERATURE_K}, {MAX_TEMPERATURE_K}]",
                self.temperature_k
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid(format!("star radius must be positive, got {}", self.radius)));
        }
        if !(0.0..=1.0).contains(&self.granulation) {
            return Err(invalid(format!(
                "granulation must lie in [0, 1], got {}",
                self.granulation
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStar {
    pub surface: RgbImage,
    pub color: Rgb8,
    // Relative to the sun: R^2 * (T / T_sun)^4
    pub luminosity: f32,
}

// Approximate apparent color of a blackbody at `temperature_k`
pub fn blackbody_color(temperature_k: f32) -> Rgb8 {
    let gradient = Gradient::with_domain(vec![
        (1000.0, LinSrgb::new(1.0, 0.22, 0.0)),
        (3500.0, LinSrgb::new(1.0, 0.6, 0.3)),
        (5778.0, LinSrgb::new(1.0, 0.96, 0.9)),
        (7500.0, LinSrgb::new(0.92, 0.93, 1.0)),
        (10000.0, LinSrgb::new(0.75, 0.82, 1.0)),
        (50000.0, LinSrgb::new(0.6, 0.7, 1.0)),
    ]);
    let col: LinSrgb = gradient.get(temperature_k.clamp(MIN_TEMPERATURE_K, MAX_TEMPERATURE_K));
    let rgb = col.into_format::<u8>();
    Rgb8::new(rgb.red, rgb.green, rgb.blue)
}

pub fn generate_star(config: &StarConfig) -> Result<GeneratedStar> {
    config.validate()?;
    let color = blackbody_color(config.temperature_k);
    let noise = Perlin3D::new(config.seed, 12.0, 0.5, 1);
    let g = config.granulation;

    let surface = RgbImage::from_fn(config.width, config.height, |x, y| {
        let (lon, lat) = cell_lon_lat(x, y, config.width, config.height);
        let [px, py, pz] = sphere_point(lon, lat);
        let t = turbulence(&noise, px, py, pz, 4) as f32;
        // Bright cell centers, darker lanes between them
        let brightness = 1.0 - g * 0.45 + g * 0.45 * t * 1.6;
        Rgb(color.shade(brightness.clamp(0.2, 1.0)).0)
    });

    let luminosity = config.radius.powi(2) * (config.temperature_k / SOLAR_TEMPERATURE_K).powi(4);
    debug!(
        "star {}K generated, luminosity {luminosity:.3} L_sun",
        config.temperature_k
    );

    Ok(GeneratedStar {
        surface,
        color,
        luminosity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;

    #[test]
    fn hot_stars_are_bluer() {
        let cool = blackbody_color(3000.0);
        let hot = blackbody_color(20000.0);
        assert!(cool.0[0] > cool.0[2]);
        assert!(hot.0[2] > hot.0[0]);
    }

    #[test]
    fn sun_has_unit_luminosity() {
        let star = generate_star(&StarConfig {
            width: 8,
            height: 4,
            ..StarConfig::default()
        })
        .unwrap();
        assert!((star.luminosity - 1.0).abs() < 1e-5);
        assert_eq!(star.surface.dimensions(), (8, 4));
    }

    #[test]
    fn no_granulation_is_flat() {
        let star = generate_star(&StarConfig {
            width: 16,
            height: 8,
            granulation: 0.0,
            ..StarConfig::default()
        })
        .unwrap();
        let first = *star.surface.get_pixel(0, 0);
        assert!(star.surface.pixels().all(|p| *p == first));
        assert_eq!(first.0, star.color.0);
    }

    #[test]
    fn temperature_out_of_range_rejected() {
        let cfg = StarConfig {
            temperature_k: 200.0,
            ..StarConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_surface_rejected() {
        let cfg = StarConfig {
            width: u32::MAX,
            height: 2,
            ..StarConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(GenerationError::InvalidDimensions { .. })
        ));
    }
}
