use image::{Rgb, RgbImage};
use log::debug;

use crate::config::{PlanetConfig, check_grid};
use crate::error::Result;
use crate::utils::{cell_lon_lat, sphere_point};
use crate::{NoiseGenerator, Perlin3D};

const DETAIL_OCTAVES: usize = 3;
const DETAIL_FREQUENCY: f64 = 8.0;
const NORMAL_SEED_OFFSET: u64 = 0x0B0B_5EED;

// Surface-detail normals from their own three-octave noise. Independent of biomes.
pub struct NormalMapSynthesizer {
    width: u32,
    height: u32,
    noise: Perlin3D,
}

impl NormalMapSynthesizer {
    pub fn new(config: &PlanetConfig) -> Result<Self> {
        check_grid(config.width, config.height)?;
        Ok(Self {
            width: config.width,
            height: config.height,
            noise: Perlin3D::new(
                config.seed.wrapping_add(NORMAL_SEED_OFFSET),
                DETAIL_FREQUENCY * config.terrain_complexity as f64,
                0.5,
                DETAIL_OCTAVES,
            ),
        })
    }

    // Tangent-space X/Y in [-1, 1] at a sphere point
    pub fn sample(&self, p: [f64; 3]) -> (f32, f32) {
        let [x, y, z] = p;
        let nx = self.noise.get3(x, y, z).clamp(-1.0, 1.0);
        let ny = self.noise.get3(x + 19.1, y + 47.3, z + 3.9).clamp(-1.0, 1.0);
        (nx as f32, ny as f32)
    }

    pub fn generate(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let (lon, lat) = cell_lon_lat(x, y, self.width, self.height);
                let (nx, ny) = self.sample(sphere_point(lon, lat));
                img.put_pixel(x, y, Rgb([encode(nx), encode(ny), 255]));
            }
        }
        debug!("normal map synthesized ({}x{})", self.width, self.height);
        img
    }
}

// [-1, 1] -> [0, 255]
pub fn encode(v: f32) -> u8 {
    ((v.clamp(-1.0, 1.0) + 1.0) * 0.5 * 255.0).round() as u8
}
