use log::debug;

use crate::config::{PlanetConfig, check_grid};
use crate::error::{GenerationError, Result};
use crate::utils::{cell_lon_lat, sphere_point};
use crate::{NoiseGenerator, Perlin3D};

const TERRAIN_OCTAVES: usize = 6;
const RIDGE_OCTAVES: usize = 4;
const BASE_FREQUENCY: f64 = 1.5;
// Stretch of the normalized fBm sum, which rarely leaves [-0.7, 0.7]
const CONTRAST: f64 = 1.4;
const RIDGE_WEIGHT: f64 = 0.35;
const RIDGE_SEED_OFFSET: u64 = 0x5EED_0F_A11CE;

// Row-major elevation grid, access as `data[y * width + x]`
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapField {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl HeightmapField {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    // Grayscale preview, -1 maps to black and 1 to white
    pub fn to_luma(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width, self.height, |x, y| {
            let v = (self.get(x, y) + 1.0) * 0.5;
            image::Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        })
    }
}

// Six-octave fBm plus a ridge term for mountain ranges, sampled on the unit sphere
pub struct HeightmapGenerator {
    width: u32,
    height: u32,
    terrain: Perlin3D,
    ridges: Perlin3D,
}

impl HeightmapGenerator {
    pub fn new(config: &PlanetConfig) -> Result<Self> {
        check_grid(config.width, config.height)?;
        let complexity = config.terrain_complexity as f64;
        if !(complexity.is_finite() && complexity > 0.0) {
            return Err(GenerationError::InvalidConfig(format!(
                "terrain complexity must be positive, got {complexity}"
            )));
        }

        Ok(Self {
            width: config.width,
            height: config.height,
            terrain: Perlin3D::new(config.seed, BASE_FREQUENCY * complexity, 0.5, TERRAIN_OCTAVES),
            ridges: Perlin3D::new(
                config.seed.wrapping_add(RIDGE_SEED_OFFSET),
                complexity,
                0.5,
                RIDGE_OCTAVES,
            ),
        })
    }

    // Elevation at one point of the unit sphere, in [-1, 1]
    pub fn sample(&self, p: [f64; 3]) -> f32 {
        let [x, y, z] = p;
        let base = self.terrain.get3(x, y, z);
        // Ridges only rise out of land, never out of the sea floor
        let mask = smoothstep(0.0, 0.4, base);
        let ridge = self.ridges.ridge(x, y, z);
        let h = CONTRAST * base + RIDGE_WEIGHT * mask * ridge;
        h.clamp(-1.0, 1.0) as f32
    }

    pub fn generate(&self) -> HeightmapField {
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let (lon, lat) = cell_lon_lat(x, y, self.width, self.height);
                data.push(self.sample(sphere_point(lon, lat)));
            }
        }

        let field = HeightmapField {
            width: self.width,
            height: self.height,
            data,
        };
        let (lo, hi) = field.min_max();
        debug!(
            "heightmap {}x{} generated, range [{lo:.3}, {hi:.3}]",
            self.width, self.height
        );
        field
    }
}

pub(crate) fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
