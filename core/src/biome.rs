// Biome classification.
// Each cell gets a temperature from its latitude (cosine falloff) cooled by
// elevation, a humidity from inverse elevation plus deterministic jitter, and
// then the biome minimizing
// `|dT| + 50 * |dHumidity| + 30 * |dElevation|`.

use log::debug;

use crate::config::{BiomeDefinition, PlanetConfig};
use crate::error::{GenerationError, Result};
use crate::heightmap::HeightmapField;
use crate::utils::{cell_lon_lat, sphere_point};
use crate::{NoiseGenerator, Perlin3D};

pub const EQUATOR_TEMPERATURE: f32 = 30.0;
pub const POLE_TEMPERATURE: f32 = -25.0;
// Degrees lost between sea level and the highest peak
pub const LAPSE_RATE: f32 = 40.0;

pub const HUMIDITY_WEIGHT: f32 = 50.0;
pub const ELEVATION_WEIGHT: f32 = 30.0;

const JITTER_SEED_OFFSET: u64 = 0x4855_4D49_4449_5459;
const JITTER_FREQUENCY: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellClimate {
    pub temperature: f32,
    pub humidity: f32,
}

// Parallel to a HeightmapField: per-cell biome index plus the climate it was picked from
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    width: u32,
    height: u32,
    indices: Vec<usize>,
    climate: Vec<CellClimate>,
}

impl BiomeMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn cell(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn index(&self, x: u32, y: u32) -> usize {
        self.indices[self.cell(x, y)]
    }

    pub fn climate(&self, x: u32, y: u32) -> CellClimate {
        self.climate[self.cell(x, y)]
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    // Number of cells assigned to each biome, in biome list order
    pub fn histogram(&self, biome_count: usize) -> Vec<usize> {
        let mut counts = vec![0; biome_count];
        for &i in &self.indices {
            if let Some(c) = counts.get_mut(i) {
                *c += 1;
            }
        }
        counts
    }

    // Each cell painted with its biome's base color
    pub fn to_preview(&self, biomes: &[BiomeDefinition]) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let color = biomes
                .get(self.index(x, y))
                .map(|b| b.colors.base.0)
                .unwrap_or([255, 0, 255]);
            image::Rgb(color)
        })
    }
}

pub struct BiomeClassifier<'a> {
    biomes: &'a [BiomeDefinition],
    jitter: Perlin3D,
}

impl<'a> BiomeClassifier<'a> {
    pub fn new(config: &'a PlanetConfig) -> Result<Self> {
        if config.biomes.is_empty() {
            return Err(GenerationError::EmptyBiomeList);
        }
        Ok(Self {
            biomes: &config.biomes,
            jitter: Perlin3D::new(
                config.seed.wrapping_add(JITTER_SEED_OFFSET),
                JITTER_FREQUENCY,
                0.5,
                2,
            ),
        })
    }

    // Climate of a cell at latitude `lat` (radians) with the given elevation
    pub fn climate(&self, lat: f64, elevation: f32, p: [f64; 3]) -> CellClimate {
        let falloff = lat.cos() as f32;
        let temperature = EQUATOR_TEMPERATURE * falloff + POLE_TEMPERATURE * (1.0 - falloff)
            - LAPSE_RATE * elevation.max(0.0);

        let jitter = ((self.jitter.get3(p[0], p[1], p[2]) + 1.0) * 0.5) as f32;
        let dryness = (elevation + 1.0) * 0.5;
        let humidity = (0.7 * (1.0 - dryness) + 0.3 * jitter).clamp(0.0, 1.0);

        CellClimate {
            temperature,
            humidity,
        }
    }

    pub fn score(biome: &BiomeDefinition, climate: CellClimate, elevation: f32) -> f32 {
        (climate.temperature - biome.temperature).abs()
            + HUMIDITY_WEIGHT * (climate.humidity - biome.humidity).abs()
            + ELEVATION_WEIGHT * (elevation - biome.elevation).abs()
    }

    // Minimum score wins; on equal scores the earlier biome is kept
    pub fn select(&self, climate: CellClimate, elevation: f32) -> usize {
        let mut best = 0;
        let mut best_score = f32::INFINITY;
        for (i, b) in self.biomes.iter().enumerate() {
            let s = Self::score(b, climate, elevation);
            if s < best_score {
                best = i;
                best_score = s;
            }
        }
        best
    }

    pub fn classify(&self, heightmap: &HeightmapField) -> BiomeMap {
        let (width, height) = (heightmap.width(), heightmap.height());
        let cells = width as usize * height as usize;
        let mut indices = Vec::with_capacity(cells);
        let mut climate = Vec::with_capacity(cells);

        for y in 0..height {
            for x in 0..width {
                let (lon, lat) = cell_lon_lat(x, y, width, height);
                let elevation = heightmap.get(x, y);
                let c = self.climate(lat, elevation, sphere_point(lon, lat));
                indices.push(self.select(c, elevation));
                climate.push(c);
            }
        }

        let map = BiomeMap {
            width,
            height,
            indices,
            climate,
        };
        debug!(
            "biome map classified, histogram {:?}",
            map.histogram(self.biomes.len())
        );
        map
    }
}
