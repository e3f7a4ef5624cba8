// Per-pixel surface colors.
// A pixel starts from its biome's base/accent mix and then takes at most one
// feature overlay. The overlays are tried in priority order
// (water, lava, vegetation, rock, sand, ice, snow cap) and the first one whose
// gate opens wins. Every overlay is a `lerp` toward the feature color.
// Water replaces the pixel outright.

use image::RgbImage;
use log::debug;

use crate::biome::{BiomeMap, CellClimate};
use crate::config::{BiomeDefinition, PlanetConfig, invalid};
use crate::error::{GenerationError, Result};
use crate::heightmap::{HeightmapField, smoothstep};
use crate::utils::{Rgb8, cell_lon_lat, lerp_color, sphere_point};
use crate::{NoiseGenerator, Perlin3D};

pub const LAVA_COLOR: Rgb8 = Rgb8::new(255, 86, 20);
pub const SAND_COLOR: Rgb8 = Rgb8::new(222, 200, 150);
pub const ICE_COLOR: Rgb8 = Rgb8::new(200, 225, 245);
pub const SNOW_COLOR: Rgb8 = Rgb8::new(250, 250, 255);

pub const SNOW_LINE: f32 = 0.75;
pub const VEGETATION_CEILING: f32 = 0.6;
pub const ROCK_FLOOR: f32 = 0.35;
pub const SHORE_BAND: f32 = 0.08;
// Deepest water is this fraction of the biome's water color
pub const WATER_DEPTH_SHADE: f32 = 0.8;

const DETAIL_SEED_OFFSET: u64 = 0xDE7A_11;
const MASK_SEED_OFFSET: u64 = 0x3A5C_0FF5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Water,
    Lava,
    Vegetation,
    Rock,
    Sand,
    Ice,
    SnowCap,
}

// Per-pixel gate values, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureNoise {
    pub detail: f32,
    pub lava: f32,
    pub vegetation: f32,
    pub rock: f32,
    pub sand: f32,
}

impl FeatureNoise {
    // Every gate wide open for every positive weight
    pub const OPEN: FeatureNoise = FeatureNoise {
        detail: 0.5,
        lava: 1.0,
        vegetation: 0.0,
        rock: 0.0,
        sand: 0.0,
    };
}

// First overlay whose conditions hold for this pixel, if any.
pub fn select_overlay(
    biome: &BiomeDefinition,
    elevation: f32,
    climate: CellClimate,
    ocean_level: f32,
    noise: &FeatureNoise,
) -> Option<Overlay> {
    let f = &biome.features;
    let above_sea = elevation >= ocean_level;

    if elevation < ocean_level && f.water > 0.5 {
        return Some(Overlay::Water);
    }
    if f.lava > 0.0 && noise.lava > 1.0 - f.lava * 0.6 {
        return Some(Overlay::Lava);
    }
    if f.trees > 0.0 && above_sea && elevation < VEGETATION_CEILING && noise.vegetation < f.trees {
        return Some(Overlay::Vegetation);
    }
    if f.rocks > 0.0 && elevation > ROCK_FLOOR && noise.rock < f.rocks {
        return Some(Overlay::Rock);
    }
    if f.sand > 0.0
        && ((above_sea && elevation < ocean_level + SHORE_BAND) || noise.sand < f.sand * 0.5)
    {
        return Some(Overlay::Sand);
    }
    if f.ice > 0.0 && climate.temperature < 0.0 {
        return Some(Overlay::Ice);
    }
    if elevation > SNOW_LINE && !biome.is_aquatic() {
        return Some(Overlay::SnowCap);
    }
    None
}

// Water darkens with depth below the ocean level
pub fn water_color(biome: &BiomeDefinition, elevation: f32, ocean_level: f32) -> Rgb8 {
    let depth = ((ocean_level - elevation) / (ocean_level + 1.0).max(f32::EPSILON)).clamp(0.0, 1.0);
    let water = biome.colors.water;
    lerp_color(water, water.shade(WATER_DEPTH_SHADE), depth)
}

pub fn base_color(biome: &BiomeDefinition, noise: &FeatureNoise) -> Rgb8 {
    lerp_color(biome.colors.base, biome.colors.accent, noise.detail)
}

// Final color of one pixel.
pub fn shade_pixel(
    biome: &BiomeDefinition,
    elevation: f32,
    climate: CellClimate,
    ocean_level: f32,
    noise: &FeatureNoise,
) -> Rgb8 {
    let base = base_color(biome, noise);
    let f = &biome.features;
    match select_overlay(biome, elevation, climate, ocean_level, noise) {
        None => base,
        Some(Overlay::Water) => water_color(biome, elevation, ocean_level),
        Some(Overlay::Lava) => lerp_color(base, LAVA_COLOR, f.lava * 0.85),
        Some(Overlay::Vegetation) => lerp_color(base, biome.colors.vegetation, f.trees * 0.7),
        Some(Overlay::Rock) => lerp_color(base, biome.colors.rock, f.rocks * 0.8),
        Some(Overlay::Sand) => lerp_color(base, SAND_COLOR, f.sand * 0.75),
        Some(Overlay::Ice) => lerp_color(base, ICE_COLOR, f.ice * 0.8),
        Some(Overlay::SnowCap) => {
            let t = 0.5 + 0.5 * smoothstep(SNOW_LINE as f64, 1.0, elevation as f64) as f32;
            lerp_color(base, SNOW_COLOR, t)
        }
    }
}

pub struct SurfaceColorizer<'a> {
    config: &'a PlanetConfig,
    detail: Perlin3D,
    mask: Perlin3D,
}

impl<'a> SurfaceColorizer<'a> {
    pub fn new(config: &'a PlanetConfig) -> Self {
        let complexity = config.terrain_complexity as f64;
        Self {
            config,
            detail: Perlin3D::new(
                config.seed.wrapping_add(DETAIL_SEED_OFFSET),
                4.0 * complexity,
                0.5,
                4,
            ),
            mask: Perlin3D::new(
                config.seed.wrapping_add(MASK_SEED_OFFSET),
                3.0 * complexity,
                0.55,
                3,
            ),
        }
    }

    // Noise is a function of the sphere point only, so texels are reproducible
    pub fn feature_noise(&self, p: [f64; 3]) -> FeatureNoise {
        let [x, y, z] = p;
        let unit = |v: f64| ((v + 1.0) * 0.5).clamp(0.0, 1.0) as f32;
        FeatureNoise {
            detail: unit(self.detail.get3(x, y, z)),
            lava: unit(self.mask.get3(x + 11.3, y, z)),
            vegetation: unit(self.mask.get3(x, y + 23.7, z)),
            rock: unit(self.mask.get3(x, y, z + 31.1)),
            sand: unit(self.mask.get3(x - 7.9, y - 4.4, z)),
        }
    }

    pub fn colorize(&self, heightmap: &HeightmapField, biomes: &BiomeMap) -> Result<RgbImage> {
        let (width, height) = (heightmap.width(), heightmap.height());
        if (biomes.width(), biomes.height()) != (width, height) {
            return Err(GenerationError::InvalidConfig(format!(
                "biome map is {}x{} but heightmap is {width}x{height}",
                biomes.width(),
                biomes.height()
            )));
        }

        let defs = &self.config.biomes;
        let ocean_level = self.config.ocean_level;
        let mut img = RgbImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let index = biomes.index(x, y);
                let biome = defs.get(index).ok_or_else(|| {
                    invalid(format!(
                        "biome index {index} at ({x}, {y}) is outside the {}-entry biome list",
                        defs.len()
                    ))
                })?;
                let (lon, lat) = cell_lon_lat(x, y, width, height);
                let noise = self.feature_noise(sphere_point(lon, lat));
                let color = shade_pixel(
                    biome,
                    heightmap.get(x, y),
                    biomes.climate(x, y),
                    ocean_level,
                    &noise,
                );
                img.put_pixel(x, y, image::Rgb(color.0));
            }
        }

        debug!("surface colorized ({width}x{height})");
        Ok(img)
    }
}
