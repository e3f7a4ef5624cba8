// Serde configs for every generator. GeneratorConfig is what presets store.

use serde::{Deserialize, Serialize};

use crate::black_hole::BlackHoleConfig;
use crate::error::{GenerationError, Result};
use crate::galaxy::GalaxyConfig;
use crate::star::StarConfig;
use crate::utils::Rgb8;

// Visual feature weights of a biome, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub trees: f32,
    pub rocks: f32,
    pub water: f32,
    pub lava: f32,
    pub ice: f32,
    pub sand: f32,
}

impl FeatureWeights {
    fn all(&self) -> [f32; 6] {
        [
            self.trees, self.rocks, self.water, self.lava, self.ice, self.sand,
        ]
    }
}

// Display colors of a biome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomePalette {
    pub base: Rgb8,
    pub accent: Rgb8,
    pub water: Rgb8,
    pub vegetation: Rgb8,
    pub rock: Rgb8,
}

// A named climate/terrain category.
// `temperature` is in degrees Celsius, `humidity` in `[0, 1]` and
// `elevation` in `[-1, 1]`, the same units the classifier computes per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    pub name: String,
    pub temperature: f32,
    pub humidity: f32,
    pub elevation: f32,
    pub features: FeatureWeights,
    pub colors: BiomePalette,
}

impl BiomeDefinition {
    // Water-dominant biomes never get snow caps
    pub fn is_aquatic(&self) -> bool {
        self.features.water > 0.5
    }
}

// Planet archetypes with a compile-time biome set each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    Terran,
    Desert,
    Ocean,
    Ice,
    Volcanic,
}

impl PlanetType {
    pub const ALL: [PlanetType; 5] = [
        PlanetType::Terran,
        PlanetType::Desert,
        PlanetType::Ocean,
        PlanetType::Ice,
        PlanetType::Volcanic,
    ];

    #[rustfmt::skip]
    pub fn biomes(self) -> Vec<BiomeDefinition> {
        let c = Rgb8::new;
        let water = c(30, 90, 180);
        match self {
            PlanetType::Terran => vec![
                biome("Ocean", 15.0, 0.9, -0.5, w().water(1.0),
                    palette(c(28, 84, 160), c(24, 72, 140), water, c(40, 110, 60), c(90, 90, 100))),
                biome("Beach", 22.0, 0.5, 0.05, w().sand(0.9).water(0.2),
                    palette(c(214, 196, 140), c(200, 180, 120), water, c(96, 140, 60), c(150, 140, 120))),
                biome("Grassland", 18.0, 0.5, 0.2, w().trees(0.4).rocks(0.1),
                    palette(c(104, 150, 64), c(124, 170, 80), water, c(56, 120, 48), c(120, 112, 100))),
                biome("Forest", 14.0, 0.75, 0.3, w().trees(0.9).rocks(0.1),
                    palette(c(48, 100, 44), c(36, 84, 36), water, c(22, 70, 30), c(96, 90, 80))),
                biome("Desert", 32.0, 0.1, 0.25, w().sand(1.0).rocks(0.3),
                    palette(c(222, 190, 130), c(200, 160, 100), water, c(140, 150, 70), c(160, 120, 90))),
                biome("Tundra", -8.0, 0.35, 0.35, w().ice(0.5).rocks(0.3),
                    palette(c(150, 160, 140), c(170, 176, 160), water, c(90, 110, 80), c(110, 110, 110))),
                biome("Mountains", 2.0, 0.3, 0.8, w().rocks(1.0).ice(0.3),
                    palette(c(120, 110, 100), c(140, 132, 120), water, c(70, 90, 60), c(100, 96, 92))),
                biome("Ice Cap", -25.0, 0.4, 0.2, w().ice(1.0),
                    palette(c(230, 240, 250), c(210, 225, 240), water, c(180, 200, 190), c(170, 180, 190))),
            ],
            PlanetType::Desert => vec![
                biome("Dune Sea", 40.0, 0.05, 0.1, w().sand(1.0),
                    palette(c(230, 190, 120), c(210, 165, 100), water, c(150, 140, 70), c(170, 120, 80))),
                biome("Mesa", 34.0, 0.15, 0.6, w().rocks(0.9).sand(0.4),
                    palette(c(178, 100, 60), c(150, 80, 50), water, c(130, 120, 60), c(120, 70, 50))),
                biome("Salt Flat", 28.0, 0.2, -0.2, w().sand(0.3).water(0.3),
                    palette(c(236, 230, 216), c(220, 214, 200), water, c(160, 160, 120), c(190, 184, 170))),
                biome("Oasis", 26.0, 0.7, -0.4, w().water(0.8).trees(0.6),
                    palette(c(60, 130, 150), c(50, 110, 130), c(40, 120, 170), c(60, 130, 50), c(120, 110, 90))),
            ],
            PlanetType::Ocean => vec![
                biome("Abyss", 8.0, 1.0, -0.8, w().water(1.0),
                    palette(c(12, 40, 100), c(10, 34, 90), c(16, 52, 130), c(30, 80, 60), c(60, 70, 90))),
                biome("Shallows", 22.0, 0.9, -0.1, w().water(0.9).sand(0.3),
                    palette(c(40, 140, 190), c(50, 160, 200), c(40, 150, 200), c(40, 120, 90), c(110, 120, 130))),
                biome("Archipelago", 24.0, 0.7, 0.3, w().trees(0.8).sand(0.5),
                    palette(c(70, 140, 70), c(90, 160, 80), water, c(30, 110, 40), c(110, 100, 90))),
            ],
            PlanetType::Ice => vec![
                biome("Glacier", -30.0, 0.4, 0.3, w().ice(1.0),
                    palette(c(232, 242, 252), c(214, 230, 246), c(90, 140, 190), c(170, 190, 180), c(160, 170, 185))),
                biome("Crevasse Field", -20.0, 0.3, 0.7, w().ice(0.8).rocks(0.6),
                    palette(c(190, 210, 230), c(160, 185, 215), c(90, 140, 190), c(150, 170, 160), c(110, 120, 140))),
                biome("Frozen Sea", -15.0, 0.8, -0.5, w().water(0.6).ice(0.9),
                    palette(c(170, 200, 225), c(150, 185, 215), c(70, 120, 170), c(140, 160, 150), c(120, 130, 150))),
            ],
            PlanetType::Volcanic => vec![
                biome("Lava Field", 60.0, 0.0, 0.1, w().lava(1.0).rocks(0.5),
                    palette(c(50, 30, 26), c(70, 36, 28), c(90, 40, 30), c(60, 60, 40), c(40, 36, 36))),
                biome("Ash Plain", 35.0, 0.1, 0.3, w().rocks(0.4).sand(0.6),
                    palette(c(90, 86, 84), c(110, 104, 100), c(70, 60, 60), c(80, 90, 60), c(60, 56, 56))),
                biome("Basalt Highland", 20.0, 0.2, 0.8, w().rocks(1.0).lava(0.3),
                    palette(c(44, 42, 46), c(60, 58, 62), c(70, 60, 60), c(70, 80, 60), c(36, 34, 38))),
                biome("Sulfur Sea", 45.0, 0.8, -0.5, w().water(0.9),
                    palette(c(170, 160, 60), c(150, 140, 50), c(180, 170, 70), c(100, 110, 50), c(90, 80, 50))),
            ],
        }
    }
}

// Builder shorthand for the preset tables above
fn w() -> FeatureWeights {
    FeatureWeights::default()
}

impl FeatureWeights {
    fn trees(mut self, v: f32) -> Self {
        self.trees = v;
        self
    }
    fn rocks(mut self, v: f32) -> Self {
        self.rocks = v;
        self
    }
    fn water(mut self, v: f32) -> Self {
        self.water = v;
        self
    }
    fn lava(mut self, v: f32) -> Self {
        self.lava = v;
        self
    }
    fn ice(mut self, v: f32) -> Self {
        self.ice = v;
        self
    }
    fn sand(mut self, v: f32) -> Self {
        self.sand = v;
        self
    }
}

fn palette(base: Rgb8, accent: Rgb8, water: Rgb8, vegetation: Rgb8, rock: Rgb8) -> BiomePalette {
    BiomePalette {
        base,
        accent,
        water,
        vegetation,
        rock,
    }
}

fn biome(
    name: &str,
    temperature: f32,
    humidity: f32,
    elevation: f32,
    features: FeatureWeights,
    colors: BiomePalette,
) -> BiomeDefinition {
    BiomeDefinition {
        name: name.to_string(),
        temperature,
        humidity,
        elevation,
        features,
        colors,
    }
}

// Everything the planet pipeline needs for one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub seed: u64,
    // Texture grid (equirectangular, longitude x latitude)
    pub width: u32,
    pub height: u32,
    pub radius: f32,
    pub biomes: Vec<BiomeDefinition>,
    // Radians per second around the tilted axis
    pub rotation_speed: f32,
    // Radians
    pub axial_tilt: f32,
    pub has_rings: bool,
    pub has_atmosphere: bool,
    pub atmosphere_color: Rgb8,
    // Signed so presets written by hand can carry a negative count (treated as 0)
    pub moon_count: i32,
    pub terrain_complexity: f32,
    pub ocean_level: f32,
    pub cloud_cover: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self::preset(PlanetType::Terran, 42)
    }
}

impl PlanetConfig {
    pub fn preset(planet_type: PlanetType, seed: u64) -> Self {
        let (ocean_level, cloud_cover, has_atmosphere, atmosphere_color) = match planet_type {
            PlanetType::Terran => (0.0, 0.5, true, Rgb8::new(110, 170, 255)),
            PlanetType::Desert => (-0.5, 0.1, true, Rgb8::new(240, 190, 130)),
            PlanetType::Ocean => (0.4, 0.6, true, Rgb8::new(90, 160, 255)),
            PlanetType::Ice => (-0.2, 0.3, true, Rgb8::new(200, 230, 255)),
            PlanetType::Volcanic => (-0.3, 0.2, false, Rgb8::new(255, 120, 60)),
        };

        Self {
            seed,
            width: 256,
            height: 128,
            radius: 1.0,
            biomes: planet_type.biomes(),
            rotation_speed: 0.1,
            axial_tilt: 23.4_f32.to_radians(),
            has_rings: false,
            has_atmosphere,
            atmosphere_color,
            moon_count: 1,
            terrain_complexity: 1.0,
            ocean_level,
            cloud_cover,
        }
    }

    // Negative moon counts collapse to zero.
    pub fn effective_moon_count(&self) -> usize {
        self.moon_count.max(0) as usize
    }

    // Fails fast on configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        check_grid(self.width, self.height)?;
        if self.biomes.is_empty() {
            return Err(GenerationError::EmptyBiomeList);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(invalid(format!("radius must be positive, got {}", self.radius)));
        }
        if !(self.terrain_complexity.is_finite() && self.terrain_complexity > 0.0) {
            return Err(invalid(format!(
                "terrain complexity must be positive, got {}",
                self.terrain_complexity
            )));
        }
        if !(-1.0..=1.0).contains(&self.ocean_level) {
            return Err(invalid(format!(
                "ocean level must lie in [-1, 1], got {}",
                self.ocean_level
            )));
        }
        if !(0.0..=1.0).contains(&self.cloud_cover) {
            return Err(invalid(format!(
                "cloud cover must lie in [0, 1], got {}",
                self.cloud_cover
            )));
        }
        for b in &self.biomes {
            if b.features.all().iter().any(|w| !(0.0..=1.0).contains(w)) {
                return Err(invalid(format!(
                    "biome `{}` has a feature weight outside [0, 1]",
                    b.name
                )));
            }
        }
        Ok(())
    }
}

// 8192 x 4096 texels
pub const MAX_TEXELS: u64 = 1 << 25;

// Texture grids must be non-empty and small enough to index with usize
pub(crate) fn check_grid(width: u32, height: u32) -> Result<()> {
    let texels = u64::from(width) * u64::from(height);
    if texels == 0 || texels > MAX_TEXELS {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    Ok(())
}

pub(crate) fn invalid(msg: impl Into<String>) -> GenerationError {
    GenerationError::InvalidConfig(msg.into())
}

// One config per generator kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    Planet(PlanetConfig),
    Star(StarConfig),
    Galaxy(GalaxyConfig),
    BlackHole(BlackHoleConfig),
}

impl GeneratorConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorConfig::Planet(_) => "planet",
            GeneratorConfig::Star(_) => "star",
            GeneratorConfig::Galaxy(_) => "galaxy",
            GeneratorConfig::BlackHole(_) => "black_hole",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            GeneratorConfig::Planet(c) => c.validate(),
            GeneratorConfig::Star(c) => c.validate(),
            GeneratorConfig::Galaxy(c) => c.validate(),
            GeneratorConfig::BlackHole(c) => c.validate(),
        }
    }
}
