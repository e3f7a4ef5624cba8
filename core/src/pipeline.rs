use std::time::Instant;

use log::{debug, info};

use crate::assembler::{PlanetAssembler, PlanetGroup};
use crate::biome::{BiomeClassifier, BiomeMap};
use crate::colorizer::SurfaceColorizer;
use crate::config::PlanetConfig;
use crate::error::Result;
use crate::heightmap::{HeightmapField, HeightmapGenerator};
use crate::normal_map::NormalMapSynthesizer;
use crate::scene::ResourceRegistry;
use crate::texture::GeneratedTexture;

// Result of one linear pass: heightmap -> biomes -> colors -> normals
#[derive(Debug, Clone)]
pub struct GeneratedPlanet {
    pub heightmap: HeightmapField,
    pub biomes: BiomeMap,
    pub texture: GeneratedTexture,
}

// What `regenerate` hands back once the textures have moved into the group
#[derive(Debug, Clone)]
pub struct SurfaceMaps {
    pub heightmap: HeightmapField,
    pub biomes: BiomeMap,
}

// Runs the surface pipeline and keeps at most one assembled group alive.
#[derive(Default)]
pub struct PlanetGenerator {
    assembler: PlanetAssembler,
    current: Option<PlanetGroup>,
}

impl PlanetGenerator {
    pub fn new(assembler: PlanetAssembler) -> Self {
        Self {
            assembler,
            current: None,
        }
    }

    pub fn generate(config: &PlanetConfig) -> Result<GeneratedPlanet> {
        config.validate()?;
        let start = Instant::now();

        let heightmap = HeightmapGenerator::new(config)?.generate();
        debug!("heightmap stage took {:.2?}", start.elapsed());

        let t = Instant::now();
        let biomes = BiomeClassifier::new(config)?.classify(&heightmap);
        debug!("biome stage took {:.2?}", t.elapsed());

        let t = Instant::now();
        let diffuse = SurfaceColorizer::new(config).colorize(&heightmap, &biomes)?;
        debug!("colorize stage took {:.2?}", t.elapsed());

        let t = Instant::now();
        let normal = NormalMapSynthesizer::new(config)?.generate();
        debug!("normal stage took {:.2?}", t.elapsed());

        info!(
            "generated planet seed={} {}x{} in {:.2?}",
            config.seed,
            config.width,
            config.height,
            start.elapsed()
        );

        Ok(GeneratedPlanet {
            heightmap,
            biomes,
            texture: GeneratedTexture { diffuse, normal },
        })
    }

    pub fn current(&self) -> Option<&PlanetGroup> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut PlanetGroup> {
        self.current.as_mut()
    }

    // Disposes the previous group and builds a fresh one. On error the
    // previous group is already gone and nothing replaces it.
    pub fn regenerate(
        &mut self,
        config: &PlanetConfig,
        registry: &mut ResourceRegistry,
    ) -> Result<(SurfaceMaps, &PlanetGroup)> {
        self.clear(registry);
        let GeneratedPlanet {
            heightmap,
            biomes,
            texture,
        } = Self::generate(config)?;
        let group = self.assembler.assemble(config, texture, registry)?;
        Ok((SurfaceMaps { heightmap, biomes }, self.current.insert(group)))
    }

    // Drops the current group, if any
    pub fn clear(&mut self, registry: &mut ResourceRegistry) {
        if let Some(old) = self.current.take() {
            old.dispose(registry);
        }
    }
}
