// core holds the noise, the planet surface pipeline, the sibling generators
// (stars, galaxies, black holes) and the renderer-agnostic scene graph
pub mod assembler;
pub mod biome;
pub mod black_hole;
pub mod body;
pub mod clouds;
pub mod colorizer;
pub mod config;
pub mod domain_warp;
pub mod error;
pub mod galaxy;
pub mod heightmap;
pub mod normal_map;
pub mod perlin3;
pub mod pipeline;
pub mod scene;
pub mod shaders;
pub mod star;
pub mod texture;
pub mod ticker;
pub mod utils;

pub use assembler::{Moon, PlanetAssembler, PlanetGroup};
pub use biome::{BiomeClassifier, BiomeMap};
pub use body::{GeneratedBody, generate_any};
pub use colorizer::SurfaceColorizer;
pub use config::{BiomeDefinition, GeneratorConfig, PlanetConfig, PlanetType};
pub use domain_warp::DomainWarp3D;
pub use error::{GenerationError, Result};
pub use heightmap::{HeightmapField, HeightmapGenerator};
pub use normal_map::NormalMapSynthesizer;
pub use perlin3::Perlin3D;
pub use pipeline::{GeneratedPlanet, PlanetGenerator, SurfaceMaps};
pub use scene::{Handle, ResourceRegistry};
pub use shaders::ShaderLibrary;
pub use texture::GeneratedTexture;
pub use ticker::{FixedStepClock, FrameScheduler, ManualClock, TickSource};

// Coherent noise sampled in 3D.
// 2D lookups read the z = 0 slice.
pub trait NoiseGenerator {
    fn get3(&self, x: f64, y: f64, z: f64) -> f64;

    fn get2(&self, x: f64, y: f64) -> f64 {
        self.get3(x, y, 0.0)
    }
}
