use crate::black_hole::{GeneratedBlackHole, generate_black_hole};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::galaxy::{GeneratedGalaxy, generate_galaxy};
use crate::pipeline::{GeneratedPlanet, PlanetGenerator};
use crate::star::{GeneratedStar, generate_star};

// Output of whichever generator a GeneratorConfig selects
#[derive(Debug, Clone)]
pub enum GeneratedBody {
    Planet(GeneratedPlanet),
    Star(GeneratedStar),
    Galaxy(GeneratedGalaxy),
    BlackHole(GeneratedBlackHole),
}

pub fn generate_any(config: &GeneratorConfig) -> Result<GeneratedBody> {
    Ok(match config {
        GeneratorConfig::Planet(c) => GeneratedBody::Planet(PlanetGenerator::generate(c)?),
        GeneratorConfig::Star(c) => GeneratedBody::Star(generate_star(c)?),
        GeneratorConfig::Galaxy(c) => GeneratedBody::Galaxy(generate_galaxy(c)?),
        GeneratorConfig::BlackHole(c) => GeneratedBody::BlackHole(generate_black_hole(c)?),
    })
}
