use starforge_core::galaxy::GalaxyConfig;
use starforge_core::star::StarConfig;
use starforge_core::{GeneratedBody, GeneratorConfig, PlanetConfig, PlanetType, generate_any};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let out = Path::new("output");
    std::fs::create_dir_all(out)?;

    let mut configs: Vec<(String, GeneratorConfig)> = PlanetType::ALL
        .into_iter()
        .map(|t| {
            let name = format!("{t:?}").to_lowercase();
            (name, GeneratorConfig::Planet(PlanetConfig::preset(t, 2025)))
        })
        .collect();
    configs.push(("sun".into(), GeneratorConfig::Star(StarConfig::default())));
    configs.push(("spiral".into(), GeneratorConfig::Galaxy(GalaxyConfig::default())));

    for (name, config) in &configs {
        match generate_any(config)? {
            GeneratedBody::Planet(planet) => {
                planet.texture.save_png(out, name)?;
                planet.heightmap.to_luma().save(out.join(format!("{name}_height.png")))?;
                if let GeneratorConfig::Planet(c) = config {
                    planet
                        .biomes
                        .to_preview(&c.biomes)
                        .save(out.join(format!("{name}_biomes.png")))?;
                }
            }
            GeneratedBody::Star(star) => {
                star.surface.save(out.join(format!("{name}_surface.png")))?;
                println!("{name}: color {:?}, luminosity {:.2}", star.color.0, star.luminosity);
            }
            GeneratedBody::Galaxy(galaxy) => {
                println!(
                    "{name}: {} particles, {} in the bulge",
                    galaxy.particles.len(),
                    galaxy.bulge_count()
                );
            }
            GeneratedBody::BlackHole(hole) => {
                println!("{name}: {} disk particles", hole.particles.len());
            }
        }
    }

    println!("Images written to {}", out.display());
    Ok(())
}
