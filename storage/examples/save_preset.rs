use starforge_core::{GeneratorConfig, PlanetConfig, PlanetGenerator, PlanetType};
use starforge_storage::models::PresetDoc;
use starforge_storage::{PresetStore, export_json};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = PlanetConfig {
        moon_count: 2,
        has_rings: true,
        ..PlanetConfig::preset(PlanetType::Desert, 2025)
    };
    // Make sure it generates before storing it
    let planet = PlanetGenerator::generate(&config)?;
    println!(
        "generated {}x{} desert planet",
        planet.texture.diffuse.width(),
        planet.texture.diffuse.height()
    );

    let preset = PresetDoc::new("desert-2025", GeneratorConfig::Planet(config));
    println!("{}", export_json(&preset)?);

    // MongoDB must be running
    let store = PresetStore::init("mongodb://localhost:27017", "starforge", "presets").await?;
    store.save(&preset).await?;
    println!("stored presets: {:?}", store.list_names().await?);
    Ok(())
}
