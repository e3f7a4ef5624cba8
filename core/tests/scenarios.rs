use std::f32::consts::TAU;

use starforge_core::colorizer::water_color;
use starforge_core::config::{BiomePalette, FeatureWeights};
use starforge_core::utils::Rgb8;
use starforge_core::{
    BiomeDefinition, FrameScheduler, ManualClock, PlanetAssembler, PlanetConfig, PlanetGenerator,
    PlanetType, ResourceRegistry,
};

fn small(planet_type: PlanetType, seed: u64) -> PlanetConfig {
    PlanetConfig {
        width: 64,
        height: 32,
        ..PlanetConfig::preset(planet_type, seed)
    }
}

#[test]
fn heightmap_bounded_for_every_preset() {
    for (i, t) in PlanetType::ALL.into_iter().enumerate() {
        let planet = PlanetGenerator::generate(&small(t, i as u64 * 31)).unwrap();
        let (lo, hi) = planet.heightmap.min_max();
        assert!(lo >= -1.0 && hi <= 1.0, "{t:?}: [{lo}, {hi}]");
    }
}

#[test]
fn identical_config_gives_identical_textures() {
    let cfg = small(PlanetType::Volcanic, 1234);
    let a = PlanetGenerator::generate(&cfg).unwrap();
    let b = PlanetGenerator::generate(&cfg.clone()).unwrap();
    assert_eq!(a.texture.diffuse.as_raw(), b.texture.diffuse.as_raw());
    assert_eq!(a.texture.normal.as_raw(), b.texture.normal.as_raw());
}

#[test]
fn ocean_cells_always_render_water() {
    let cfg = small(PlanetType::Ocean, 77);
    let planet = PlanetGenerator::generate(&cfg).unwrap();
    let mut ocean_cells = 0;

    for y in 0..cfg.height {
        for x in 0..cfg.width {
            let e = planet.heightmap.get(x, y);
            let biome = &cfg.biomes[planet.biomes.index(x, y)];
            if e < cfg.ocean_level && biome.features.water > 0.5 {
                ocean_cells += 1;
                let px = planet.texture.diffuse.get_pixel(x, y).0;
                assert_eq!(px, water_color(biome, e, cfg.ocean_level).0);
            }
        }
    }
    assert!(ocean_cells > 0, "ocean preset produced no open water");
}

#[test]
fn single_ocean_biome_renders_only_water() {
    let water = Rgb8::new(30, 90, 180);
    let ocean = BiomeDefinition {
        name: "Ocean".into(),
        temperature: 15.0,
        humidity: 0.9,
        elevation: -0.3,
        features: FeatureWeights {
            water: 1.0,
            ..Default::default()
        },
        colors: BiomePalette {
            base: water,
            accent: water,
            water,
            vegetation: Rgb8::new(40, 110, 60),
            rock: Rgb8::new(90, 90, 100),
        },
    };
    let cfg = PlanetConfig {
        radius: 3.0,
        ocean_level: 0.3,
        biomes: vec![ocean],
        ..small(PlanetType::Ocean, 5)
    };

    let planet = PlanetGenerator::generate(&cfg).unwrap();
    for p in planet.texture.diffuse.pixels() {
        let d = Rgb8(p.0).distance(water);
        assert!(d < 32.0, "pixel {:?} is {d} away from the water color", p.0);
    }
}

#[test]
fn moon_count_zero_and_three() {
    let mut reg = ResourceRegistry::new();
    let mut generator = PlanetGenerator::default();

    let none = PlanetConfig {
        moon_count: 0,
        ..small(PlanetType::Terran, 1)
    };
    let (_, group) = generator.regenerate(&none, &mut reg).unwrap();
    assert!(group.moons.is_empty());

    let three = PlanetConfig {
        moon_count: 3,
        ..none
    };
    let (_, group) = generator.regenerate(&three, &mut reg).unwrap();
    assert_eq!(group.moons.len(), 3);
    for (i, moon) in group.moons.iter().enumerate() {
        let expected = TAU * i as f32 / 3.0;
        assert!((moon.angle - expected).abs() < 1e-5, "moon {i} at {}", moon.angle);
    }
}

#[test]
fn dispose_releases_every_resource() {
    let mut reg = ResourceRegistry::new();
    let cfg = PlanetConfig {
        has_rings: true,
        has_atmosphere: true,
        cloud_cover: 0.4,
        moon_count: 2,
        ..small(PlanetType::Terran, 8)
    };
    let planet = PlanetGenerator::generate(&cfg).unwrap();
    let group = PlanetAssembler::default()
        .assemble(&cfg, planet.texture, &mut reg)
        .unwrap();

    let handles = group.handles();
    assert!(handles.iter().all(|&h| reg.ref_count(h) > 0));
    assert!(reg.texture_bytes() > 0);

    group.dispose(&mut reg);
    for h in handles {
        assert_eq!(reg.ref_count(h), 0);
    }
    assert_eq!(reg.live_count(), 0);
    assert_eq!(reg.texture_bytes(), 0);
}

#[test]
fn scheduler_drives_group_updates() {
    let mut reg = ResourceRegistry::new();
    let cfg = PlanetConfig {
        moon_count: 1,
        ..small(PlanetType::Ice, 3)
    };
    let planet = PlanetGenerator::generate(&cfg).unwrap();
    let mut group = PlanetAssembler::default()
        .assemble(&cfg, planet.texture, &mut reg)
        .unwrap();
    let start = group.moons[0].angle;

    {
        let mut clock = ManualClock::default();
        for _ in 0..4 {
            clock.push(0.25);
        }
        let mut sched = FrameScheduler::new(clock);
        sched.subscribe(|dt: f32| group.update(dt, &mut reg));
        assert_eq!(sched.run(10), 4);
    }

    let moved = group.moons[0].angle - start;
    let expected = group.moons[0].angular_speed();
    assert!((moved - expected).abs() < 1e-5);
    assert!((group.cloud_time() - 1.0).abs() < 1e-6);
}
