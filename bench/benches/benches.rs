use starforge_core::{
    BiomeClassifier, DomainWarp3D, HeightmapGenerator, NoiseGenerator, NormalMapSynthesizer,
    Perlin3D, PlanetAssembler, PlanetConfig, PlanetGenerator, PlanetType, ResourceRegistry,
    SurfaceColorizer,
    galaxy::{GalaxyConfig, generate_galaxy},
    utils::{cell_lon_lat, sphere_point},
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 128;
const SEED: u64 = 2025;

fn config() -> PlanetConfig {
    PlanetConfig {
        width: WIDTH,
        height: HEIGHT,
        moon_count: 2,
        has_rings: true,
        ..PlanetConfig::preset(PlanetType::Terran, SEED)
    }
}

fn bench_sphere_noise(c: &mut Criterion) {
    c.bench_function("Perlin3D fBm over sphere grid", |b| {
        let perlin = Perlin3D::new(SEED, 2.0, 0.5, 6);
        b.iter(|| {
            let mut acc = 0.0;
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let (lon, lat) = cell_lon_lat(x, y, WIDTH, HEIGHT);
                    let p = sphere_point(lon, lat);
                    acc += perlin.get3(p[0], p[1], p[2]);
                }
            }
            black_box(acc)
        })
    });

    c.bench_function("Perlin3D + Domain Warp over sphere grid", |b| {
        let base = Perlin3D::new(SEED, 2.0, 0.5, 4);
        let warp = Perlin3D::new(SEED.wrapping_add(42), 2.0, 0.5, 4);
        let warped = DomainWarp3D {
            base: &base,
            warp: &warp,
            warp_strength: 0.5,
        };
        b.iter(|| {
            let mut acc = 0.0;
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let (lon, lat) = cell_lon_lat(x, y, WIDTH, HEIGHT);
                    let p = sphere_point(lon, lat);
                    acc += warped.sample(p[0], p[1], p[2]);
                }
            }
            black_box(acc)
        })
    });
}

fn bench_surface_stages(c: &mut Criterion) {
    let cfg = config();

    c.bench_function("heightmap generate", |b| {
        let generator = HeightmapGenerator::new(&cfg).expect("valid config");
        b.iter(|| black_box(generator.generate()))
    });

    let heightmap = HeightmapGenerator::new(&cfg)
        .expect("valid config")
        .generate();

    c.bench_function("biome classify", |b| {
        let classifier = BiomeClassifier::new(&cfg).expect("valid config");
        b.iter(|| black_box(classifier.classify(&heightmap)))
    });

    let biomes = BiomeClassifier::new(&cfg)
        .expect("valid config")
        .classify(&heightmap);

    c.bench_function("surface colorize", |b| {
        let colorizer = SurfaceColorizer::new(&cfg);
        b.iter(|| black_box(colorizer.colorize(&heightmap, &biomes).expect("colorize")))
    });

    c.bench_function("normal map synthesize", |b| {
        let synth = NormalMapSynthesizer::new(&cfg).expect("valid config");
        b.iter(|| black_box(synth.generate()))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let cfg = config();

    c.bench_function("planet generate (all stages)", |b| {
        b.iter(|| black_box(PlanetGenerator::generate(&cfg).expect("generate")))
    });

    c.bench_function("planet assemble + dispose", |b| {
        let planet = PlanetGenerator::generate(&cfg).expect("generate");
        let assembler = PlanetAssembler::default();
        b.iter(|| {
            let mut registry = ResourceRegistry::new();
            let group = assembler
                .assemble(&cfg, planet.texture.clone(), &mut registry)
                .expect("assemble");
            group.dispose(&mut registry);
            black_box(registry.live_count())
        })
    });
}

fn bench_galaxy(c: &mut Criterion) {
    c.bench_function("galaxy 20k particles", |b| {
        let cfg = GalaxyConfig::default();
        b.iter(|| black_box(generate_galaxy(&cfg).expect("galaxy")))
    });
}

criterion_group!(
    planet_benchmarks,
    bench_sphere_noise,
    bench_surface_stages,
    bench_full_pipeline,
    bench_galaxy
);
criterion_main!(planet_benchmarks);
