// Wraps generated textures into a renderable planet group.
// The group owns one surface sphere and optionally an atmosphere shell, a
// cloud shell, a ring, and any number of moons on circular orbits. Each moon
// advances `MOON_ORBIT_SPEED / distance` radians per second, so inner moons
// move faster.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use image::RgbImage;
use log::{debug, warn};

use crate::clouds::bake_cloud_mask;
use crate::config::PlanetConfig;
use crate::error::{GenerationError, Result};
use crate::scene::{Geometry, Handle, Material, Mesh, ResourceRegistry, UniformValue};
use crate::shaders::ShaderLibrary;
use crate::texture::{GeneratedTexture, TextureData, save_surface_png};
use crate::utils::Rgb8;

pub const ATMOSPHERE_SCALE: f32 = 1.05;
pub const CLOUD_SCALE: f32 = 1.02;
pub const RING_INNER_SCALE: f32 = 1.4;
pub const RING_OUTER_SCALE: f32 = 2.3;
pub const MOON_ORBIT_SPEED: f32 = 0.5;
pub const CLOUD_DRIFT: f32 = 0.01;

const SURFACE_SEGMENTS: (u32, u32) = (64, 32);
const SHELL_SEGMENTS: (u32, u32) = (48, 24);
const MOON_SEGMENTS: (u32, u32) = (16, 8);
const MOON_COLORS: [Rgb8; 3] = [
    Rgb8::new(180, 176, 170),
    Rgb8::new(150, 130, 110),
    Rgb8::new(200, 205, 215),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Moon {
    pub mesh: Mesh,
    pub distance: f32,
    pub angle: f32,
    pub size: f32,
}

impl Moon {
    // Radians per second
    pub fn angular_speed(&self) -> f32 {
        MOON_ORBIT_SPEED / self.distance
    }

    pub fn position(&self) -> Vec3 {
        let (s, c) = self.angle.sin_cos();
        Vec3::new(c * self.distance, 0.0, s * self.distance)
    }

    fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + dt * self.angular_speed()).rem_euclid(TAU);
        self.mesh.transform.translation = self.position();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetGroup {
    pub surface: Mesh,
    pub atmosphere: Option<Mesh>,
    pub clouds: Option<Mesh>,
    pub ring: Option<Mesh>,
    pub moons: Vec<Moon>,
    pub rotation: f32,
    rotation_speed: f32,
    axial_tilt: f32,
    cloud_time: f32,
}

impl PlanetGroup {
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        std::iter::once(&self.surface)
            .chain(self.atmosphere.iter())
            .chain(self.clouds.iter())
            .chain(self.ring.iter())
            .chain(self.moons.iter().map(|m| &m.mesh))
    }

    // Every handle the group holds a reference to (shared ones repeat)
    pub fn handles(&self) -> Vec<Handle> {
        self.meshes()
            .flat_map(|m| [m.geometry, m.material])
            .collect()
    }

    pub fn cloud_time(&self) -> f32 {
        self.cloud_time
    }

    // The surface map bound to `slot` ("diffuse" or "normal"). The registry
    // holds the only copy once the group is assembled.
    pub fn surface_texture<'r>(
        &self,
        slot: &str,
        registry: &'r ResourceRegistry,
    ) -> Option<&'r RgbImage> {
        let material = registry.material(self.surface.material)?;
        let (_, handle) = material.textures.iter().find(|(s, _)| *s == slot)?;
        match registry.texture(*handle)? {
            TextureData::Rgb(img) => Some(img),
            TextureData::Gray(_) => None,
        }
    }

    pub fn save_surface_png(
        &self,
        registry: &ResourceRegistry,
        dir: &Path,
        name: &str,
    ) -> Result<(PathBuf, PathBuf)> {
        let map = |slot: &str| {
            self.surface_texture(slot, registry)
                .ok_or_else(|| GenerationError::MissingResource(format!("surface {slot} map")))
        };
        save_surface_png(map("diffuse")?, map("normal")?, dir, name)
    }

    // One frame: spin the surface and cloud shells, advance moons, tick the cloud shader.
    pub fn update(&mut self, dt: f32, registry: &mut ResourceRegistry) {
        self.rotation = (self.rotation + dt * self.rotation_speed).rem_euclid(TAU);
        let spin = Quat::from_rotation_z(self.axial_tilt) * Quat::from_rotation_y(self.rotation);
        self.surface.transform.rotation = spin;

        self.cloud_time += dt;
        if let Some(clouds) = &mut self.clouds {
            clouds.transform.rotation = spin;
            if let Some(m) = registry.material_mut(clouds.material) {
                m.set_uniform("time", UniformValue::Float(self.cloud_time));
            }
        }

        for moon in &mut self.moons {
            moon.advance(dt);
        }
    }

    // Releases every geometry, material and texture this group owns
    pub fn dispose(self, registry: &mut ResourceRegistry) {
        let count = self.meshes().count();
        for mesh in self.meshes() {
            mesh.release(registry);
        }
        debug!("disposed planet group ({count} meshes)");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanetAssembler {
    shaders: ShaderLibrary,
}

impl PlanetAssembler {
    pub fn new(shaders: ShaderLibrary) -> Self {
        Self { shaders }
    }

    pub fn assemble(
        &self,
        config: &PlanetConfig,
        texture: GeneratedTexture,
        registry: &mut ResourceRegistry,
    ) -> Result<PlanetGroup> {
        let radius = config.radius;

        // Surface
        let diffuse = registry.add_texture(TextureData::Rgb(texture.diffuse));
        let normal = registry.add_texture(TextureData::Rgb(texture.normal));
        let surface_mat = Material::new(self.shaders.resolve("surface")?)
            .with_texture("diffuse", diffuse)
            .with_texture("normal", normal);
        let surface = Mesh::new(
            "surface",
            registry.add_geometry(Geometry::uv_sphere(radius, SURFACE_SEGMENTS.0, SURFACE_SEGMENTS.1)),
            registry.add_material(surface_mat),
        );

        let atmosphere = if config.has_atmosphere {
            let mat = Material::new(self.shaders.resolve("atmosphere")?)
                .with_uniform("color", UniformValue::Vec3(unit_rgb(config.atmosphere_color)))
                .with_uniform("intensity", UniformValue::Float(1.0))
                .with_uniform("power", UniformValue::Float(3.0))
                .transparent();
            Some(self.shell("atmosphere", radius * ATMOSPHERE_SCALE, mat, registry))
        } else {
            None
        };

        let clouds = if config.cloud_cover > 0.0 {
            let mask = registry.add_texture(TextureData::Gray(bake_cloud_mask(config)));
            let mat = Material::new(self.shaders.resolve("clouds")?)
                .with_texture("mask", mask)
                .with_uniform("time", UniformValue::Float(0.0))
                .with_uniform("cover", UniformValue::Float(config.cloud_cover))
                .with_uniform("drift", UniformValue::Float(CLOUD_DRIFT))
                .transparent();
            Some(self.shell("clouds", radius * CLOUD_SCALE, mat, registry))
        } else {
            None
        };

        let ring = if config.has_rings {
            let mat = Material::new(self.shaders.resolve("ring")?)
                .with_uniform("color", UniformValue::Vec3([0.82, 0.76, 0.64]))
                .with_uniform("opacity", UniformValue::Float(0.7))
                .transparent();
            let mut mesh = Mesh::new(
                "ring",
                registry.add_geometry(Geometry::ring(
                    radius * RING_INNER_SCALE,
                    radius * RING_OUTER_SCALE,
                    SURFACE_SEGMENTS.0,
                )),
                registry.add_material(mat),
            );
            mesh.transform.rotation = Quat::from_rotation_z(config.axial_tilt);
            Some(mesh)
        } else {
            None
        };

        let moons = self.moons(config, registry)?;

        let mut group = PlanetGroup {
            surface,
            atmosphere,
            clouds,
            ring,
            moons,
            rotation: 0.0,
            rotation_speed: config.rotation_speed,
            axial_tilt: config.axial_tilt,
            cloud_time: 0.0,
        };
        // Settle transforms without advancing anything
        group.update(0.0, registry);

        debug!(
            "assembled planet group: {} meshes, {} live resources",
            group.meshes().count(),
            registry.live_count()
        );
        Ok(group)
    }

    fn shell(
        &self,
        name: &str,
        radius: f32,
        material: Material,
        registry: &mut ResourceRegistry,
    ) -> Mesh {
        Mesh::new(
            name,
            registry.add_geometry(Geometry::uv_sphere(radius, SHELL_SEGMENTS.0, SHELL_SEGMENTS.1)),
            registry.add_material(material),
        )
    }

    // Moons share one unit sphere; each mesh holds its own reference to it
    fn moons(&self, config: &PlanetConfig, registry: &mut ResourceRegistry) -> Result<Vec<Moon>> {
        if config.moon_count < 0 {
            warn!(
                "negative moon count {} treated as zero",
                config.moon_count
            );
        }
        let n = config.effective_moon_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let shader = self.shaders.resolve("moon")?;
        let sphere = registry.add_geometry(Geometry::uv_sphere(1.0, MOON_SEGMENTS.0, MOON_SEGMENTS.1));
        let mut moons = Vec::with_capacity(n);
        for i in 0..n {
            if i > 0 {
                registry.retain(sphere);
            }
            let color = MOON_COLORS[i % MOON_COLORS.len()];
            let material = registry.add_material(
                Material::new(shader).with_uniform("color", UniformValue::Vec3(unit_rgb(color))),
            );
            let size = config.radius * (0.12 + 0.04 * (i % 3) as f32);
            let mut mesh = Mesh::new(format!("moon_{i}"), sphere, material);
            mesh.transform.scale = size;

            let mut moon = Moon {
                mesh,
                distance: config.radius * (2.5 + 0.8 * i as f32),
                angle: TAU * i as f32 / n as f32,
                size,
            };
            moon.advance(0.0);
            moons.push(moon);
        }
        Ok(moons)
    }
}

fn unit_rgb(c: Rgb8) -> [f32; 3] {
    let [r, g, b] = c.0;
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture() -> GeneratedTexture {
        GeneratedTexture {
            diffuse: RgbImage::new(8, 4),
            normal: RgbImage::new(8, 4),
        }
    }

    fn config(moon_count: i32) -> PlanetConfig {
        PlanetConfig {
            width: 8,
            height: 4,
            moon_count,
            ..PlanetConfig::default()
        }
    }

    #[test]
    fn surface_maps_read_back_from_registry() {
        let mut reg = ResourceRegistry::new();
        let tex = GeneratedTexture {
            diffuse: RgbImage::from_pixel(8, 4, image::Rgb([1, 2, 3])),
            normal: RgbImage::from_pixel(8, 4, image::Rgb([128, 128, 255])),
        };
        let g = PlanetAssembler::default()
            .assemble(&config(0), tex.clone(), &mut reg)
            .unwrap();
        assert_eq!(g.surface_texture("diffuse", &reg), Some(&tex.diffuse));
        assert_eq!(g.surface_texture("normal", &reg), Some(&tex.normal));
        assert_eq!(g.surface_texture("mask", &reg), None);

        let surface = g.surface.clone();
        g.dispose(&mut reg);
        let orphan = PlanetGroup {
            surface,
            atmosphere: None,
            clouds: None,
            ring: None,
            moons: Vec::new(),
            rotation: 0.0,
            rotation_speed: 0.0,
            axial_tilt: 0.0,
            cloud_time: 0.0,
        };
        assert!(matches!(
            orphan.save_surface_png(&reg, &std::env::temp_dir(), "gone"),
            Err(GenerationError::MissingResource(_))
        ));
    }

    #[test]
    fn optional_shells_follow_config() {
        let mut reg = ResourceRegistry::new();
        let bare = PlanetConfig {
            has_atmosphere: false,
            has_rings: false,
            cloud_cover: 0.0,
            ..config(0)
        };
        let g = PlanetAssembler::default().assemble(&bare, texture(), &mut reg).unwrap();
        assert!(g.atmosphere.is_none() && g.clouds.is_none() && g.ring.is_none());
        assert_eq!(g.meshes().count(), 1);

        let full = PlanetConfig {
            has_atmosphere: true,
            has_rings: true,
            cloud_cover: 0.5,
            ..config(2)
        };
        let g = PlanetAssembler::default().assemble(&full, texture(), &mut reg).unwrap();
        assert!(g.atmosphere.is_some() && g.clouds.is_some() && g.ring.is_some());
        assert_eq!(g.meshes().count(), 6);
    }

    #[test]
    fn negative_moon_count_builds_none() {
        let mut reg = ResourceRegistry::new();
        let g = PlanetAssembler::default()
            .assemble(&config(-2), texture(), &mut reg)
            .unwrap();
        assert!(g.moons.is_empty());
    }

    #[test]
    fn moons_share_geometry() {
        let mut reg = ResourceRegistry::new();
        let g = PlanetAssembler::default()
            .assemble(&config(4), texture(), &mut reg)
            .unwrap();
        let sphere = g.moons[0].mesh.geometry;
        assert!(g.moons.iter().all(|m| m.mesh.geometry == sphere));
        assert_eq!(reg.ref_count(sphere), 4);
    }

    #[test]
    fn inner_moons_orbit_faster() {
        let mut reg = ResourceRegistry::new();
        let mut g = PlanetAssembler::default()
            .assemble(&config(2), texture(), &mut reg)
            .unwrap();
        let before: Vec<f32> = g.moons.iter().map(|m| m.angle).collect();
        g.update(1.0, &mut reg);
        let d0 = g.moons[0].angle - before[0];
        let d1 = g.moons[1].angle - before[1];
        assert!(d0 > d1 && d1 > 0.0);
        assert!((d0 - MOON_ORBIT_SPEED / g.moons[0].distance).abs() < 1e-6);
    }

    #[test]
    fn update_ticks_cloud_time_uniform() {
        let mut reg = ResourceRegistry::new();
        let mut g = PlanetAssembler::default()
            .assemble(&config(0), texture(), &mut reg)
            .unwrap();
        g.update(0.25, &mut reg);
        g.update(0.25, &mut reg);
        let clouds = g.clouds.as_ref().unwrap();
        assert_eq!(
            reg.material(clouds.material).unwrap().uniform("time"),
            Some(UniformValue::Float(0.5))
        );
        assert!((g.rotation - 0.5 * 0.1).abs() < 1e-6);
    }
}
