// Renderer-agnostic scene resources.
// Geometry, materials and textures live in a `ResourceRegistry` behind
// reference-counted `Handle`s. A resource is dropped as soon as its count
// reaches zero. Freeing a material also releases the textures it references,
// so replacing a planet never leaks its pixel buffers.

use std::collections::{BTreeMap, HashMap};
use std::f32::consts::{PI, TAU};

use glam::{Mat4, Quat, Vec3};
use log::trace;

use crate::shaders::ShaderId;
use crate::texture::TextureData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    // Latitude/longitude sphere. `segments` around, `rings` pole to pole.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut g = Geometry::default();

        for r in 0..=rings {
            let v = r as f32 / rings as f32;
            let theta = v * PI;
            let (st, ct) = theta.sin_cos();
            for s in 0..=segments {
                let u = s as f32 / segments as f32;
                let phi = u * TAU;
                let (sp, cp) = phi.sin_cos();
                let n = [st * cp, ct, st * sp];
                g.positions.push([n[0] * radius, n[1] * radius, n[2] * radius]);
                g.normals.push(n);
                g.uvs.push([u, v]);
            }
        }

        let stride = segments + 1;
        for r in 0..rings {
            for s in 0..segments {
                let i0 = r * stride + s;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;
                g.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
        g
    }

    // Flat annulus in the XZ plane, normals up, u runs inner to outer edge
    pub fn ring(inner: f32, outer: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut g = Geometry::default();

        for s in 0..=segments {
            let a = s as f32 / segments as f32 * TAU;
            let (sa, ca) = a.sin_cos();
            for (u, r) in [(0.0, inner), (1.0, outer)] {
                g.positions.push([ca * r, 0.0, sa * r]);
                g.normals.push([0.0, 1.0, 0.0]);
                g.uvs.push([u, s as f32 / segments as f32]);
            }
        }
        for s in 0..segments {
            let i0 = s * 2;
            g.indices
                .extend_from_slice(&[i0, i0 + 1, i0 + 2, i0 + 1, i0 + 3, i0 + 2]);
        }
        g
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shader: ShaderId,
    // Owned references, released when the material is freed
    pub textures: Vec<(&'static str, Handle)>,
    pub uniforms: BTreeMap<&'static str, UniformValue>,
    pub transparent: bool,
}

impl Material {
    pub fn new(shader: ShaderId) -> Self {
        Self {
            shader,
            textures: Vec::new(),
            uniforms: BTreeMap::new(),
            transparent: false,
        }
    }

    pub fn with_texture(mut self, slot: &'static str, texture: Handle) -> Self {
        self.textures.push((slot, texture));
        self
    }

    pub fn with_uniform(mut self, name: &'static str, value: UniformValue) -> Self {
        self.uniforms.insert(name, value);
        self
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    pub fn set_uniform(&mut self, name: &'static str, value: UniformValue) {
        self.uniforms.insert(name, value);
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Geometry(Geometry),
    Material(Material),
    Texture(TextureData),
}

struct Slot {
    resource: Resource,
    refs: usize,
}

#[derive(Default)]
pub struct ResourceRegistry {
    next: u64,
    slots: HashMap<Handle, Slot>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // New resource with a single reference owned by the caller
    pub fn insert(&mut self, resource: Resource) -> Handle {
        let h = Handle(self.next);
        self.next += 1;
        self.slots.insert(h, Slot { resource, refs: 1 });
        h
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> Handle {
        self.insert(Resource::Geometry(geometry))
    }

    pub fn add_material(&mut self, material: Material) -> Handle {
        self.insert(Resource::Material(material))
    }

    pub fn add_texture(&mut self, texture: TextureData) -> Handle {
        self.insert(Resource::Texture(texture))
    }

    // Another owner for a live resource; false if it was already freed
    pub fn retain(&mut self, h: Handle) -> bool {
        match self.slots.get_mut(&h) {
            Some(slot) => {
                slot.refs += 1;
                true
            }
            None => false,
        }
    }

    // Drops one reference and frees the resource at zero.
    // Returns false for handles that are not live.
    pub fn release(&mut self, h: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(&h) else {
            return false;
        };
        slot.refs -= 1;
        if slot.refs > 0 {
            return true;
        }

        if let Some(Slot { resource, .. }) = self.slots.remove(&h) {
            trace!("freed resource {h:?}");
            if let Resource::Material(m) = resource {
                for (_, tex) in m.textures {
                    self.release(tex);
                }
            }
        }
        true
    }

    pub fn ref_count(&self, h: Handle) -> usize {
        self.slots.get(&h).map_or(0, |s| s.refs)
    }

    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, h: Handle) -> Option<&Resource> {
        self.slots.get(&h).map(|s| &s.resource)
    }

    pub fn geometry(&self, h: Handle) -> Option<&Geometry> {
        match self.get(h) {
            Some(Resource::Geometry(g)) => Some(g),
            _ => None,
        }
    }

    pub fn material(&self, h: Handle) -> Option<&Material> {
        match self.get(h) {
            Some(Resource::Material(m)) => Some(m),
            _ => None,
        }
    }

    pub fn material_mut(&mut self, h: Handle) -> Option<&mut Material> {
        match self.slots.get_mut(&h).map(|s| &mut s.resource) {
            Some(Resource::Material(m)) => Some(m),
            _ => None,
        }
    }

    pub fn texture(&self, h: Handle) -> Option<&TextureData> {
        match self.get(h) {
            Some(Resource::Texture(t)) => Some(t),
            _ => None,
        }
    }

    // Bytes held by live textures
    pub fn texture_bytes(&self) -> usize {
        self.slots
            .values()
            .filter_map(|s| match &s.resource {
                Resource::Texture(t) => Some(t.byte_len()),
                _ => None,
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Handle,
    pub material: Handle,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: Handle, material: Handle) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    // Gives back the references this mesh owns
    pub fn release(&self, registry: &mut ResourceRegistry) {
        registry.release(self.geometry);
        registry.release(self.material);
    }
}
