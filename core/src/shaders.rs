use crate::error::{GenerationError, Result};

// WGSL sources shipped with the crate, looked up by asset name
const BUILTIN: &[(&str, &str)] = &[
    ("surface", include_str!("../shaders/surface.wgsl")),
    ("atmosphere", include_str!("../shaders/atmosphere.wgsl")),
    ("clouds", include_str!("../shaders/clouds.wgsl")),
    ("ring", include_str!("../shaders/ring.wgsl")),
    ("moon", include_str!("../shaders/moon.wgsl")),
    ("star", include_str!("../shaders/star.wgsl")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(&'static str);

impl ShaderId {
    pub fn name(self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderLibrary;

impl ShaderLibrary {
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }

    pub fn resolve(&self, name: &str) -> Result<ShaderId> {
        BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, _)| ShaderId(*n))
            .ok_or_else(|| GenerationError::UnknownShader(name.to_string()))
    }

    pub fn source(&self, id: ShaderId) -> &'static str {
        BUILTIN
            .iter()
            .find(|(n, _)| *n == id.0)
            .map(|(_, src)| *src)
            .unwrap_or_default()
    }
}
