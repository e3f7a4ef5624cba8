use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use log::info;

use crate::error::Result;

// Diffuse + normal pair produced once per generation pass
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTexture {
    pub diffuse: RgbImage,
    pub normal: RgbImage,
}

impl GeneratedTexture {
    pub fn dimensions(&self) -> (u32, u32) {
        self.diffuse.dimensions()
    }

    pub fn save_png(&self, dir: &Path, name: &str) -> Result<(PathBuf, PathBuf)> {
        save_surface_png(&self.diffuse, &self.normal, dir, name)
    }
}

// Writes `<name>_diffuse.png` and `<name>_normal.png` into `dir`
pub fn save_surface_png(
    diffuse: &RgbImage,
    normal: &RgbImage,
    dir: &Path,
    name: &str,
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let diffuse_path = dir.join(format!("{name}_diffuse.png"));
    let normal_path = dir.join(format!("{name}_normal.png"));
    diffuse.save(&diffuse_path)?;
    normal.save(&normal_path)?;
    info!("saved {} and {}", diffuse_path.display(), normal_path.display());
    Ok((diffuse_path, normal_path))
}

// Any pixel buffer the scene graph can own
#[derive(Debug, Clone, PartialEq)]
pub enum TextureData {
    Rgb(RgbImage),
    Gray(GrayImage),
}

impl TextureData {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            TextureData::Rgb(img) => img.dimensions(),
            TextureData::Gray(img) => img.dimensions(),
        }
    }

    pub fn byte_len(&self) -> usize {
        match self {
            TextureData::Rgb(img) => img.as_raw().len(),
            TextureData::Gray(img) => img.as_raw().len(),
        }
    }
}
