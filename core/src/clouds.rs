use image::{GrayImage, Luma};

use crate::config::PlanetConfig;
use crate::domain_warp::{DomainWarp3D, turbulence};
use crate::heightmap::smoothstep;
use crate::utils::{cell_lon_lat, sphere_point};
use crate::Perlin3D;

const CLOUD_SEED_OFFSET: u64 = 0xC10D_5;
const WARP_SEED_OFFSET: u64 = 0xC10D_6;
const CLOUD_OCTAVES: usize = 4;
const WARP_STRENGTH: f64 = 0.6;
// Width of the soft edge around each cloud
const EDGE: f64 = 0.08;

// Alpha mask for the cloud shell: warped turbulence thresholded by cover.
// A cover of 0 is fully clear, 1 fully overcast.
pub fn bake_cloud_mask(config: &PlanetConfig) -> GrayImage {
    let (width, height) = (config.width.max(1), config.height.max(1));
    let base = Perlin3D::new(config.seed.wrapping_add(CLOUD_SEED_OFFSET), 2.5, 0.5, 1);
    let warp = Perlin3D::new(config.seed.wrapping_add(WARP_SEED_OFFSET), 1.5, 0.5, 2);
    let warped = DomainWarp3D {
        base: &base,
        warp: &warp,
        warp_strength: WARP_STRENGTH,
    };
    let cover = config.cloud_cover.clamp(0.0, 1.0) as f64;
    // Turbulence rarely exceeds ~0.6, so map cover onto that span
    let threshold = 0.6 * (1.0 - cover);

    GrayImage::from_fn(width, height, |x, y| {
        if cover <= 0.0 {
            return Luma([0]);
        }
        let (lon, lat) = cell_lon_lat(x, y, width, height);
        let [px, py, pz] = sphere_point(lon, lat);
        let t = turbulence(&warped, px, py, pz, CLOUD_OCTAVES);
        let alpha = smoothstep(threshold - EDGE, threshold + EDGE, t);
        Luma([(alpha * 255.0).round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(img: &GrayImage) -> f64 {
        img.pixels().map(|p| p.0[0] as f64).sum::<f64>() / img.pixels().len() as f64
    }

    #[test]
    fn clear_sky_has_no_clouds() {
        let cfg = PlanetConfig {
            width: 16,
            height: 8,
            cloud_cover: 0.0,
            ..PlanetConfig::default()
        };
        assert!(bake_cloud_mask(&cfg).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn more_cover_means_more_clouds() {
        let thin = PlanetConfig {
            width: 32,
            height: 16,
            cloud_cover: 0.2,
            ..PlanetConfig::default()
        };
        let thick = PlanetConfig {
            cloud_cover: 0.9,
            ..thin.clone()
        };
        assert!(mean(&bake_cloud_mask(&thick)) > mean(&bake_cloud_mask(&thin)));
    }
}
