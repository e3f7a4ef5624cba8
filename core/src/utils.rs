use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

// sRGB triple, 0..=255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    // Scale every channel, e.g. 0.8 for a darker shade
    pub fn shade(self, factor: f32) -> Self {
        let [r, g, b] = self.0;
        Self([
            (r as f32 * factor).round().clamp(0.0, 255.0) as u8,
            (g as f32 * factor).round().clamp(0.0, 255.0) as u8,
            (b as f32 * factor).round().clamp(0.0, 255.0) as u8,
        ])
    }

    // Euclidean distance in RGB space
    pub fn distance(self, other: Rgb8) -> f32 {
        let d: f32 = self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let d = a as f32 - b as f32;
                d * d
            })
            .sum();
        d.sqrt()
    }
}

// Linearly interpolate between two colors, t clamped to [0, 1]
pub fn lerp_color(a: Rgb8, b: Rgb8, t: f32) -> Rgb8 {
    let t = t.clamp(0.0, 1.0);
    let ch = |i: usize| {
        let (x, y) = (a.0[i] as f32, b.0[i] as f32);
        (x + (y - x) * t).round() as u8
    };
    Rgb8([ch(0), ch(1), ch(2)])
}

// Longitude/latitude of the center of grid cell (x, y).
// Longitude spans [-PI, PI) left to right, latitude PI/2 (north) at the top row.
pub fn cell_lon_lat(x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
    let lon = TAU * (x as f64 + 0.5) / width as f64 - PI;
    let lat = FRAC_PI_2 - PI * (y as f64 + 0.5) / height as f64;
    (lon, lat)
}

// Unit-sphere point for a longitude/latitude pair (y up)
pub fn sphere_point(lon: f64, lat: f64) -> [f64; 3] {
    let (slat, clat) = lat.sin_cos();
    let (slon, clon) = lon.sin_cos();
    [clat * clon, slat, clat * slon]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        let a = Rgb8::new(0, 0, 0);
        let b = Rgb8::new(200, 100, 50);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Rgb8::new(100, 50, 25));
        // Out-of-range ratios never overshoot
        assert_eq!(lerp_color(a, b, 3.0), b);
    }

    #[test]
    fn sphere_points_are_unit_length() {
        for y in 0..8 {
            for x in 0..16 {
                let (lon, lat) = cell_lon_lat(x, y, 16, 8);
                let [px, py, pz] = sphere_point(lon, lat);
                let len = (px * px + py * py + pz * pz).sqrt();
                assert!((len - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn cells_sample_their_centers() {
        let (lon, lat) = cell_lon_lat(0, 0, 4, 2);
        assert!((lon - (-PI + TAU / 8.0)).abs() < 1e-12);
        assert!((lat - PI / 4.0).abs() < 1e-12);
        // Mirror cells sit symmetric about the equator and prime meridian
        let (lon_last, lat_last) = cell_lon_lat(3, 1, 4, 2);
        assert!((lon + lon_last).abs() < 1e-12);
        assert!((lat + lat_last).abs() < 1e-12);
    }

    #[test]
    fn top_row_is_north() {
        let (_, lat_top) = cell_lon_lat(0, 0, 4, 4);
        let (_, lat_bottom) = cell_lon_lat(0, 3, 4, 4);
        assert!(lat_top > 0.0 && lat_bottom < 0.0);
    }
}
