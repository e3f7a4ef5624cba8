use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::NoiseGenerator;

// 3D Perlin noise with fBm octaves
// Planet surfaces sample it on the unit sphere so textures wrap in longitude
#[derive(Debug, Clone)]
pub struct Perlin3D {
    frequency: f64,   // base "zoom level" of the pattern
    persistence: f64, // amplitude scaling per octave
    octaves: usize,
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin3D {
    pub fn new(seed: u64, frequency: f64, persistence: f64, octaves: usize) -> Self {
        // Shuffle 0..256 with a seeded RNG, then duplicate into 512 entries
        // so corner lookups never need a modulo
        let mut p: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed ^ 0xAABB_CCDD_EEFF_1122);
        p.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Self {
            frequency,
            persistence,
            octaves: octaves.max(1),
            perm,
        }
    }

    // Sums `shape(noise)` over the octaves, doubling frequency each time,
    // divided by the total amplitude
    fn accumulate(&self, x: f64, y: f64, z: f64, shape: impl Fn(f64) -> f64) -> f64 {
        let (total, norm, _, _) = (0..self.octaves).fold(
            (0.0, 0.0, 1.0, self.frequency),
            |(total, norm, amp, f), _| {
                let n = self.noise(x * f, y * f, z * f);
                (total + shape(n) * amp, norm + amp, amp * self.persistence, f * 2.0)
            },
        );
        total / norm
    }

    fn corner(&self, x: usize, y: usize, z: usize) -> [f64; 3] {
        let p = &self.perm;
        GRADIENTS[(p[p[p[x] as usize + y] as usize + z] & 0xF) as usize]
    }

    // Raw single-octave noise, roughly in [-1, 1]
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let cell = [x.floor(), y.floor(), z.floor()];
        let [xi, yi, zi] = cell.map(|c| (c as i64 & 255) as usize);
        let [fx, fy, fz] = [x - cell[0], y - cell[1], z - cell[2]];

        // Dot product of the corner gradient with the offset to that corner
        let dot = |dx: usize, dy: usize, dz: usize| {
            let g = self.corner(xi + dx, yi + dy, zi + dz);
            g[0] * (fx - dx as f64) + g[1] * (fy - dy as f64) + g[2] * (fz - dz as f64)
        };
        let [u, v, w] = [fade(fx), fade(fy), fade(fz)];

        let near = lerp(
            lerp(dot(0, 0, 0), dot(1, 0, 0), u),
            lerp(dot(0, 1, 0), dot(1, 1, 0), u),
            v,
        );
        let far = lerp(
            lerp(dot(0, 0, 1), dot(1, 0, 1), u),
            lerp(dot(0, 1, 1), dot(1, 1, 1), u),
            v,
        );
        lerp(near, far, w).clamp(-1.0, 1.0)
    }

    // Ridged multifractal: sharp crests where the raw noise crosses zero.
    // Normalized to [0, 1].
    pub fn ridge(&self, x: f64, y: f64, z: f64) -> f64 {
        self.accumulate(x, y, z, |n| (1.0 - n.abs()).powi(2))
            .clamp(0.0, 1.0)
    }
}

// The 12 cube-edge directions, padded to 16 so a 4-bit hash indexes it
const GRADIENTS: [[f64; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [0.0, -1.0, -1.0],
];

// 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

impl NoiseGenerator for Perlin3D {
    fn get3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.accumulate(x, y, z, |n| n)
    }
}

#[cfg(test)]
mod tests {
    use crate::NoiseGenerator;

    use super::Perlin3D;

    #[test]
    fn perlin3_determinism() {
        let p1 = Perlin3D::new(2025, 0.02, 0.5, 3);
        let p2 = Perlin3D::new(2025, 0.02, 0.5, 3);
        let a = p1.get3(1.23, 4.56, 7.89);
        let b = p2.get3(1.23, 4.56, 7.89);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn perlin3_seed_changes_output() {
        let p1 = Perlin3D::new(1, 1.0, 0.5, 4);
        let p2 = Perlin3D::new(2, 1.0, 0.5, 4);
        let differs = (0..32).any(|i| {
            let t = i as f64 * 0.37;
            (p1.get3(t, -t, 0.5 * t) - p2.get3(t, -t, 0.5 * t)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn perlin3_range() {
        let p = Perlin3D::new(0, 0.1, 0.5, 5);
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (1.5, -2.5, 3.5), (100.1, 200.2, -50.3)] {
            let v = p.get3(x, y, z);
            assert!((-1.0 - 1e-6..=1.0 + 1e-6).contains(&v));
        }
    }

    #[test]
    fn ridge_is_normalized() {
        let p = Perlin3D::new(9, 2.0, 0.5, 6);
        for i in 0..200 {
            let t = i as f64 * 0.113;
            let r = p.ridge(t.sin(), t.cos(), t * 0.25);
            assert!((0.0..=1.0).contains(&r), "ridge {} out of range", r);
        }
    }

    #[test]
    fn get2_is_z_zero_slice() {
        let p = Perlin3D::new(5, 1.0, 0.5, 2);
        assert_eq!(p.get2(0.4, 0.7), p.get3(0.4, 0.7, 0.0));
    }
}
