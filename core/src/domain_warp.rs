use crate::NoiseGenerator;

// Samples `base` at a point displaced by `warp`, used for swirling cloud bands
pub struct DomainWarp3D<'a> {
    pub base: &'a dyn NoiseGenerator,
    pub warp: &'a dyn NoiseGenerator,
    pub warp_strength: f64,
}

impl<'a> DomainWarp3D<'a> {
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        // Three decorrelated offsets so the displacement is not along one axis
        let dx = self.warp.get3(x, y, z);
        let dy = self.warp.get3(x + 5.2, y + 1.3, z + 7.7);
        let dz = self.warp.get3(x + 3.1, y + 9.4, z + 2.8);

        self.base.get3(
            x + dx * self.warp_strength,
            y + dy * self.warp_strength,
            z + dz * self.warp_strength,
        )
    }
}

impl NoiseGenerator for DomainWarp3D<'_> {
    fn get3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.sample(x, y, z)
    }
}

// Sum of absolute octaves, normalized to [0, 1]
pub fn turbulence(noise: &dyn NoiseGenerator, x: f64, y: f64, z: f64, octaves: usize) -> f64 {
    let mut amplitude = 1.0;
    let mut freq = 1.0;
    let mut total = 0.0;
    let mut max_amp = 0.0;

    for _ in 0..octaves.max(1) {
        total += noise.get3(x * freq, y * freq, z * freq).abs() * amplitude;
        max_amp += amplitude;
        amplitude *= 0.5;
        freq *= 2.0;
    }

    (total / max_amp).clamp(0.0, 1.0)
}
