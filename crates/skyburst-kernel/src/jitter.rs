//! Gaussian jitter for sparkling trails.

use glam::Vec3;

/// Standard deviation of the launch trail sparkle.
pub const LAUNCH_JITTER_STD_DEV: f32 = 0.1;

/// Maps two uniform samples in `(0, 1)` to one standard normal sample.
///
/// Box–Muller: `sqrt(-2 ln u) * cos(2π v)`.
#[must_use]
pub fn box_muller(u: f32, v: f32) -> f32 {
    (-2.0 * u.ln()).sqrt() * (std::f32::consts::TAU * v).cos()
}

/// Source of normally distributed offsets.
#[derive(Debug, Clone)]
pub struct GaussianJitter {
    /// Uniform generator
    rng: fastrand::Rng,
    /// Standard deviation applied to each axis
    std_dev: f32,
}

impl GaussianJitter {
    /// Creates a jitter source seeded from the thread-local generator.
    #[must_use]
    pub fn new(std_dev: f32) -> Self {
        Self {
            rng: fastrand::Rng::new(),
            std_dev,
        }
    }

    /// Creates a deterministic jitter source.
    #[must_use]
    pub fn with_seed(std_dev: f32, seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            std_dev,
        }
    }

    /// Standard deviation per axis.
    #[must_use]
    pub const fn std_dev(&self) -> f32 {
        self.std_dev
    }

    /// Uniform sample in the open interval `(0, 1)`.
    fn open_unit(&mut self) -> f32 {
        loop {
            let u = self.rng.f32();
            if u > 0.0 {
                return u;
            }
        }
    }

    /// One normally distributed sample scaled by the standard deviation.
    pub fn sample(&mut self) -> f32 {
        if self.std_dev == 0.0 {
            return 0.0;
        }
        let u = self.open_unit();
        let v = self.open_unit();
        box_muller(u, v) * self.std_dev
    }

    /// Offsets each axis of `point` independently.
    pub fn apply(&mut self, point: Vec3) -> Vec3 {
        point + Vec3::new(self.sample(), self.sample(), self.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_muller_known_values() {
        // u = e^-0.5 gives sqrt(1) = 1; v = 0 gives cos(0) = 1
        let u = (-0.5f32).exp();
        assert!((box_muller(u, 0.0) - 1.0).abs() < 1e-5);
        assert!((box_muller(u, 0.5) + 1.0).abs() < 1e-5);
        assert!(box_muller(u, 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_zero_std_dev_is_exact() {
        let mut jitter = GaussianJitter::with_seed(0.0, 1);
        assert_eq!(jitter.apply(Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn test_samples_are_roughly_normal() {
        let mut jitter = GaussianJitter::with_seed(0.1, 42);
        let n = 20_000;
        let samples: Vec<f32> = (0..n).map(|_| jitter.sample()).collect();
        let mean = samples.iter().sum::<f32>() / n as f32;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / n as f32;

        assert!(mean.abs() < 0.005);
        assert!((var.sqrt() - 0.1).abs() < 0.005);
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = GaussianJitter::with_seed(LAUNCH_JITTER_STD_DEV, 9);
        let mut b = GaussianJitter::with_seed(LAUNCH_JITTER_STD_DEV, 9);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }
}
