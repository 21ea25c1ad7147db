//! Multi-term fractal Brownian motion (fBm) noise.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// Configuration for multi-term fractal noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise terms. Zero terms sample as a constant 0.
    pub octaves: u8,
    /// Frequency of the first term.
    pub frequency: f32,
    /// Frequency multiplier per term.
    pub lacunarity: f32,
    /// Amplitude multiplier per term.
    pub persistence: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 0,
        }
    }
}

impl FractalNoiseConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// `terms` octaves, each at twice the frequency of the last and with its
    /// amplitude scaled by `decay`.
    pub fn multiscale(terms: u8, decay: f32, seed: i32) -> Self {
        Self {
            octaves: terms,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: decay,
            seed,
        }
    }
}

/// simdnoise's 4D simplex uses a kernel radius of 0.5 and applies no output
/// scaling, so raw samples peak near `1 / 56`.
const SIMPLEX_4D_SCALE: f32 = 56.0;

/// Folds a 64-bit seed into the 32-bit seed simdnoise takes, so that both
/// halves of the seed affect the result.
pub fn fold_seed(seed: u64) -> i32 {
    (seed ^ (seed >> 32)) as u32 as i32
}

/// One simplex term in `[-1, 1]`.
fn simplex_at(p: Vec3, seed: i32) -> f32 {
    let raw = NoiseBuilder::fbm_4d_offset(p.x, 1, p.y, 1, p.z, 1, 0.0, 1)
        .with_seed(seed)
        .with_freq(1.0)
        .with_octaves(1)
        .generate()
        .0[0];
    (raw * SIMPLEX_4D_SCALE).clamp(-1.0, 1.0)
}

/// Samples fractal noise at a 3D position.
///
/// 4D simplex noise with w fixed at 0 avoids seams on spheres. The result is
/// normalised by the amplitude sum, so it lies in `[-1, 1]`.
pub fn sample_fractal_noise(pos: Vec3, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        let octave_seed = config.seed.wrapping_add(octave as i32 * 31337);
        total += simplex_at(pos * frequency, octave_seed) * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude == 0.0 {
        return 0.0;
    }
    total / max_amplitude
}

/// Samples fractal noise for a batch of positions in parallel.
///
/// Each result equals [`sample_fractal_noise`] at the same position.
pub fn sample_fractal_noise_batch(positions: &[Vec3], config: &FractalNoiseConfig) -> Vec<f32> {
    positions
        .par_iter()
        .map(|&pos| sample_fractal_noise(pos, config))
        .collect()
}
