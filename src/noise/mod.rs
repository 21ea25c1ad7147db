//! Fractal noise used to displace terrain and shape clouds.
//!
//! Uses simdnoise for the base simplex noise.

mod fractal;

pub use fractal::{fold_seed, FractalNoiseConfig, sample_fractal_noise, sample_fractal_noise_batch};
