//! Byte and float RGBA colours.
//!
//! Vertices store colours as four bytes per slot; configuration and blending
//! work in floats.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA colour as stored in vertex records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ByteRgba {
    pub const BLACK: ByteRgba = ByteRgba::new(0, 0, 0, 255);
    pub const WHITE: ByteRgba = ByteRgba::new(255, 255, 255, 255);
    pub const RED: ByteRgba = ByteRgba::new(255, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// A floating point RGBA colour with channels nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for FloatRgba {
    fn default() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

impl FloatRgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Multiplies every channel, alpha included, by `k`.
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    /// Linear blend: `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: FloatRgba, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to bytes, clamping each channel to `[0, 1]` first.
    pub fn to_bytes(self) -> ByteRgba {
        ByteRgba::new(
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(self.a),
        )
    }
}

impl From<FloatRgba> for ByteRgba {
    fn from(c: FloatRgba) -> Self {
        c.to_bytes()
    }
}

impl From<ByteRgba> for FloatRgba {
    fn from(c: ByteRgba) -> Self {
        FloatRgba::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            c.a as f32 / 255.0,
        )
    }
}

fn channel_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
