//! 8-bit RGB display colors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BABY_BLUE: Color = Color::new(128, 216, 255);
pub const BABY_PINK: Color = Color::new(255, 192, 192);
pub const BLACK: Color = Color::new(0, 0, 0);
pub const CYAN: Color = Color::new(0, 255, 255);
pub const DARK_BLUE: Color = Color::new(0, 0, 139);
pub const DARK_GREEN: Color = Color::new(0, 100, 0);
pub const DEEP_GREEN: Color = Color::new(0, 160, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
pub const GREY: Color = Color::new(128, 128, 128);
pub const LIGHT_GREY: Color = Color::new(216, 216, 216);
pub const LIME: Color = Color::new(128, 255, 0);
pub const MAGENTA: Color = Color::new(255, 0, 255);
pub const MAROON: Color = Color::new(128, 0, 0);
pub const MAYA_BLUE: Color = Color::new(72, 170, 181);
pub const ORANGE: Color = Color::new(255, 128, 0);
pub const RED: Color = Color::new(255, 0, 0);
pub const WHITE: Color = Color::new(255, 255, 255);

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn values(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Components in `0.0..=1.0`, as DCC color attributes expect.
    pub fn normalized(&self) -> [f64; 3] {
        self.values().map(|c| c as f64 / 255.0)
    }

    /// Nearest 8-bit color for normalized components. Out of range values clamp.
    pub fn from_normalized(rgb: [f64; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        DEEP_GREEN
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}
