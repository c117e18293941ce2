//! Colours used by the backdrop, independent of any rendering backend

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from HSL, hue in degrees, saturation and lightness in [0, 1]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f32| ((v + m).clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_u8(r1),
            g: to_u8(g1),
            b: to_u8(b1),
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// Circuit board palette (cyan on dark)
pub mod circuit {
    use super::Rgba;

    pub const NODE: Rgba = Rgba::new(14, 165, 233, 204);
    pub const NODE_GLOW: Rgba = Rgba::new(14, 165, 233, 77);
    pub const NODE_BRIGHT: Rgba = Rgba::new(56, 189, 248, 255);
    pub const NODE_HIGHLIGHT: Rgba = Rgba::new(255, 255, 255, 102);
    pub const LINE: Rgba = Rgba::new(14, 165, 233, 38);
    pub const LINE_ACTIVE: Rgba = Rgba::new(14, 165, 233, 102);
    pub const PACKET: Rgba = Rgba::new(34, 211, 238, 230);
    pub const PACKET_GLOW: Rgba = Rgba::new(34, 211, 238, 102);
}

/// Drift particle colouring
pub mod drift {
    pub const SATURATION: f32 = 0.7;
    pub const LIGHTNESS: f32 = 0.6;
    pub const PARTICLE_ALPHA: f32 = 0.6;
}

/// Midpoint of two hues on the colour wheel, in degrees [0, 360)
pub fn blend_hue(a: f32, b: f32) -> f32 {
    let a = a.rem_euclid(360.0);
    let b = b.rem_euclid(360.0);
    let mut diff = b - a;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    (a + diff / 2.0).rem_euclid(360.0)
}
