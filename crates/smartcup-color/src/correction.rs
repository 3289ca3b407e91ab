//! Color correction
//!
//! The sensor responds roughly linearly to reflected light while the panel
//! expects perceptual values, so each normalized channel goes through a
//! square-root curve first. The result looks washed out next to the sample,
//! which the saturation boost compensates for.

use crate::sample::CorrectedColor;

/// Default saturation multiplier
pub const DEFAULT_SATURATION_BOOST: f32 = 1.5;

/// Below this chroma (max - min) a color is treated as gray
const ACHROMATIC_EPSILON: f32 = 0.0001;

/// Gamma-correct a normalized fraction into a byte
///
/// The input is clamped to `[0, 1]`, raised to the power of 0.5 and scaled to
/// `[0, 255]` (truncated).
#[inline]
pub fn gamma_correct(fraction: f32) -> u8 {
    let fraction = fraction.clamp(0.0, 1.0);
    (libm::sqrtf(fraction) * 255.0) as u8
}

/// HSV color, hue in degrees `[0, 360)`, saturation and value in `[0, 1]`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn from_rgb(color: CorrectedColor) -> Self {
        let r = f32::from(color.r) / 255.0;
        let g = f32::from(color.g) / 255.0;
        let b = f32::from(color.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta < ACHROMATIC_EPSILON {
            return Self { h: 0.0, s: 0.0, v: max };
        }

        #[allow(clippy::float_cmp)]
        let sector = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };

        let mut h = sector * 60.0;
        if h < 0.0 {
            h += 360.0;
        }

        Self {
            h,
            s: delta / max,
            v: max,
        }
    }

    /// Six-sector reconstruction, each channel rounded and clamped to a byte
    pub fn to_rgb(self) -> CorrectedColor {
        let Self { h, s, v } = self;

        let h6 = h / 60.0;
        let whole = h6 as u32;
        let f = h6 - whole as f32;

        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match whole % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        CorrectedColor {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
        }
    }
}

#[inline]
fn unit_to_byte(value: f32) -> u8 {
    libm::roundf(value * 255.0).clamp(0.0, 255.0) as u8
}

/// Boost the saturation of a color in HSV space, keeping hue and value
///
/// Saturation is multiplied by `factor` and capped at 1.0. Gray input has no
/// hue to boost and is returned unchanged.
pub fn boost_saturation(color: CorrectedColor, factor: f32) -> CorrectedColor {
    if color.is_achromatic() {
        return color;
    }
    let mut hsv = Hsv::from_rgb(color);
    hsv.s = (hsv.s * factor).clamp(0.0, 1.0);
    hsv.to_rgb()
}
