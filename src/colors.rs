//! Named color schemes for the visualization modes, plus the small
//! amount of color arithmetic the renderers need (opacity emulation,
//! the correlation meter gradient).

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// A named palette read by every renderer each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub id: &'static str,
    pub background: Rgb888,
    pub grid: Rgb888,
    pub trace: Rgb888,
    pub accent: Rgb888,
    pub text: Rgb888,
    pub warning: Rgb888,
}

/// Default scheme: dark studio panel with a phosphor-green trace.
pub const STUDIO: ColorScheme = ColorScheme {
    id: "studio",
    background: Rgb888::new(16, 18, 20),
    grid: Rgb888::new(52, 58, 62),
    trace: Rgb888::new(84, 220, 128),
    accent: Rgb888::new(96, 200, 255),
    text: Rgb888::new(196, 204, 208),
    warning: Rgb888::new(232, 92, 60),
};

pub const MIDNIGHT: ColorScheme = ColorScheme {
    id: "midnight",
    background: Rgb888::new(8, 10, 24),
    grid: Rgb888::new(38, 44, 74),
    trace: Rgb888::new(110, 170, 255),
    accent: Rgb888::new(180, 130, 255),
    text: Rgb888::new(176, 186, 214),
    warning: Rgb888::new(255, 110, 90),
};

pub const DAYLIGHT: ColorScheme = ColorScheme {
    id: "daylight",
    background: Rgb888::new(244, 244, 240),
    grid: Rgb888::new(190, 192, 188),
    trace: Rgb888::new(32, 120, 64),
    accent: Rgb888::new(36, 90, 200),
    text: Rgb888::new(40, 44, 48),
    warning: Rgb888::new(200, 56, 40),
};

pub const EMBER: ColorScheme = ColorScheme {
    id: "ember",
    background: Rgb888::new(20, 12, 8),
    grid: Rgb888::new(70, 48, 34),
    trace: Rgb888::new(255, 176, 64),
    accent: Rgb888::new(255, 220, 140),
    text: Rgb888::new(214, 188, 160),
    warning: Rgb888::new(255, 72, 48),
};

static SCHEMES: [&ColorScheme; 4] = [&STUDIO, &MIDNIGHT, &DAYLIGHT, &EMBER];

impl ColorScheme {
    /// Look up a scheme by id.
    pub fn by_id(id: &str) -> Option<&'static ColorScheme> {
        SCHEMES.iter().copied().find(|s| s.id == id)
    }

    /// Look up a scheme by id, falling back to the studio scheme.
    pub fn by_id_or_default(id: &str) -> &'static ColorScheme {
        Self::by_id(id).unwrap_or(&STUDIO)
    }

    pub fn ids() -> impl Iterator<Item = &'static str> {
        SCHEMES.iter().map(|s| s.id)
    }
}

/// Linear blend between two colors, `t` clamped to 0..=1.
#[inline]
pub fn lerp(a: Rgb888, b: Rgb888, t: f32) -> Rgb888 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Rgb888::new(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// Emulated opacity: blend `color` toward the scheme background.
/// `opacity` 1.0 = fully opaque, 0.0 = invisible.
#[inline]
pub fn fade(color: Rgb888, background: Rgb888, opacity: f32) -> Rgb888 {
    lerp(background, color, opacity)
}

const METER_RED: Rgb888 = Rgb888::new(208, 52, 44);
const METER_YELLOW: Rgb888 = Rgb888::new(224, 196, 48);
const METER_GREEN: Rgb888 = Rgb888::new(64, 192, 96);

/// Fixed anti-phase -> uncorrelated -> in-phase gradient for the
/// correlation meter bar. `t` 0.0 maps to -1 (red), 0.5 to 0 (yellow),
/// 1.0 to +1 (green); scheme independent.
#[inline]
pub fn correlation_gradient(t: f32) -> Rgb888 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp(METER_RED, METER_YELLOW, t * 2.0)
    } else {
        lerp(METER_YELLOW, METER_GREEN, (t - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_lookup() {
        assert_eq!(ColorScheme::by_id("midnight").unwrap().id, "midnight");
        assert!(ColorScheme::by_id("nonesuch").is_none());
        assert_eq!(ColorScheme::by_id_or_default("nonesuch").id, "studio");
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb888::new(0, 0, 0);
        let b = Rgb888::new(200, 100, 50);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 2.0), b); // clamped
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(correlation_gradient(0.0), METER_RED);
        assert_eq!(correlation_gradient(0.5), METER_YELLOW);
        assert_eq!(correlation_gradient(1.0), METER_GREEN);
    }
}
