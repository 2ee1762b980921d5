use std::fmt;

/// Linear RGBA color.
///
/// Invariant:
/// - channels are in linear space; sRGB only exists at the hex boundary.
///
/// The surface is configured with an sRGB format when available, so linear
/// values written by the shader are encoded back on store.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned by [`Color::from_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}' (expected #rrggbb or #rgb)", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    #[inline]
    pub const fn black() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }

    /// Creates an opaque color from linear components.
    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates an opaque color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_srgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Creates an opaque color from sRGB `f32` components in `[0, 1]`.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self::linear(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
    }

    /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError { input: input.to_string() };
        let digits = input.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(err());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(err()),
        };

        let value = u32::from_str_radix(&expanded, 16).map_err(|_| err())?;
        Ok(Self::from_srgb_u8(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }

    /// Returns the sRGB components in `[0, 1]`.
    #[inline]
    pub fn to_srgb(self) -> (f32, f32, f32) {
        (
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        )
    }

    /// Formats as lowercase `#rrggbb` (alpha is dropped).
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_srgb();
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
    }

    /// Rotates the hue by `degrees`, keeping saturation and lightness (HSL, sRGB space).
    pub fn rotate_hue(self, degrees: f32) -> Self {
        let (r, g, b) = self.to_srgb();
        let (h, s, l) = rgb_to_hsl(r, g, b);
        let h = (h + degrees).rem_euclid(360.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        let mut out = Self::from_srgb(r, g, b);
        out.a = self.a;
        out
    }

    /// Packs as a `vec4<f32>` for uniform upload.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;

    if d <= f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c * 0.5;
    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hex ───────────────────────────────────────────────────────────────

    #[test]
    fn hex_round_trips_default_palette() {
        for hex in ["#ff764d", "#e5ffe0", "#8e19b8", "#26132f"] {
            assert_eq!(Color::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn hex_accepts_short_form_and_missing_hash() {
        assert_eq!(Color::from_hex("#fff").unwrap().to_hex(), "#ffffff");
        assert_eq!(Color::from_hex("ff764d").unwrap().to_hex(), "#ff764d");
    }

    #[test]
    fn hex_is_case_insensitive() {
        assert_eq!(Color::from_hex("#E5FFE0").unwrap().to_hex(), "#e5ffe0");
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn hex_parse_is_linear() {
        // sRGB mid-gray is ~0.214 in linear space.
        let c = Color::from_hex("#808080").unwrap();
        assert!((c.r - 0.2158).abs() < 1e-3);
        assert_eq!(c.a, 1.0);
    }

    // ── hue ───────────────────────────────────────────────────────────────

    #[test]
    fn hue_rotation_full_turn_is_identity() {
        let c = Color::from_hex("#ff764d").unwrap();
        assert_eq!(c.rotate_hue(360.0).to_hex(), "#ff764d");
    }

    #[test]
    fn hue_rotation_red_to_green() {
        let red = Color::from_hex("#ff0000").unwrap();
        assert_eq!(red.rotate_hue(120.0).to_hex(), "#00ff00");
    }

    #[test]
    fn hue_rotation_leaves_gray_alone() {
        let gray = Color::from_hex("#808080").unwrap();
        assert_eq!(gray.rotate_hue(90.0).to_hex(), "#808080");
    }
}
