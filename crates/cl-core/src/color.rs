use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Below this chroma a color is treated as achromatic (hue undefined).
pub const ACHROMATIC_EPSILON: f64 = 1e-9;

/// Clamp to [0.0, 1.0]. NaN collapses to 0.0 so it never reaches geometry.
///
/// # Example
/// ```
/// use cl_core::color::clamp01;
/// assert_eq!(clamp01(1.7), 1.0);
/// assert_eq!(clamp01(f64::NAN), 0.0);
/// ```
#[inline]
#[must_use]
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Ramène une teinte en degrés dans [0, 360). 360 et 0 désignent la même couleur.
///
/// # Example
/// ```
/// use cl_core::color::wrap_hue;
/// assert_eq!(wrap_hue(360.0), 0.0);
/// assert_eq!(wrap_hue(-90.0), 270.0);
/// ```
#[inline]
#[must_use]
pub fn wrap_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let w = h.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if w >= 360.0 { 0.0 } else { w }
}

/// Signed shortest-arc difference `to - from`, in (-180, 180].
#[must_use]
pub fn hue_delta(from: f64, to: f64) -> f64 {
    let d = wrap_hue(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Normalised RGB triplet, each channel in [0.0, 1.0].
///
/// Whether the channels are gamma-encoded (sRGB) or linear light depends on
/// context; every public conversion documents which one it expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

/// Hue (degrees), saturation, value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in [0, 360).
    pub h: f64,
    /// Saturation in [0, 1].
    pub s: f64,
    /// Value in [0, 1].
    pub v: f64,
}

/// Hue (degrees), saturation, lightness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in [0, 360).
    pub h: f64,
    /// Saturation in [0, 1].
    pub s: f64,
    /// Lightness in [0, 1].
    pub l: f64,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Pure red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels.
    #[must_use]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Quantize to 8-bit channels (clamped, rounded to nearest).
    #[must_use]
    pub fn to_u8(self) -> (u8, u8, u8) {
        let q = |c: f64| (clamp01(c) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// Every channel clamped to [0, 1].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(clamp01(self.r), clamp01(self.g), clamp01(self.b))
    }

    /// Largest per-channel absolute difference.
    #[must_use]
    pub fn max_channel_delta(self, other: Self) -> f64 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    /// sRGB-encoded → linear light, channel-wise.
    #[must_use]
    pub fn to_linear(self) -> Self {
        Self::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    /// Linear light → sRGB-encoded, channel-wise.
    #[must_use]
    pub fn to_srgb(self) -> Self {
        Self::new(
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        )
    }

    #[must_use]
    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }

    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Hue in degrees, 0 for achromatic colors.
    #[must_use]
    pub fn hue(self) -> f64 {
        rgb_to_hue(self)
    }

    /// Encode as lower-case `#rrggbb`.
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// assert_eq!(Rgb::new(1.0, 0.5, 0.0).to_hex(), "#ff8000");
    /// ```
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parse `#rrggbb`, `rrggbb` or the `#rgb` shorthand.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidHex`] for anything else.
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// let c = Rgb::from_hex("#00ff00").unwrap();
    /// assert_eq!(c, Rgb::GREEN);
    /// assert!(Rgb::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidHex {
            input: input.to_string(),
        };
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::from_u8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let nibble = |i: usize| channel(&digits[i..=i]).map(|n| n * 17);
                Ok(Self::from_u8(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Human-readable `rgb(r, g, b)` with 8-bit channels.
    #[must_use]
    pub fn css_rgb(self) -> String {
        let (r, g, b) = self.to_u8();
        format!("rgb({r}, {g}, {b})")
    }

    /// Ink-coverage display `cmy(c%, m%, y%)`, where coverage is `1 - channel`.
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// assert_eq!(Rgb::RED.cmy_percent(), "cmy(0%, 100%, 100%)");
    /// ```
    #[must_use]
    pub fn cmy_percent(self) -> String {
        let (r, g, b) = self.to_u8();
        let ink = |c: u8| ((1.0 - f64::from(c) / 255.0) * 100.0).round() as u8;
        format!("cmy({}%, {}%, {}%)", ink(r), ink(g), ink(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Hsv {
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self)
    }
}

impl Hsl {
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

/// Décodage gamma sRGB → lumière linéaire.
///
/// # Example
/// ```
/// use cl_core::color::srgb_to_linear;
/// assert!((srgb_to_linear(0.5) - 0.214_041).abs() < 1e-5);
/// ```
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    let c = clamp01(c);
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encodage lumière linéaire → gamma sRGB.
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f64) -> f64 {
    let c = clamp01(c);
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Extract the hue angle in degrees, [0, 360).
///
/// Achromatic inputs (max == min) have no hue; by convention they return 0.
/// [`rgb_to_hsv`] and [`rgb_to_hsl`] both take their hue from here.
///
/// # Example
/// ```
/// use cl_core::color::{rgb_to_hue, Rgb};
/// assert_eq!(rgb_to_hue(Rgb::new(0.0, 0.0, 1.0)), 240.0);
/// assert_eq!(rgb_to_hue(Rgb::new(0.3, 0.3, 0.3)), 0.0);
/// ```
#[must_use]
pub fn rgb_to_hue(rgb: Rgb) -> f64 {
    let Rgb { r, g, b } = rgb.clamped();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= ACHROMATIC_EPSILON {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    wrap_hue(sector * 60.0)
}

/// Convertit RGB [0,1] → HSV. H ∈ [0, 360), S ∈ [0, 1], V ∈ [0, 1].
///
/// # Example
/// ```
/// use cl_core::color::{rgb_to_hsv, Rgb};
/// let hsv = rgb_to_hsv(Rgb::new(1.0, 0.0, 0.0));
/// assert_eq!((hsv.h, hsv.s, hsv.v), (0.0, 1.0, 1.0));
/// ```
#[must_use]
pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let c = rgb.clamped();
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let s = if max > 0.0 { (max - min) / max } else { 0.0 };
    Hsv::new(rgb_to_hue(c), s, max)
}

/// Convertit HSV → RGB [0,1]. La teinte est d'abord ramenée dans [0, 360).
///
/// # Example
/// ```
/// use cl_core::color::{hsv_to_rgb, Hsv, Rgb};
/// assert_eq!(hsv_to_rgb(Hsv::new(360.0, 1.0, 1.0)), Rgb::RED);
/// ```
#[must_use]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = wrap_hue(hsv.h) / 60.0;
    let s = clamp01(hsv.s);
    let v = clamp01(hsv.v);

    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}

/// RGB [0,1] → HSL.
#[must_use]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let c = rgb.clamped();
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    let s = if delta <= ACHROMATIC_EPSILON {
        0.0
    } else {
        clamp01(delta / (1.0 - (2.0 * l - 1.0).abs()))
    };
    Hsl::new(rgb_to_hue(c), s, l)
}

/// HSL → RGB [0,1].
///
/// # Example
/// ```
/// use cl_core::color::{hsl_to_rgb, Hsl};
/// let c = hsl_to_rgb(Hsl::new(120.0, 1.0, 0.5));
/// assert_eq!(c.to_hex(), "#00ff00");
/// ```
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = wrap_hue(hsl.h) / 60.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match h.floor() as u8 % 6 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    Rgb::new(r + m, g + m, b + m).clamped()
}

/// Moyenne circulaire de teintes (degrés), par somme des vecteurs unitaires.
///
/// Returns `None` for an empty slice or when the vectors cancel out (e.g.
/// two exactly opposite hues), where no direction is meaningful.
///
/// # Example
/// ```
/// use cl_core::color::circular_mean_hue;
/// let mean = circular_mean_hue(&[10.0, 350.0]).unwrap();
/// assert!(mean < 1e-9 || mean > 360.0 - 1e-9);
/// assert!(circular_mean_hue(&[0.0, 180.0]).is_none());
/// ```
#[must_use]
pub fn circular_mean_hue(hues: &[f64]) -> Option<f64> {
    let (sin, cos) = hues.iter().fold((0.0_f64, 0.0_f64), |(s, c), h| {
        let rad = h.to_radians();
        (s + rad.sin(), c + rad.cos())
    });
    if sin.hypot(cos) < 1e-9 {
        return None;
    }
    Some(wrap_hue(sin.atan2(cos).to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hsv_roundtrip_random() {
        let mut rng = fastrand::Rng::with_seed(0x5eed_c010);
        for _ in 0..1000 {
            let rgb = Rgb::new(rng.f64(), rng.f64(), rng.f64());
            let back = hsv_to_rgb(rgb_to_hsv(rgb));
            assert!(
                rgb.max_channel_delta(back) < 1e-6,
                "{rgb:?} -> {back:?}"
            );
        }
    }

    #[test]
    fn rgb_hsv_roundtrip_grid() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(17) {
                    let rgb = Rgb::from_u8(r, g, b);
                    let back = rgb_to_hsv(rgb).to_rgb();
                    assert_eq!(back.to_u8(), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn hue_wrap_is_continuous() {
        for s in [0.0, 0.25, 0.5, 1.0] {
            for v in [0.0, 0.3, 0.8, 1.0] {
                assert_eq!(hsv_to_rgb(Hsv::new(0.0, s, v)), hsv_to_rgb(Hsv::new(360.0, s, v)));
                assert_eq!(hsv_to_rgb(Hsv::new(-120.0, s, v)), hsv_to_rgb(Hsv::new(240.0, s, v)));
            }
        }
    }

    #[test]
    fn gamma_roundtrip() {
        for i in 0..=1000 {
            let c = f64::from(i) / 1000.0;
            assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1e-6, "c = {c}");
        }
    }

    #[test]
    fn standalone_hue_agrees_with_hsv() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..500 {
            let rgb = Rgb::new(rng.f64(), rng.f64(), rng.f64());
            assert_eq!(rgb_to_hue(rgb), rgb_to_hsv(rgb).h);
            assert_eq!(rgb_to_hue(rgb), rgb_to_hsl(rgb).h);
        }
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        let hsv = rgb_to_hsv(Rgb::new(0.4, 0.4, 0.4));
        assert_eq!(hsv.h, 0.0);
        assert_eq!(hsv.s, 0.0);
        assert!((hsv.v - 0.4).abs() < 1e-12);
        assert_eq!(rgb_to_hsv(Rgb::BLACK).s, 0.0);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let c = hsv_to_rgb(Hsv::new(0.0, -0.5, 1.5));
        assert_eq!(c, Rgb::WHITE);
        let hsv = rgb_to_hsv(Rgb::new(2.0, -1.0, f64::NAN));
        assert_eq!((hsv.h, hsv.s, hsv.v), (0.0, 1.0, 1.0));
    }

    #[test]
    fn hsl_roundtrip_random() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let rgb = Rgb::new(rng.f64(), rng.f64(), rng.f64());
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            assert!(rgb.max_channel_delta(back) < 1e-6, "{rgb:?} -> {back:?}");
        }
    }

    #[test]
    fn hex_roundtrip_on_8bit_grid() {
        for v in 0..=255u8 {
            let rgb = Rgb::from_u8(v, 255 - v, v / 2);
            let hex = rgb.to_hex();
            assert_eq!(Rgb::from_hex(&hex).map(Rgb::to_u8), Ok(rgb.to_u8()));
        }
    }

    #[test]
    fn hex_parsing_variants() {
        assert_eq!(Rgb::from_hex("ff0000"), Ok(Rgb::RED));
        assert_eq!(Rgb::from_hex("#0F0"), Ok(Rgb::GREEN));
        assert_eq!("#0000ff".parse::<Rgb>(), Ok(Rgb::BLUE));
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#ff00000").is_err());
        assert!(Rgb::from_hex("#éé").is_err());
    }

    #[test]
    fn display_strings() {
        let c = Rgb::from_u8(255, 128, 0);
        assert_eq!(c.css_rgb(), "rgb(255, 128, 0)");
        assert_eq!(c.cmy_percent(), "cmy(0%, 50%, 100%)");
        assert_eq!(c.to_string(), "#ff8000");
    }

    #[test]
    fn circular_mean_takes_short_arc() {
        let mean = circular_mean_hue(&[350.0, 30.0]).unwrap_or(f64::NAN);
        assert!((mean - 10.0).abs() < 1e-9);
        assert!(circular_mean_hue(&[]).is_none());
        let single = circular_mean_hue(&[123.0]).unwrap_or(f64::NAN);
        assert!((single - 123.0).abs() < 1e-9);
    }

    #[test]
    fn hue_delta_signs() {
        assert!((hue_delta(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((hue_delta(10.0, 350.0) + 20.0).abs() < 1e-12);
        assert!((hue_delta(0.0, 180.0) - 180.0).abs() < 1e-12);
    }
}
