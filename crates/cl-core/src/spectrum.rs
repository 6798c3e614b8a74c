//! Visible-light approximations: wavelength → hue, band layout, photoreceptor curves.
//!
//! These are illustrative mappings, not spectral integration: a wavelength in
//! the visible band is placed on a fixed hue sweep (violet at 380 nm, red at
//! 700 nm) and rendered at full saturation.

use crate::color::{Hsl, Rgb};

/// Short end of the visible band, in nanometres.
pub const VISIBLE_MIN_NM: f64 = 380.0;
/// Long end of the visible band, in nanometres.
pub const VISIBLE_MAX_NM: f64 = 700.0;
/// Hue at the short (violet) end of the sweep.
pub const VIOLET_HUE: f64 = 270.0;

/// Fraction of a spectrum strip reserved for ultraviolet on the left.
pub const UV_FRACTION: f64 = 0.18;
/// Start of the infrared strip, as a fraction of the width.
pub const IR_FRACTION: f64 = 0.82;

/// Responses below this level are reported as zero.
pub const RESPONSE_FLOOR: f64 = 0.01;

/// Hue (degrees) of a visible wavelength: 380 nm → 270° (violet), 700 nm → 0° (red).
///
/// Inputs outside the visible band are clamped to its ends.
///
/// # Example
/// ```
/// use cl_core::spectrum::wavelength_to_hue;
/// assert_eq!(wavelength_to_hue(700.0), 0.0);
/// assert_eq!(wavelength_to_hue(380.0), 270.0);
/// ```
#[must_use]
pub fn wavelength_to_hue(nm: f64) -> f64 {
    let nm = if nm.is_nan() {
        VISIBLE_MAX_NM
    } else {
        nm.clamp(VISIBLE_MIN_NM, VISIBLE_MAX_NM)
    };
    VIOLET_HUE * (VISIBLE_MAX_NM - nm) / (VISIBLE_MAX_NM - VISIBLE_MIN_NM)
}

/// Approximate display color of a visible wavelength (`hsl(hue, 100%, 50%)`).
///
/// # Example
/// ```
/// use cl_core::spectrum::wavelength_to_rgb;
/// assert_eq!(wavelength_to_rgb(700.0).to_hex(), "#ff0000");
/// ```
#[must_use]
pub fn wavelength_to_rgb(nm: f64) -> Rgb {
    Hsl::new(wavelength_to_hue(nm), 1.0, 0.5).to_rgb()
}

/// Region of the electromagnetic strip a wavelength or column falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpectralBand {
    Ultraviolet,
    Visible,
    Infrared,
}

impl SpectralBand {
    /// Band containing `nm`.
    #[must_use]
    pub fn of_wavelength(nm: f64) -> Self {
        if nm < VISIBLE_MIN_NM {
            Self::Ultraviolet
        } else if nm > VISIBLE_MAX_NM {
            Self::Infrared
        } else {
            Self::Visible
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ultraviolet => "Ultraviolet",
            Self::Visible => "Visible Spectrum",
            Self::Infrared => "Infrared",
        }
    }
}

/// Horizontal layout of a spectrum strip: UV on the left 18%, IR on the right 18%.
///
/// # Example
/// ```
/// use cl_core::spectrum::{SpectralBand, SpectrumLayout};
/// let layout = SpectrumLayout::new(700);
/// assert_eq!(layout.visible_start, 126);
/// assert_eq!(layout.visible_end, 574);
/// assert_eq!(layout.band(0), SpectralBand::Ultraviolet);
/// assert_eq!(layout.band(350), SpectralBand::Visible);
/// assert_eq!(layout.band(699), SpectralBand::Infrared);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpectrumLayout {
    pub width: u32,
    /// First visible column.
    pub visible_start: u32,
    /// Last visible column (inclusive).
    pub visible_end: u32,
}

impl SpectrumLayout {
    #[must_use]
    pub fn new(width: u32) -> Self {
        let w = f64::from(width);
        Self {
            width,
            visible_start: (w * UV_FRACTION).floor() as u32,
            visible_end: (w * IR_FRACTION).floor() as u32,
        }
    }

    #[must_use]
    pub fn band(&self, x: u32) -> SpectralBand {
        if x < self.visible_start {
            SpectralBand::Ultraviolet
        } else if x > self.visible_end {
            SpectralBand::Infrared
        } else {
            SpectralBand::Visible
        }
    }

    /// Wavelength shown at column `x`, `None` outside the visible band.
    #[must_use]
    pub fn wavelength_at(&self, x: u32) -> Option<f64> {
        if self.band(x) != SpectralBand::Visible {
            return None;
        }
        let span = f64::from(self.visible_end.saturating_sub(self.visible_start)).max(1.0);
        let t = f64::from(x - self.visible_start) / span;
        Some(VISIBLE_MIN_NM + t * (VISIBLE_MAX_NM - VISIBLE_MIN_NM))
    }

    /// Column color of the static strip (UV and IR fades included).
    #[must_use]
    pub fn strip_color(&self, x: u32) -> Rgb {
        match self.band(x) {
            SpectralBand::Visible => self
                .wavelength_at(x)
                .map_or(Rgb::BLACK, wavelength_to_rgb),
            SpectralBand::Ultraviolet => {
                let t = f64::from(x) / f64::from(self.visible_start.max(1));
                let fade = 0.5 - 0.5 * (std::f64::consts::PI * t).cos();
                Rgb::from_u8(
                    lerp_u8(30.0, 88.0, fade),
                    0,
                    lerp_u8(60.0, 255.0, fade),
                )
            }
            SpectralBand::Infrared => {
                let span = f64::from(self.width.saturating_sub(self.visible_end).max(1));
                let fade = 1.0 - f64::from(x - self.visible_end) / span;
                Rgb::from_u8(lerp_u8(60.0, 255.0, fade), 0, 0)
            }
        }
    }
}

fn lerp_u8(from: f64, to: f64, t: f64) -> u8 {
    (from + (to - from) * t.clamp(0.0, 1.0)).round() as u8
}

/// Light-sensitive cell types of the retina.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Photoreceptor {
    Rod,
    SCone,
    MCone,
    LCone,
}

/// Gaussian sensitivity curve `height · exp(-½((λ - peak) / width)²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponseCurve {
    pub receptor: Photoreceptor,
    pub label: &'static str,
    pub peak_nm: f64,
    pub width_nm: f64,
    pub height: f64,
    /// Stroke color used when plotting.
    pub color: Rgb,
}

/// Rod, S, M and L curves, in plotting order.
pub const RESPONSE_CURVES: [ResponseCurve; 4] = [
    ResponseCurve {
        receptor: Photoreceptor::Rod,
        label: "ROD",
        peak_nm: 498.0,
        width_nm: 40.0,
        height: 0.9,
        color: Rgb::BLACK,
    },
    ResponseCurve {
        receptor: Photoreceptor::SCone,
        label: "S CONE",
        peak_nm: 420.0,
        width_nm: 35.0,
        height: 1.0,
        color: Rgb::new(0.0, 80.0 / 255.0, 1.0),
    },
    ResponseCurve {
        receptor: Photoreceptor::MCone,
        label: "M CONE",
        peak_nm: 534.0,
        width_nm: 45.0,
        height: 1.0,
        color: Rgb::new(0.0, 1.0, 64.0 / 255.0),
    },
    ResponseCurve {
        receptor: Photoreceptor::LCone,
        label: "L CONE",
        peak_nm: 564.0,
        width_nm: 50.0,
        height: 1.0,
        color: Rgb::new(1.0, 32.0 / 255.0, 32.0 / 255.0),
    },
];

impl ResponseCurve {
    /// Relative response at `nm`; values below [`RESPONSE_FLOOR`] are 0.
    ///
    /// # Example
    /// ```
    /// use cl_core::spectrum::RESPONSE_CURVES;
    /// let rod = RESPONSE_CURVES[0];
    /// assert!((rod.response_at(498.0) - 0.9).abs() < 1e-12);
    /// assert_eq!(rod.response_at(900.0), 0.0);
    /// ```
    #[must_use]
    pub fn response_at(&self, nm: f64) -> f64 {
        let z = (nm - self.peak_nm) / self.width_nm;
        let r = self.height * (-0.5 * z * z).exp();
        if r > RESPONSE_FLOOR { r } else { 0.0 }
    }
}

/// Responses of all four receptors at `nm`, ordered as [`RESPONSE_CURVES`].
#[must_use]
pub fn photoreceptor_response(nm: f64) -> [f64; 4] {
    RESPONSE_CURVES.map(|c| c.response_at(nm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_sweep_is_monotonic() {
        let mut prev = f64::INFINITY;
        let mut nm = VISIBLE_MIN_NM;
        while nm <= VISIBLE_MAX_NM {
            let h = wavelength_to_hue(nm);
            assert!(h < prev, "{nm} nm -> {h}");
            prev = h;
            nm += 5.0;
        }
    }

    #[test]
    fn out_of_band_is_clamped() {
        assert_eq!(wavelength_to_hue(200.0), VIOLET_HUE);
        assert_eq!(wavelength_to_hue(1200.0), 0.0);
        assert_eq!(wavelength_to_hue(f64::NAN), 0.0);
    }

    #[test]
    fn band_classification() {
        assert_eq!(SpectralBand::of_wavelength(300.0), SpectralBand::Ultraviolet);
        assert_eq!(SpectralBand::of_wavelength(550.0), SpectralBand::Visible);
        assert_eq!(SpectralBand::of_wavelength(800.0), SpectralBand::Infrared);
    }

    #[test]
    fn layout_maps_edges_to_band_limits() {
        let layout = SpectrumLayout::new(700);
        assert_eq!(layout.wavelength_at(layout.visible_start), Some(VISIBLE_MIN_NM));
        assert_eq!(layout.wavelength_at(layout.visible_end), Some(VISIBLE_MAX_NM));
        assert_eq!(layout.wavelength_at(0), None);
        assert_eq!(layout.wavelength_at(699), None);
    }

    #[test]
    fn strip_fades_match_endpoints() {
        let layout = SpectrumLayout::new(700);
        assert_eq!(layout.strip_color(0).to_u8(), (30, 0, 60));
        let ir_first = layout.strip_color(layout.visible_end + 1).to_u8();
        assert!(ir_first.0 > 250 && ir_first.1 == 0);
        let ir_last = layout.strip_color(699).to_u8();
        assert!(ir_last.0 < 70, "{ir_last:?}");
        // Left edge of the visible band is violet, right edge red.
        assert!((layout.strip_color(layout.visible_start).hue() - 270.0).abs() < 1.0);
        assert_eq!(layout.strip_color(layout.visible_end).to_hex(), "#ff0000");
    }

    #[test]
    fn photoreceptor_peaks() {
        for (i, curve) in RESPONSE_CURVES.iter().enumerate() {
            let r = photoreceptor_response(curve.peak_nm);
            assert!((r[i] - curve.height).abs() < 1e-12);
        }
        let far = photoreceptor_response(1000.0);
        assert_eq!(far, [0.0; 4]);
    }
}
