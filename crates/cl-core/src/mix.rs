use crate::color::{ACHROMATIC_EPSILON, Hsl, Rgb, circular_mean_hue, hsl_to_rgb, rgb_to_hsl, wrap_hue};

/// Default saturation boost applied to the subtractive product.
pub const DEFAULT_SATURATION_BOOST: f64 = 1.2;
/// Default exponent applied to the geometric-mean lightness.
pub const DEFAULT_LIGHTNESS_DAMPING: f64 = 0.85;
/// Upper bound for the saturation boost.
pub const MAX_SATURATION_BOOST: f64 = 1.2;

/// Shape parameters of the pigment-style (subtractive) blend.
///
/// # Example
/// ```
/// use cl_core::mix::MixTuning;
/// let t = MixTuning::default();
/// assert_eq!(t.saturation_boost, 1.2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixTuning {
    /// Multiplier on `s_a * s_b`, in [0, 1.2].
    pub saturation_boost: f64,
    /// Exponent on `sqrt(l_a * l_b)`.
    pub lightness_damping: f64,
}

impl Default for MixTuning {
    fn default() -> Self {
        Self {
            saturation_boost: DEFAULT_SATURATION_BOOST,
            lightness_damping: DEFAULT_LIGHTNESS_DAMPING,
        }
    }
}

impl MixTuning {
    /// Copy with both parameters forced into their valid ranges.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let boost = if self.saturation_boost.is_finite() {
            self.saturation_boost.clamp(0.0, MAX_SATURATION_BOOST)
        } else {
            DEFAULT_SATURATION_BOOST
        };
        let damping = if self.lightness_damping.is_finite() && self.lightness_damping > 0.0 {
            self.lightness_damping.min(4.0)
        } else {
            DEFAULT_LIGHTNESS_DAMPING
        };
        Self {
            saturation_boost: boost,
            lightness_damping: damping,
        }
    }
}

/// Mélange additif (lumière) : somme en lumière linéaire, écrêtée à 1.
///
/// The sum happens on linear-light values; adding the gamma-encoded values
/// directly would under-represent the brightness gained.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::mix::additive_mix;
/// assert_eq!(additive_mix(Rgb::RED, Rgb::GREEN).to_hex(), "#ffff00");
/// ```
#[must_use]
pub fn additive_mix(a: Rgb, b: Rgb) -> Rgb {
    let la = a.to_linear();
    let lb = b.to_linear();
    Rgb::new(
        (la.r + lb.r).min(1.0),
        (la.g + lb.g).min(1.0),
        (la.b + lb.b).min(1.0),
    )
    .to_srgb()
}

/// Pigment-style blend with the default [`MixTuning`].
#[must_use]
pub fn subtractive_mix(a: Rgb, b: Rgb) -> Rgb {
    subtractive_mix_with(a, b, MixTuning::default())
}

/// Mélange soustractif (pigments) dans l'espace HSL.
///
/// - hue: circular mean of the chromatic inputs' hues (achromatic inputs are
///   skipped); for exactly opposite hues the midpoint of the arc running
///   counter-clockwise from `a` to `b` is used.
/// - saturation: `s_a * s_b * boost`, clamped to 1.
/// - lightness: `sqrt(l_a * l_b) ^ damping`.
///
/// # Example
/// ```
/// use cl_core::color::{Hsv, Rgb};
/// use cl_core::mix::subtractive_mix;
/// let a = Hsv::new(10.0, 1.0, 1.0).to_rgb();
/// let b = Hsv::new(350.0, 1.0, 1.0).to_rgb();
/// let hue = subtractive_mix(a, b).hue();
/// assert!(hue < 1.0 || hue > 359.0);
/// ```
#[must_use]
pub fn subtractive_mix_with(a: Rgb, b: Rgb, tuning: MixTuning) -> Rgb {
    let tuning = tuning.sanitized();
    let ha = rgb_to_hsl(a);
    let hb = rgb_to_hsl(b);

    let hue = mixed_hue(ha, hb);
    let saturation = (ha.s * hb.s * tuning.saturation_boost).min(1.0);
    let lightness = (ha.l * hb.l).sqrt().powf(tuning.lightness_damping);

    hsl_to_rgb(Hsl::new(hue, saturation, lightness))
}

fn mixed_hue(a: Hsl, b: Hsl) -> f64 {
    let chromatic: Vec<f64> = [a, b]
        .iter()
        .filter(|c| c.s > ACHROMATIC_EPSILON)
        .map(|c| c.h)
        .collect();
    match chromatic.as_slice() {
        [] => 0.0,
        [only] => *only,
        [first, second, ..] => circular_mean_hue(&chromatic)
            .unwrap_or_else(|| wrap_hue(first + (second - first).rem_euclid(360.0) / 2.0)),
    }
}

/// Surimpression d'encres CMY : couverture combinée `1 - (1 - c1)(1 - c2)`.
///
/// Works on linear light: each channel's ink coverage is `1 - linear`, the
/// inks overprint, and the result is re-encoded to sRGB. Equivalent to a
/// per-channel product of the linear values.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::mix::overprint_mix;
/// // Cyan ink over yellow ink leaves green.
/// let cyan = Rgb::new(0.0, 1.0, 1.0);
/// let yellow = Rgb::new(1.0, 1.0, 0.0);
/// assert_eq!(overprint_mix(cyan, yellow).to_hex(), "#00ff00");
/// ```
#[must_use]
pub fn overprint_mix(a: Rgb, b: Rgb) -> Rgb {
    let la = a.to_linear();
    let lb = b.to_linear();
    let combine = |x: f64, y: f64| {
        let (cx, cy) = (1.0 - x, 1.0 - y);
        let coverage = 1.0 - (1.0 - cx) * (1.0 - cy);
        (1.0 - coverage).clamp(0.0, 1.0)
    };
    Rgb::new(combine(la.r, lb.r), combine(la.g, lb.g), combine(la.b, lb.b)).to_srgb()
}
