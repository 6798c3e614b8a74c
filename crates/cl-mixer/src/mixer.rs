//! UI-level two-color mixer: inputs, mode, and the derived display strings.

use cl_core::cie::rgb_to_lab;
use cl_core::color::Rgb;
use cl_core::config::{MixMode, MixerConfig};
use cl_core::error::CoreError;
use cl_core::mix::{MixTuning, additive_mix, overprint_mix, subtractive_mix_with};
use serde::Serialize;

/// Blend `a` and `b` with the operator selected by `mode`.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::config::MixMode;
/// use cl_core::mix::MixTuning;
/// use cl_mixer::mixer::mix;
/// let m = mix(Rgb::RED, Rgb::GREEN, MixMode::Additive, MixTuning::default());
/// assert_eq!(m.to_hex(), "#ffff00");
/// ```
#[must_use]
pub fn mix(a: Rgb, b: Rgb, mode: MixMode, tuning: MixTuning) -> Rgb {
    match mode {
        MixMode::Additive => additive_mix(a, b),
        MixMode::Subtractive => subtractive_mix_with(a, b, tuning),
        MixMode::Overprint => overprint_mix(a, b),
    }
}

/// Le mixeur : deux couleurs d'entrée et un mode.
///
/// Nothing is cached: [`Mixer::mixed`] blends the current inputs on every
/// call, so a mode switch is visible immediately.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mixer {
    color_a: Rgb,
    color_b: Rgb,
    mode: MixMode,
    tuning: MixTuning,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(Rgb::RED, Rgb::GREEN, MixMode::Additive)
    }
}

impl Mixer {
    #[must_use]
    pub fn new(color_a: Rgb, color_b: Rgb, mode: MixMode) -> Self {
        Self {
            color_a: color_a.clamped(),
            color_b: color_b.clamped(),
            mode,
            tuning: MixTuning::default(),
        }
    }

    /// Build from the `[mixer]` section.
    ///
    /// # Errors
    /// [`CoreError::InvalidHex`] if either configured color does not parse.
    pub fn from_config(cfg: &MixerConfig) -> Result<Self, CoreError> {
        let a = Rgb::from_hex(&cfg.color_a)?;
        let b = Rgb::from_hex(&cfg.color_b)?;
        Ok(Self::new(a, b, cfg.mode).with_tuning(MixTuning {
            saturation_boost: cfg.saturation_boost,
            lightness_damping: cfg.lightness_damping,
        }))
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: MixTuning) -> Self {
        self.tuning = tuning.sanitized();
        self
    }

    #[must_use]
    pub fn color_a(&self) -> Rgb {
        self.color_a
    }

    #[must_use]
    pub fn color_b(&self) -> Rgb {
        self.color_b
    }

    #[must_use]
    pub fn mode(&self) -> MixMode {
        self.mode
    }

    pub fn set_color_a(&mut self, color: Rgb) {
        self.color_a = color.clamped();
    }

    pub fn set_color_b(&mut self, color: Rgb) {
        self.color_b = color.clamped();
    }

    pub fn set_mode(&mut self, mode: MixMode) {
        self.mode = mode;
    }

    /// Advance to the next mode, wrapping.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Swap the two inputs.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.color_a, &mut self.color_b);
    }

    /// The blend of the current inputs under the current mode.
    #[must_use]
    pub fn mixed(&self) -> Rgb {
        mix(self.color_a, self.color_b, self.mode, self.tuning)
    }

    /// Mixed color plus its display strings.
    ///
    /// # Example
    /// ```
    /// use cl_mixer::Mixer;
    /// let r = Mixer::default().result();
    /// assert_eq!(r.hex, "#ffff00");
    /// assert_eq!(r.rgb, "rgb(255, 255, 0)");
    /// assert_eq!(r.cmy, "cmy(0%, 0%, 100%)");
    /// ```
    #[must_use]
    pub fn result(&self) -> MixResult {
        MixResult::new(self.color_a, self.color_b, self.mode, self.mixed())
    }
}

/// Snapshot handed to displays and the JSON output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MixResult {
    pub mode: MixMode,
    pub color_a: String,
    pub color_b: String,
    #[serde(skip)]
    pub mixed: Rgb,
    /// `#rrggbb`.
    pub hex: String,
    /// `rgb(r, g, b)`.
    pub rgb: String,
    /// `cmy(c%, m%, y%)`.
    pub cmy: String,
    /// `lab(L*, a*, b*)`.
    pub lab: String,
}

impl MixResult {
    #[must_use]
    pub fn new(color_a: Rgb, color_b: Rgb, mode: MixMode, mixed: Rgb) -> Self {
        Self {
            mode,
            color_a: color_a.to_hex(),
            color_b: color_b.to_hex(),
            mixed,
            hex: mixed.to_hex(),
            rgb: mixed.css_rgb(),
            cmy: mixed.cmy_percent(),
            lab: rgb_to_lab(mixed).notation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Rgb {
        Rgb::from_hex(s).unwrap()
    }

    #[test]
    fn mode_switch_recomputes_immediately() {
        let mut m = Mixer::new(hex("#ff0000"), hex("#00ff00"), MixMode::Additive);
        let additive = m.result();
        m.set_mode(MixMode::Overprint);
        let overprint = m.result();
        assert_eq!(additive.hex, "#ffff00");
        // Red ink over green ink absorbs everything.
        assert_eq!(overprint.hex, "#000000");
        m.set_mode(MixMode::Additive);
        assert_eq!(m.result(), additive);
    }

    #[test]
    fn input_change_recomputes() {
        let mut m = Mixer::default();
        m.set_color_b(hex("#0000ff"));
        assert_eq!(m.result().hex, "#ff00ff");
        m.swap();
        assert_eq!(m.color_a(), Rgb::BLUE);
        assert_eq!(m.result().hex, "#ff00ff");
    }

    #[test]
    fn cycling_visits_every_mode() {
        let mut m = Mixer::default();
        let mut seen = Vec::new();
        for _ in 0..MixMode::ALL.len() {
            seen.push(m.mode());
            m.cycle_mode();
        }
        assert_eq!(seen, MixMode::ALL);
        assert_eq!(m.mode(), MixMode::Additive);
    }

    #[test]
    fn from_config_reads_section() {
        let cfg = MixerConfig {
            mode: MixMode::Subtractive,
            color_a: "#0000ff".into(),
            color_b: "#ffff00".into(),
            ..cl_core::config::LabConfig::default().mixer
        };
        let m = Mixer::from_config(&cfg).unwrap();
        assert_eq!(m.mode(), MixMode::Subtractive);
        assert_eq!(m.color_b().to_hex(), "#ffff00");

        let bad = MixerConfig {
            color_a: "nope".into(),
            ..cfg
        };
        assert!(matches!(Mixer::from_config(&bad), Err(CoreError::InvalidHex { .. })));
    }

    #[test]
    fn lab_follows_the_mixed_color() {
        let m = Mixer::new(hex("#ffffff"), hex("#ffffff"), MixMode::Additive);
        assert_eq!(m.result().lab, "lab(100.0, 0.0, 0.0)");
        let black = Mixer::new(hex("#000000"), hex("#000000"), MixMode::Additive);
        assert_eq!(black.result().lab, "lab(0.0, 0.0, 0.0)");
    }

    #[test]
    fn result_serializes_strings() {
        let json = serde_json::to_value(Mixer::default().result()).unwrap();
        assert_eq!(json["mode"], "additive");
        assert_eq!(json["hex"], "#ffff00");
        assert!(json.get("mixed").is_none());
        assert!(json["lab"].as_str().unwrap().starts_with("lab(97.1, "));
    }
}
