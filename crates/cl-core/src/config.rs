use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::CoreError;
use crate::mix::{DEFAULT_LIGHTNESS_DAMPING, DEFAULT_SATURATION_BOOST, MAX_SATURATION_BOOST, MixTuning};

/// Configuration complète du laboratoire, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use cl_core::config::LabConfig;
/// let config = LabConfig::default();
/// assert_eq!(config.geometry.radius, 1.2);
/// assert_eq!(config.explorer.target_fps, 30);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LabConfig {
    pub geometry: GeometryConfig,
    pub marker: MarkerConfig,
    pub mixer: MixerConfig,
    pub diagram: DiagramConfig,
    pub spectrum: SpectrumConfig,
    pub palette: PaletteConfig,
    pub explorer: ExplorerConfig,
}

/// HSV cylinder, hue ring and RGB cube dimensions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeometryConfig {
    /// Cylinder radius R.
    pub radius: f64,
    /// Cylinder height H (centred on y = 0).
    pub height: f64,
    pub radial_segments: u32,
    pub height_segments: u32,
    /// Hue ring inner radius is `radius + ring_inner_offset`.
    pub ring_inner_offset: f64,
    /// Hue ring outer radius is `radius + ring_outer_offset`.
    pub ring_outer_offset: f64,
    pub ring_segments: u32,
    /// Subdivisions per cube face edge.
    pub cube_subdivisions: u32,
}

/// Initial marker state and dependent buffer resolutions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MarkerConfig {
    pub kind: MarkerKind,
    pub hue_deg: f64,
    pub value: f64,
    pub radius_fraction: f64,
    /// Side of the saturation × value preview raster.
    pub preview_size: u32,
    /// Samples along the value bar.
    pub value_bar_samples: u32,
    /// Samples along the saturation strip.
    pub saturation_samples: u32,
}

/// Two-color mixer inputs and lens animation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MixerConfig {
    pub mode: MixMode,
    /// `#rrggbb`.
    pub color_a: String,
    /// `#rrggbb`.
    pub color_b: String,
    /// Subtractive saturation boost [0.0, 1.2].
    pub saturation_boost: f64,
    /// Subtractive lightness exponent (0.0, 4.0].
    pub lightness_damping: f64,
    /// Lens raster side in pixels.
    pub lens_size: u32,
    pub molecule_count: u32,
    /// Seed of the molecule field.
    pub seed: u64,
}

/// CIE 1931 diagram raster.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DiagramConfig {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    /// Spline tension for the spectral locus.
    pub locus_tension: f64,
    /// Points evaluated per spline segment.
    pub locus_samples: u32,
    /// Distance between hatch lines, in pixels.
    pub hatch_spacing: u32,
}

/// Visible-spectrum strip and cone-response plot sizes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SpectrumConfig {
    pub width: u32,
    pub height: u32,
    pub cones_height: u32,
}

/// Palette grid layout.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PaletteConfig {
    pub cols: u32,
    pub rows: u32,
    /// Fixed blue channel of the red × green grid.
    pub blue: f64,
    /// Pixel size of one swatch when rasterised.
    pub cell_size: u32,
}

/// Interactive explorer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExplorerConfig {
    /// FPS cible.
    pub target_fps: u32,
    /// Hue change per key press, degrees.
    pub hue_step: f64,
    /// Value / radius change per key press.
    pub value_step: f64,
}

/// Mode de mélange de deux couleurs.
///
/// # Example
/// ```
/// use cl_core::config::MixMode;
/// let mode: MixMode = "subtractive".parse().unwrap();
/// assert_eq!(mode, MixMode::Subtractive);
/// assert_eq!(MixMode::default(), MixMode::Additive);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// Light: linear-light sum.
    #[default]
    #[serde(alias = "Additive")]
    Additive,
    /// Pigment: HSL circular mean / product blend.
    #[serde(alias = "Subtractive")]
    Subtractive,
    /// CMY ink coverage combination.
    #[serde(alias = "Overprint")]
    Overprint,
}

/// Marker visualization in the HSV cylinder.
///
/// # Example
/// ```
/// use cl_core::config::MarkerKind;
/// assert_eq!("plane".parse::<MarkerKind>(), Ok(MarkerKind::Plane));
/// assert!("cube".parse::<MarkerKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// A dot at the selected color.
    #[default]
    #[serde(alias = "Sphere")]
    Sphere,
    /// The constant-hue half-plane (saturation × value).
    #[serde(alias = "Plane")]
    Plane,
    /// The constant-value disc at the marker height.
    #[serde(alias = "Circle")]
    Circle,
}

impl MixMode {
    pub const ALL: [Self; 3] = [Self::Additive, Self::Subtractive, Self::Overprint];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Subtractive => "subtractive",
            Self::Overprint => "overprint",
        }
    }

    /// Next mode in [`MixMode::ALL`], wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Additive => Self::Subtractive,
            Self::Subtractive => Self::Overprint,
            Self::Overprint => Self::Additive,
        }
    }
}

impl MarkerKind {
    pub const ALL: [Self; 3] = [Self::Sphere, Self::Plane, Self::Circle];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Plane => "plane",
            Self::Circle => "circle",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Sphere => Self::Plane,
            Self::Plane => Self::Circle,
            Self::Circle => Self::Sphere,
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MixMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "mix mode",
                value: s.to_string(),
            })
    }
}

impl FromStr for MarkerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "marker kind",
                value: s.to_string(),
            })
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: 1.2,
            height: 2.4,
            radial_segments: 64,
            height_segments: 32,
            ring_inner_offset: 0.12,
            ring_outer_offset: 0.28,
            ring_segments: 128,
            cube_subdivisions: 4,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            kind: MarkerKind::Sphere,
            hue_deg: 0.0,
            value: 1.0,
            radius_fraction: 1.0,
            preview_size: 64,
            value_bar_samples: 32,
            saturation_samples: 32,
        }
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            mode: MixMode::Additive,
            color_a: "#ff0000".into(),
            color_b: "#00ff00".into(),
            saturation_boost: DEFAULT_SATURATION_BOOST,
            lightness_damping: DEFAULT_LIGHTNESS_DAMPING,
            lens_size: 132,
            molecule_count: 10,
            seed: 0x5eed,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 650,
            padding: 60,
            locus_tension: 0.2,
            locus_samples: 24,
            hatch_spacing: 8,
        }
    }
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 320,
            cones_height: 260,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            cols: 22,
            rows: 8,
            blue: 0.5,
            cell_size: 24,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            hue_step: 5.0,
            value_step: 0.05,
        }
    }
}

/// Raster sides accepted from configuration.
const RASTER_RANGE: (u32, u32) = (8, 4096);

fn clamp_f64(field: &str, value: &mut f64, lo: f64, hi: f64, fallback: f64) {
    let clamped = if value.is_finite() { value.clamp(lo, hi) } else { fallback };
    if clamped.to_bits() != value.to_bits() {
        log::warn!("{field} = {value} hors limites, ramené à {clamped}");
        *value = clamped;
    }
}

fn clamp_u32(field: &str, value: &mut u32, lo: u32, hi: u32) {
    let clamped = (*value).clamp(lo, hi);
    if clamped != *value {
        log::warn!("{field} = {value} hors limites, ramené à {clamped}");
        *value = clamped;
    }
}

impl LabConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        let (lo, hi) = RASTER_RANGE;

        let g = &mut self.geometry;
        clamp_f64("geometry.radius", &mut g.radius, 0.1, 100.0, 1.2);
        clamp_f64("geometry.height", &mut g.height, 0.1, 100.0, 2.4);
        clamp_u32("geometry.radial_segments", &mut g.radial_segments, 3, 1024);
        clamp_u32("geometry.height_segments", &mut g.height_segments, 1, 1024);
        clamp_f64("geometry.ring_inner_offset", &mut g.ring_inner_offset, 0.0, 10.0, 0.12);
        let inner = g.ring_inner_offset;
        clamp_f64("geometry.ring_outer_offset", &mut g.ring_outer_offset, inner + 0.01, 20.0, inner + 0.16);
        clamp_u32("geometry.ring_segments", &mut g.ring_segments, 3, 2048);
        clamp_u32("geometry.cube_subdivisions", &mut g.cube_subdivisions, 1, 256);

        let m = &mut self.marker;
        clamp_f64("marker.hue_deg", &mut m.hue_deg, f64::MIN, f64::MAX, 0.0);
        m.hue_deg = crate::color::wrap_hue(m.hue_deg);
        clamp_f64("marker.value", &mut m.value, 0.0, 1.0, 1.0);
        clamp_f64("marker.radius_fraction", &mut m.radius_fraction, 0.0, 1.0, 1.0);
        clamp_u32("marker.preview_size", &mut m.preview_size, lo, 1024);
        clamp_u32("marker.value_bar_samples", &mut m.value_bar_samples, 2, 1024);
        clamp_u32("marker.saturation_samples", &mut m.saturation_samples, 2, 1024);

        let x = &mut self.mixer;
        clamp_f64("mixer.saturation_boost", &mut x.saturation_boost, 0.0, MAX_SATURATION_BOOST, DEFAULT_SATURATION_BOOST);
        clamp_f64("mixer.lightness_damping", &mut x.lightness_damping, 0.05, 4.0, DEFAULT_LIGHTNESS_DAMPING);
        clamp_u32("mixer.lens_size", &mut x.lens_size, lo, 1024);
        clamp_u32("mixer.molecule_count", &mut x.molecule_count, 0, 256);

        let d = &mut self.diagram;
        clamp_u32("diagram.width", &mut d.width, lo, hi);
        clamp_u32("diagram.height", &mut d.height, lo, hi);
        let max_pad = d.width.min(d.height) / 2 - 1;
        clamp_u32("diagram.padding", &mut d.padding, 0, max_pad);
        clamp_f64("diagram.locus_tension", &mut d.locus_tension, 0.0, 1.0, 0.2);
        clamp_u32("diagram.locus_samples", &mut d.locus_samples, 1, 256);
        clamp_u32("diagram.hatch_spacing", &mut d.hatch_spacing, 2, 256);

        let s = &mut self.spectrum;
        clamp_u32("spectrum.width", &mut s.width, lo, hi);
        clamp_u32("spectrum.height", &mut s.height, lo, hi);
        clamp_u32("spectrum.cones_height", &mut s.cones_height, lo, hi);

        let p = &mut self.palette;
        clamp_u32("palette.cols", &mut p.cols, 1, 360);
        clamp_u32("palette.rows", &mut p.rows, 1, 256);
        clamp_f64("palette.blue", &mut p.blue, 0.0, 1.0, 0.5);
        clamp_u32("palette.cell_size", &mut p.cell_size, 1, 256);

        let e = &mut self.explorer;
        clamp_u32("explorer.target_fps", &mut e.target_fps, 1, 120);
        clamp_f64("explorer.hue_step", &mut e.hue_step, 0.1, 90.0, 5.0);
        clamp_f64("explorer.value_step", &mut e.value_step, 0.001, 0.5, 0.05);
    }

    /// Check the fields that cannot be clamped (color strings).
    ///
    /// # Errors
    /// [`CoreError::Config`] naming the first invalid color.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [("mixer.color_a", &self.mixer.color_a), ("mixer.color_b", &self.mixer.color_b)] {
            Rgb::from_hex(value).map_err(|e| CoreError::Config(format!("{field} : {e}")))?;
        }
        Ok(())
    }

    /// Subtractive blend parameters from the `[mixer]` section.
    #[must_use]
    pub fn mix_tuning(&self) -> MixTuning {
        MixTuning {
            saturation_boost: self.mixer.saturation_boost,
            lightness_damping: self.mixer.lightness_damping,
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    geometry: Option<GeometrySection>,
    marker: Option<MarkerSection>,
    mixer: Option<MixerSection>,
    diagram: Option<DiagramSection>,
    spectrum: Option<SpectrumSection>,
    palette: Option<PaletteSection>,
    explorer: Option<ExplorerSection>,
}

#[derive(Deserialize)]
struct GeometrySection {
    radius: Option<f64>,
    height: Option<f64>,
    radial_segments: Option<u32>,
    height_segments: Option<u32>,
    ring_inner_offset: Option<f64>,
    ring_outer_offset: Option<f64>,
    ring_segments: Option<u32>,
    cube_subdivisions: Option<u32>,
}

#[derive(Deserialize)]
struct MarkerSection {
    kind: Option<MarkerKind>,
    hue_deg: Option<f64>,
    value: Option<f64>,
    radius_fraction: Option<f64>,
    preview_size: Option<u32>,
    value_bar_samples: Option<u32>,
    saturation_samples: Option<u32>,
}

#[derive(Deserialize)]
struct MixerSection {
    mode: Option<MixMode>,
    color_a: Option<String>,
    color_b: Option<String>,
    saturation_boost: Option<f64>,
    lightness_damping: Option<f64>,
    lens_size: Option<u32>,
    molecule_count: Option<u32>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct DiagramSection {
    width: Option<u32>,
    height: Option<u32>,
    padding: Option<u32>,
    locus_tension: Option<f64>,
    locus_samples: Option<u32>,
    hatch_spacing: Option<u32>,
}

#[derive(Deserialize)]
struct SpectrumSection {
    width: Option<u32>,
    height: Option<u32>,
    cones_height: Option<u32>,
}

#[derive(Deserialize)]
struct PaletteSection {
    cols: Option<u32>,
    rows: Option<u32>,
    blue: Option<f64>,
    cell_size: Option<u32>,
}

#[derive(Deserialize)]
struct ExplorerSection {
    target_fps: Option<u32>,
    hue_step: Option<f64>,
    value_step: Option<f64>,
}

macro_rules! merge {
    ($target:expr, $section:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(v) = $section.$field {
                $target.$field = v;
            }
        )*
    };
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the document is not valid TOML, has an unknown
/// section, or names an invalid color.
///
/// # Example
/// ```
/// use cl_core::config::{parse_config, MixMode};
/// let config = parse_config("[mixer]\nmode = \"subtractive\"\n").unwrap();
/// assert_eq!(config.mixer.mode, MixMode::Subtractive);
/// assert_eq!(config.geometry.height, 2.4);
/// ```
pub fn parse_config(content: &str) -> Result<LabConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = LabConfig::default();

    if let Some(s) = file.geometry {
        merge!(config.geometry, s, [
            radius,
            height,
            radial_segments,
            height_segments,
            ring_inner_offset,
            ring_outer_offset,
            ring_segments,
            cube_subdivisions,
        ]);
    }
    if let Some(s) = file.marker {
        merge!(config.marker, s, [
            kind,
            hue_deg,
            value,
            radius_fraction,
            preview_size,
            value_bar_samples,
            saturation_samples,
        ]);
    }
    if let Some(s) = file.mixer {
        merge!(config.mixer, s, [
            mode,
            color_a,
            color_b,
            saturation_boost,
            lightness_damping,
            lens_size,
            molecule_count,
            seed,
        ]);
    }
    if let Some(s) = file.diagram {
        merge!(config.diagram, s, [
            width,
            height,
            padding,
            locus_tension,
            locus_samples,
            hatch_spacing,
        ]);
    }
    if let Some(s) = file.spectrum {
        merge!(config.spectrum, s, [width, height, cones_height]);
    }
    if let Some(s) = file.palette {
        merge!(config.palette, s, [cols, rows, blue, cell_size]);
    }
    if let Some(s) = file.explorer {
        merge!(config.explorer, s, [target_fps, hue_step, value_step]);
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use cl_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<LabConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content).with_context(|| format!("Configuration rejetée : {}", path.display()))?;
    log::debug!("configuration chargée depuis {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, LabConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let config = parse_config(
            "[geometry]\nradius = 2.0\n\n[marker]\nkind = \"Circle\"\nhue_deg = 400.0\n",
        )
        .unwrap();
        assert_eq!(config.geometry.radius, 2.0);
        assert_eq!(config.geometry.height, 2.4);
        assert_eq!(config.marker.kind, MarkerKind::Circle);
        assert!((config.marker.hue_deg - 40.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[mixer]\nsaturation_boost = 5.0\n\n[marker]\nvalue = -3.0\n\n[diagram]\nwidth = 1\n",
        )
        .unwrap();
        assert_eq!(config.mixer.saturation_boost, MAX_SATURATION_BOOST);
        assert_eq!(config.marker.value, 0.0);
        assert_eq!(config.diagram.width, RASTER_RANGE.0);
    }

    #[test]
    fn padding_never_swallows_the_raster() {
        let config = parse_config("[diagram]\nwidth = 100\nheight = 100\npadding = 500\n").unwrap();
        assert!(config.diagram.padding * 2 < config.diagram.width);
    }

    #[test]
    fn invalid_color_is_rejected() {
        assert!(parse_config("[mixer]\ncolor_a = \"#12345\"\n").is_err());
        assert!(parse_config("[mixer]\ncolor_b = \"#abc\"\n").is_ok());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(parse_config("[audio]\nsmoothing = 0.5\n").is_err());
    }

    #[test]
    fn enum_names_round_trip() {
        for mode in MixMode::ALL {
            assert_eq!(mode.name().parse::<MixMode>(), Ok(mode));
        }
        for kind in MarkerKind::ALL {
            assert_eq!(kind.to_string().parse::<MarkerKind>(), Ok(kind));
        }
        assert_eq!(MixMode::Overprint.next(), MixMode::Additive);
        assert_eq!(
            "ink".parse::<MixMode>(),
            Err(CoreError::UnknownVariant {
                kind: "mix mode",
                value: "ink".into()
            })
        );
    }

    #[test]
    fn enums_use_lowercase_names_in_toml() {
        let config = parse_config("[mixer]\nmode = \"subtractive\"\n\n[marker]\nkind = \"plane\"\n").unwrap();
        assert_eq!(config.mixer.mode, MixMode::Subtractive);
        assert_eq!(config.marker.kind, MarkerKind::Plane);
        // Capitalised names are still read.
        let legacy = parse_config("[mixer]\nmode = \"Overprint\"\n").unwrap();
        assert_eq!(legacy.mixer.mode, MixMode::Overprint);
        assert!(parse_config("[mixer]\nmode = \"ink\"\n").is_err());

        let text = toml::to_string(&LabConfig::default()).unwrap();
        assert!(text.contains("mode = \"additive\""), "{text}");
        assert!(text.contains("kind = \"sphere\""), "{text}");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[explorer]\ntarget_fps = 500").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.explorer.target_fps, 120);
        assert!(load_config(Path::new("/nonexistent/chromalab.toml")).is_err());
    }
}
