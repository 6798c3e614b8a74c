//! Non-interactive subcommands: mix, marker, render, solid.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cl_core::cie::rgb_to_lab;
use cl_core::color::Rgb;
use cl_core::config::{LabConfig, MarkerKind, MixMode};
use cl_core::frame::FrameBuffer;
use cl_core::traits::Animation;
use cl_export::{save_png, save_meshes_json, write_meshes};
use cl_geometry::marker::{GuideLine, MarkerLayout, MarkerState, recompute_frame, sv_preview};
use cl_geometry::mesh::{ColoredMesh, hsv_solid, hue_ring_mesh, rgb_solid};
use cl_mixer::{Lens, Mixer};
use cl_plot::palette::render_palette;
use cl_plot::{ConePlot, GamutPlot, PaletteKind, SpectrumPlot};
use serde::Serialize;

use crate::cli::{RenderTarget, SolidKind};

fn parse_color(input: &str) -> Result<Rgb> {
    Rgb::from_hex(input).with_context(|| format!("Couleur invalide : {input}"))
}

/// `chromalab mix`.
///
/// # Errors
/// Fails on an invalid color or a write error.
pub fn mix(config: &LabConfig, a: &str, b: &str, mode: Option<MixMode>, json: bool, out: &mut impl Write) -> Result<()> {
    let mixer = Mixer::new(parse_color(a)?, parse_color(b)?, mode.unwrap_or(config.mixer.mode))
        .with_tuning(config.mix_tuning());
    let result = mixer.result();
    if json {
        serde_json::to_writer_pretty(&mut *out, &result)?;
        writeln!(out)?;
    } else {
        writeln!(out, "mode      {}", result.mode)?;
        writeln!(out, "A         {}", result.color_a)?;
        writeln!(out, "B         {}", result.color_b)?;
        writeln!(out, "résultat  {}  {}  {}", result.hex, result.rgb, result.cmy)?;
        writeln!(out, "          {}", result.lab)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ColorReport {
    hex: String,
    rgb: String,
    cmy: String,
    lab: String,
}

impl From<Rgb> for ColorReport {
    fn from(c: Rgb) -> Self {
        Self {
            hex: c.to_hex(),
            rgb: c.css_rgb(),
            cmy: c.cmy_percent(),
            lab: rgb_to_lab(c).notation(),
        }
    }
}

#[derive(Serialize)]
struct MarkerReport {
    hue_deg: f64,
    value: f64,
    radius_fraction: f64,
    kind: MarkerKind,
    position: [f64; 3],
    vertical_guide: [[f64; 3]; 2],
    radial_guide: [[f64; 3]; 2],
    marker_color: String,
    value_color: String,
    selected: ColorReport,
}

fn guide(g: GuideLine) -> [[f64; 3]; 2] {
    [g.from.to_array(), g.to.to_array()]
}

/// `chromalab marker`. Unset fields fall back to `[marker]`.
///
/// # Errors
/// Fails on a write error.
pub fn marker(
    config: &LabConfig,
    hue: Option<f64>,
    value: Option<f64>,
    radius: Option<f64>,
    kind: Option<MarkerKind>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let m = &config.marker;
    let state = MarkerState::new(
        hue.unwrap_or(m.hue_deg),
        value.unwrap_or(m.value),
        radius.unwrap_or(m.radius_fraction),
    );
    let kind = kind.unwrap_or(m.kind);
    let layout = MarkerLayout::from_config(&config.geometry, m);
    let frame = recompute_frame(&state, &layout, kind);

    let report = MarkerReport {
        hue_deg: state.hue_deg(),
        value: state.value(),
        radius_fraction: state.radius_fraction(),
        kind,
        position: frame.position.to_array(),
        vertical_guide: guide(frame.vertical_guide),
        radial_guide: guide(frame.radial_guide),
        marker_color: frame.marker_color.to_hex(),
        value_color: frame.value_color.to_hex(),
        selected: frame.selected_color.into(),
    };
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        let [x, y, z] = report.position;
        writeln!(out, "teinte    {:.1}°  valeur {:.3}  rayon {:.3}", report.hue_deg, report.value, report.radius_fraction)?;
        writeln!(out, "position  ({x:.4}, {y:.4}, {z:.4})")?;
        writeln!(out, "marqueur  {} ({kind})", report.marker_color)?;
        writeln!(out, "valeur    {}", report.value_color)?;
        writeln!(out, "sélection {}  {}  {}", report.selected.hex, report.selected.rgb, report.selected.cmy)?;
        writeln!(out, "          {}", report.selected.lab)?;
    }
    Ok(())
}

/// Options of `chromalab render` beyond the target.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub palette: PaletteKind,
    pub hue: Option<f64>,
    pub mode: Option<MixMode>,
    pub frames: u32,
    pub marks: Vec<String>,
}

/// Rasterise `target`.
///
/// # Errors
/// Fails on an invalid mark color or mixer color.
pub fn render_target(config: &LabConfig, target: RenderTarget, opts: &RenderOptions) -> Result<FrameBuffer> {
    let fb = match target {
        RenderTarget::Diagram => {
            let plot = GamutPlot::from_config(&config.diagram);
            let mut fb = plot.render();
            for hex in &opts.marks {
                let color = parse_color(hex)?;
                let c = plot.mark_color(&mut fb, color);
                log::info!("{hex} → xy ({:.4}, {:.4}) {:?}", c.x, c.y, plot.diagram.classify(c));
            }
            fb
        }
        RenderTarget::Spectrum => {
            let mut plot = SpectrumPlot::from_config(&config.spectrum);
            plot.step(f64::from(opts.frames));
            let mut fb = FrameBuffer::new(plot.layout.width, plot.height);
            plot.render(&mut fb);
            fb
        }
        RenderTarget::Cones => ConePlot::from_config(&config.spectrum).render(),
        RenderTarget::Palette => render_palette(opts.palette, &config.palette),
        RenderTarget::Preview => sv_preview(opts.hue.unwrap_or(config.marker.hue_deg), config.marker.preview_size),
        RenderTarget::Lens => {
            let mut mixer = Mixer::from_config(&config.mixer)?;
            if let Some(mode) = opts.mode {
                mixer.set_mode(mode);
            }
            let cfg = &config.mixer;
            let mut lens = Lens::for_mixer(&mixer, cfg.lens_size, cfg.molecule_count as usize, cfg.seed);
            for _ in 0..opts.frames {
                lens.step(1.0);
            }
            let mut fb = FrameBuffer::new(cfg.lens_size, cfg.lens_size);
            lens.render(&mut fb);
            fb
        }
    };
    Ok(fb)
}

/// `chromalab render`.
///
/// # Errors
/// Fails if the raster cannot be built or written.
pub fn render(config: &LabConfig, target: RenderTarget, opts: &RenderOptions, output: &Path) -> Result<()> {
    let fb = render_target(config, target, opts)?;
    save_png(&fb, output)
}

/// Vertex sets of one solid.
#[must_use]
pub fn solid_meshes(config: &LabConfig, kind: SolidKind) -> Vec<ColoredMesh> {
    let g = &config.geometry;
    match kind {
        SolidKind::Hsv => hsv_solid(g),
        SolidKind::Rgb => rgb_solid(g),
        SolidKind::Ring => vec![hue_ring_mesh(g)],
    }
}

/// `chromalab solid`: to `output`, or `out` when none is given.
///
/// # Errors
/// Fails if the JSON cannot be written.
pub fn solid(config: &LabConfig, kind: SolidKind, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let meshes = solid_meshes(config, kind);
    match output {
        Some(path) => save_meshes_json(&meshes, path),
        None => {
            write_meshes(&meshes, &mut *out)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_export::{MeshExport, load_png};

    fn run_mix(a: &str, b: &str, mode: MixMode, json: bool) -> String {
        let mut out = Vec::new();
        mix(&LabConfig::default(), a, b, Some(mode), json, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn mix_prints_every_notation() {
        let text = run_mix("#f00", "#00ff00", MixMode::Additive, false);
        assert!(text.contains("#ffff00"), "{text}");
        assert!(text.contains("rgb(255, 255, 0)"));
        assert!(text.contains("cmy(0%, 0%, 100%)"));
    }

    #[test]
    fn mix_json_is_parseable() {
        let text = run_mix("#ff0000", "#00ff00", MixMode::Overprint, true);
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["hex"], "#000000");
        assert_eq!(v["color_a"], "#ff0000");
        assert_eq!(v["mode"], "overprint");
    }

    #[test]
    fn mix_rejects_bad_hex() {
        let mut out = Vec::new();
        let err = mix(&LabConfig::default(), "#12", "#000", None, false, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("#12"));
    }

    #[test]
    fn marker_json_reports_guides() {
        let mut out = Vec::new();
        marker(&LabConfig::default(), Some(90.0), Some(0.5), Some(1.0), None, true, &mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let pos = &v["position"];
        assert_eq!(v["vertical_guide"][0][0], pos[0]);
        assert_eq!(v["vertical_guide"][1][2], pos[2]);
        assert_eq!(v["radial_guide"][1], *pos);
        assert_eq!(v["marker_color"], "#80ff00");
        assert_eq!(v["kind"], "sphere");
        assert!(v["selected"]["lab"].as_str().unwrap().starts_with("lab("));
    }

    #[test]
    fn every_target_renders_at_config_size() {
        let config = LabConfig::default();
        let opts = RenderOptions {
            frames: 3,
            marks: vec!["#3366cc".into()],
            ..RenderOptions::default()
        };
        let expect = [
            (RenderTarget::Diagram, (600, 650)),
            (RenderTarget::Spectrum, (700, 320)),
            (RenderTarget::Cones, (700, 260)),
            (RenderTarget::Palette, (22 * 24, 8 * 24)),
            (RenderTarget::Preview, (64, 64)),
            (RenderTarget::Lens, (132, 132)),
        ];
        for (target, size) in expect {
            let fb = render_target(&config, target, &opts).unwrap();
            assert_eq!((fb.width, fb.height), size, "{target:?}");
        }
    }

    #[test]
    fn lens_follows_mode_override() {
        let config = LabConfig::default();
        let lens = |mode| {
            let opts = RenderOptions {
                mode: Some(mode),
                ..RenderOptions::default()
            };
            render_target(&config, RenderTarget::Lens, &opts).unwrap()
        };
        assert_ne!(lens(MixMode::Additive).data, lens(MixMode::Subtractive).data);
    }

    #[test]
    fn render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let opts = RenderOptions {
            hue: Some(240.0),
            ..RenderOptions::default()
        };
        render(&LabConfig::default(), RenderTarget::Preview, &opts, &path).unwrap();
        let fb = load_png(&path).unwrap();
        assert_eq!(fb.rgb_at(63, 0), Rgb::BLUE);
    }

    #[test]
    fn solid_to_stdout_and_file() {
        let config = LabConfig::default();
        let mut out = Vec::new();
        solid(&config, SolidKind::Ring, None, &mut out).unwrap();
        let ring: Vec<MeshExport> = serde_json::from_slice(&out).unwrap();
        assert_eq!(ring.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.json");
        let mut unused = Vec::new();
        solid(&config, SolidKind::Rgb, Some(&path), &mut unused).unwrap();
        assert!(unused.is_empty());
        let text = std::fs::read_to_string(&path).unwrap();
        let cube: Vec<MeshExport> = serde_json::from_str(&text).unwrap();
        assert_eq!(cube.len(), solid_meshes(&config, SolidKind::Rgb).len());
    }
}
