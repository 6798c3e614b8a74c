//! Swatch grids: hue × lightness and red × green at a fixed blue.

use std::fmt;
use std::str::FromStr;

use cl_core::color::{Hsl, Rgb};
use cl_core::config::PaletteConfig;
use cl_core::error::CoreError;
use cl_core::frame::FrameBuffer;
use rayon::prelude::*;

/// Lightness of the top row of the hue grid.
const TOP_LIGHTNESS: f64 = 0.08;
/// Lightness of the bottom row of the hue grid.
const BOTTOM_LIGHTNESS: f64 = 0.92;

/// Which grid to lay out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteKind {
    /// Hue across columns, lightness down rows.
    #[default]
    HueLightness,
    /// Red across columns, green up rows, blue fixed.
    RedGreen,
}

impl PaletteKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HueLightness => "hs",
            Self::RedGreen => "rg",
        }
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaletteKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hs" | "hue" | "hue-lightness" => Ok(Self::HueLightness),
            "rg" | "red-green" => Ok(Self::RedGreen),
            _ => Err(CoreError::UnknownVariant {
                kind: "palette",
                value: s.to_string(),
            }),
        }
    }
}

fn fraction(i: u32, n: u32) -> f64 {
    f64::from(i) / f64::from(n.saturating_sub(1).max(1))
}

/// Color of cell (`col`, `row`), row 0 at the top.
///
/// # Example
/// ```
/// use cl_core::config::PaletteConfig;
/// use cl_plot::palette::{PaletteKind, swatch};
/// let cfg = PaletteConfig::default();
/// assert_eq!(swatch(PaletteKind::RedGreen, 0, 0, &cfg).to_hex(), "#00ff80");
/// ```
#[must_use]
pub fn swatch(kind: PaletteKind, col: u32, row: u32, cfg: &PaletteConfig) -> Rgb {
    let (u, v) = (fraction(col, cfg.cols), fraction(row, cfg.rows));
    match kind {
        PaletteKind::HueLightness => {
            let l = TOP_LIGHTNESS + v * (BOTTOM_LIGHTNESS - TOP_LIGHTNESS);
            let s = (1.0 - (0.5 - l).abs()).max(0.88);
            Hsl::new(u * 360.0, s, l).to_rgb()
        }
        PaletteKind::RedGreen => Rgb::new(u, 1.0 - v, cfg.blue).clamped(),
    }
}

/// All swatches, row-major.
#[must_use]
pub fn grid(kind: PaletteKind, cfg: &PaletteConfig) -> Vec<Rgb> {
    (0..cfg.rows)
        .flat_map(|row| (0..cfg.cols).map(move |col| swatch(kind, col, row, cfg)))
        .collect()
}

/// Rasterise the grid, `cell_size` pixels per swatch.
#[must_use]
pub fn render_palette(kind: PaletteKind, cfg: &PaletteConfig) -> FrameBuffer {
    let cell = cfg.cell_size.max(1);
    let mut fb = FrameBuffer::new(cfg.cols * cell, cfg.rows * cell);
    let colors = grid(kind, cfg);
    let cols = cfg.cols as usize;
    let stride = fb.stride();
    fb.data.par_chunks_exact_mut(stride).enumerate().for_each(|(y, line)| {
        let row = y / cell as usize;
        for (x, px) in line.chunks_exact_mut(4).enumerate() {
            let col = x / cell as usize;
            let (r, g, b) = colors[row * cols + col].to_u8();
            px.copy_from_slice(&[r, g, b, 255]);
        }
    });
    fb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_grid_wraps_and_lightens() {
        let cfg = PaletteConfig::default();
        let first = swatch(PaletteKind::HueLightness, 0, 0, &cfg);
        let last = swatch(PaletteKind::HueLightness, cfg.cols - 1, 0, &cfg);
        assert!(first.max_channel_delta(last) < 1e-9);
        let top = first.to_hsl();
        let bottom = swatch(PaletteKind::HueLightness, 0, cfg.rows - 1, &cfg).to_hsl();
        assert!((top.l - 0.08).abs() < 1e-9 && (bottom.l - 0.92).abs() < 1e-9);
        assert!((top.s - 0.88).abs() < 1e-9);
    }

    #[test]
    fn red_green_corners() {
        let cfg = PaletteConfig::default();
        let br = swatch(PaletteKind::RedGreen, cfg.cols - 1, cfg.rows - 1, &cfg);
        assert_eq!(br.to_hex(), "#ff0080");
    }

    #[test]
    fn raster_matches_grid() {
        let cfg = PaletteConfig {
            cols: 5,
            rows: 3,
            cell_size: 4,
            ..PaletteConfig::default()
        };
        let fb = render_palette(PaletteKind::HueLightness, &cfg);
        assert_eq!((fb.width, fb.height), (20, 12));
        let colors = grid(PaletteKind::HueLightness, &cfg);
        assert_eq!(colors.len(), 15);
        assert_eq!(fb.rgb_at(9, 5).to_u8(), colors[5 + 2].to_u8());
    }

    #[test]
    fn kind_names_parse() {
        assert_eq!("RG".parse::<PaletteKind>(), Ok(PaletteKind::RedGreen));
        assert_eq!(PaletteKind::HueLightness.to_string().parse::<PaletteKind>(), Ok(PaletteKind::HueLightness));
        assert!("cmyk".parse::<PaletteKind>().is_err());
    }
}
