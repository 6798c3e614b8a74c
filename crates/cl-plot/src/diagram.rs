//! CIE 1931 xy diagram: hatched spectral locus, filled sRGB triangle, grid.

use cl_core::cie::{Chromaticity, rgb_to_chromaticity};
use cl_core::color::Rgb;
use cl_core::config::DiagramConfig;
use cl_core::frame::{BlendMode, FrameBuffer};
use cl_geometry::gamut::{GamutDiagram, GamutRegion, SRGB_PRIMARIES};
use rayon::prelude::*;

/// Largest x shown on the horizontal axis.
pub const X_MAX: f64 = 0.8;
/// Largest y shown on the vertical axis.
pub const Y_MAX: f64 = 0.9;

const MINOR_GRID: Rgb = Rgb::new(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0);
const MAJOR_GRID: Rgb = Rgb::new(224.0 / 255.0, 224.0 / 255.0, 224.0 / 255.0);
const HATCH: Rgb = Rgb::new(208.0 / 255.0, 240.0 / 255.0, 208.0 / 255.0);

/// Pixel ↔ chromaticity mapping of the plot area.
///
/// # Example
/// ```
/// use cl_core::cie::Chromaticity;
/// use cl_plot::diagram::DiagramLayout;
/// let l = DiagramLayout { width: 600, height: 650, padding: 60 };
/// assert_eq!(l.to_screen(Chromaticity::new(0.0, 0.0)), (60.0, 590.0));
/// assert_eq!(l.to_screen(Chromaticity::new(0.8, 0.9)), (540.0, 60.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagramLayout {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

impl DiagramLayout {
    fn spans(&self) -> (f64, f64) {
        let pad2 = 2.0 * f64::from(self.padding);
        (
            (f64::from(self.width) - pad2).max(1.0),
            (f64::from(self.height) - pad2).max(1.0),
        )
    }

    #[must_use]
    pub fn to_screen(&self, c: Chromaticity) -> (f64, f64) {
        let (sx, sy) = self.spans();
        let pad = f64::from(self.padding);
        (
            pad + c.x / X_MAX * sx,
            f64::from(self.height) - pad - c.y / Y_MAX * sy,
        )
    }

    #[must_use]
    pub fn from_screen(&self, px: f64, py: f64) -> Chromaticity {
        let (sx, sy) = self.spans();
        let pad = f64::from(self.padding);
        Chromaticity::new(
            (px - pad) / sx * X_MAX,
            (f64::from(self.height) - pad - py) / sy * Y_MAX,
        )
    }
}

/// Le diagramme de gamut prêt à rastériser.
#[derive(Clone, Debug)]
pub struct GamutPlot {
    pub layout: DiagramLayout,
    pub diagram: GamutDiagram,
    hatch_spacing: u32,
}

impl GamutPlot {
    #[must_use]
    pub fn from_config(cfg: &DiagramConfig) -> Self {
        let diagram = GamutDiagram::srgb(cfg.locus_tension, cfg.locus_samples);
        log::debug!("locus spectral : {} points", diagram.locus.len());
        Self {
            layout: DiagramLayout {
                width: cfg.width,
                height: cfg.height,
                padding: cfg.padding,
            },
            diagram,
            hatch_spacing: cfg.hatch_spacing.max(2),
        }
    }

    /// Full diagram: grid, axes, hatched locus, filled triangle, outlines and
    /// the primaries and white point.
    ///
    /// # Example
    /// ```
    /// use cl_core::config::DiagramConfig;
    /// use cl_plot::GamutPlot;
    /// let cfg = DiagramConfig { width: 120, height: 130, padding: 12, ..Default::default() };
    /// let fb = GamutPlot::from_config(&cfg).render();
    /// assert_eq!((fb.width, fb.height), (120, 130));
    /// ```
    #[must_use]
    pub fn render(&self) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.layout.width, self.layout.height);
        fb.fill(Rgb::WHITE);
        self.draw_grid(&mut fb);
        self.fill_regions(&mut fb);
        self.draw_outlines(&mut fb);
        let p = self.diagram.primaries;
        self.mark(&mut fb, p.red, Rgb::from_u8(0xff, 0x33, 0x33));
        self.mark(&mut fb, p.green, Rgb::from_u8(0x33, 0xff, 0x33));
        self.mark(&mut fb, p.blue, Rgb::from_u8(0x33, 0x33, 0xff));
        self.mark(&mut fb, p.white, Rgb::WHITE);
        fb
    }

    fn draw_grid(&self, fb: &mut FrameBuffer) {
        let l = self.layout;
        // Minor lines every 0.05 first so the major ones paint over them.
        for (step, color) in [(0.05, MINOR_GRID), (0.1, MAJOR_GRID)] {
            let cols = (X_MAX / step).round() as u32;
            for i in 0..=cols {
                let x = f64::from(i) * step;
                let from = l.to_screen(Chromaticity::new(x, 0.0));
                let to = l.to_screen(Chromaticity::new(x, Y_MAX));
                fb.draw_line(from, to, 1.0, color, 1.0, BlendMode::Normal);
            }
            let rows = (Y_MAX / step).round() as u32;
            for j in 0..=rows {
                let y = f64::from(j) * step;
                let from = l.to_screen(Chromaticity::new(0.0, y));
                let to = l.to_screen(Chromaticity::new(X_MAX, y));
                fb.draw_line(from, to, 1.0, color, 1.0, BlendMode::Normal);
            }
        }
        let origin = l.to_screen(Chromaticity::new(0.0, 0.0));
        fb.draw_line(origin, l.to_screen(Chromaticity::new(X_MAX, 0.0)), 1.0, Rgb::BLACK, 1.0, BlendMode::Normal);
        fb.draw_line(origin, l.to_screen(Chromaticity::new(0.0, Y_MAX)), 1.0, Rgb::BLACK, 1.0, BlendMode::Normal);
    }

    /// Triangle interior gets the primaries' blend, the rest of the locus
    /// gets 45° hatching. Rows are independent and filled in parallel.
    fn fill_regions(&self, fb: &mut FrameBuffer) {
        let layout = self.layout;
        let spacing = self.hatch_spacing as usize;
        let stride = fb.stride();
        fb.data.par_chunks_exact_mut(stride).enumerate().for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let c = layout.from_screen(x as f64 + 0.5, py);
                let color = match self.diagram.classify(c) {
                    GamutRegion::InGamut => self.diagram.primaries.interior_color(c),
                    GamutRegion::OutOfGamut if (x + y) % spacing == 0 => HATCH,
                    _ => continue,
                };
                let (r, g, b) = color.to_u8();
                px.copy_from_slice(&[r, g, b, 255]);
            }
        });
    }

    fn draw_outlines(&self, fb: &mut FrameBuffer) {
        let l = self.layout;
        let closed = |pts: &[Chromaticity], fb: &mut FrameBuffer| {
            for (i, &a) in pts.iter().enumerate() {
                let b = pts[(i + 1) % pts.len()];
                fb.draw_line(l.to_screen(a), l.to_screen(b), 1.0, Rgb::BLACK, 1.0, BlendMode::Normal);
            }
        };
        closed(&self.diagram.locus, fb);
        closed(&self.diagram.primaries.triangle(), fb);
    }

    /// The triangle the diagram fills.
    #[must_use]
    pub fn srgb_triangle() -> [Chromaticity; 3] {
        SRGB_PRIMARIES.triangle()
    }

    /// Outlined dot at a chromaticity.
    pub fn mark(&self, fb: &mut FrameBuffer, c: Chromaticity, fill: Rgb) {
        let (x, y) = self.layout.to_screen(c);
        fb.fill_disc(x, y, 6.0, Rgb::BLACK, 1.0, BlendMode::Normal);
        fb.fill_disc(x, y, 5.0, fill, 1.0, BlendMode::Normal);
    }

    /// Place an sRGB color at its chromaticity, filled with itself.
    ///
    /// Returns where it landed so callers can label or classify it.
    pub fn mark_color(&self, fb: &mut FrameBuffer, color: Rgb) -> Chromaticity {
        let c = rgb_to_chromaticity(color);
        self.mark(fb, c, color);
        c
    }
}

impl Default for GamutPlot {
    fn default() -> Self {
        Self::from_config(&DiagramConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GamutPlot {
        GamutPlot::from_config(&DiagramConfig {
            width: 240,
            height: 260,
            padding: 24,
            ..DiagramConfig::default()
        })
    }

    #[test]
    fn screen_mapping_round_trips() {
        let l = DiagramLayout {
            width: 600,
            height: 650,
            padding: 60,
        };
        for c in GamutPlot::srgb_triangle() {
            let (x, y) = l.to_screen(c);
            let back = l.from_screen(x, y);
            assert!(back.distance(c) < 1e-12);
        }
    }

    #[test]
    fn primaries_corner_is_tinted_by_its_primary() {
        let plot = small();
        let fb = plot.render();
        let p = plot.diagram.primaries;
        // A point a quarter of the way from the red vertex to the white point.
        let near_red = Chromaticity::new(
            p.red.x + (p.white.x - p.red.x) * 0.25,
            p.red.y + (p.white.y - p.red.y) * 0.25,
        );
        let (x, y) = plot.layout.to_screen(near_red);
        let (r, g, b, _) = fb.pixel(x as u32, y as u32);
        assert!(r > g && r > b, "({r}, {g}, {b})");
    }

    #[test]
    fn outside_locus_keeps_background() {
        let plot = small();
        let fb = plot.render();
        // Top-right of the plot area: x = 0.75, y = 0.85 is not a real color.
        let (x, y) = plot.layout.to_screen(Chromaticity::new(0.75, 0.85));
        let (r, g, b, a) = fb.pixel(x as u32 + 2, y as u32 + 2);
        assert_eq!(a, 255);
        assert!(r.min(g).min(b) >= 224, "({r}, {g}, {b})");
    }

    #[test]
    fn hatching_only_inside_locus() {
        let plot = small();
        let fb = plot.render();
        let hatch = HATCH.to_u8();
        let mut hatched = 0;
        for y in 0..fb.height {
            for x in 0..fb.width {
                let (r, g, b, _) = fb.pixel(x, y);
                if (r, g, b) == hatch {
                    hatched += 1;
                    let c = plot.layout.from_screen(f64::from(x) + 0.5, f64::from(y) + 0.5);
                    assert!(plot.diagram.locus_contains(c));
                }
            }
        }
        assert!(hatched > 50);
    }

    #[test]
    fn mark_color_places_red_on_its_primary() {
        let plot = small();
        let mut fb = FrameBuffer::new(240, 260);
        let c = plot.mark_color(&mut fb, Rgb::RED);
        assert!(c.distance(plot.diagram.primaries.red) < 1e-3);
        let (x, y) = plot.layout.to_screen(c);
        assert_eq!(fb.rgb_at(x as u32, y as u32), Rgb::RED);
    }
}
