//! Relative response of the rods and the three cone types, 380 → 700 nm.

use cl_core::color::Rgb;
use cl_core::config::SpectrumConfig;
use cl_core::frame::{BlendMode, FrameBuffer};
use cl_core::spectrum::{RESPONSE_CURVES, VISIBLE_MAX_NM, VISIBLE_MIN_NM};

const LEFT: f64 = 60.0;
const RIGHT_MARGIN: f64 = 30.0;
const TOP: f64 = 30.0;
const BOTTOM_MARGIN: f64 = 40.0;
/// Sampling step of the plotted curves.
const CURVE_STEP_NM: f64 = 0.5;

/// Background tint stops, from the UV end to the IR end.
const BACKGROUND_STOPS: [(f64, u32); 9] = [
    (0.00, 0xe6e6fa),
    (0.08, 0xb6a1ff),
    (0.18, 0x3a6cff),
    (0.32, 0x00ffea),
    (0.48, 0xbaffb6),
    (0.62, 0xfff9b6),
    (0.75, 0xffd6b6),
    (0.90, 0xffb6b6),
    (1.00, 0xfbe6e6),
];

fn rgb_of(hex: u32) -> Rgb {
    Rgb::from_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Piecewise-linear background tint at `t` in [0, 1].
///
/// # Example
/// ```
/// use cl_plot::cones::background_tint;
/// assert_eq!(background_tint(0.0).to_hex(), "#e6e6fa");
/// assert_eq!(background_tint(1.0).to_hex(), "#fbe6e6");
/// ```
#[must_use]
pub fn background_tint(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    for pair in BACKGROUND_STOPS.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let (a, b) = (rgb_of(c0), rgb_of(c1));
            return Rgb::new(
                a.r + (b.r - a.r) * f,
                a.g + (b.g - a.g) * f,
                a.b + (b.b - a.b) * f,
            );
        }
    }
    rgb_of(BACKGROUND_STOPS[BACKGROUND_STOPS.len() - 1].1)
}

/// Cone/rod response chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConePlot {
    pub width: u32,
    pub height: u32,
}

impl ConePlot {
    #[must_use]
    pub fn from_config(cfg: &SpectrumConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.cones_height,
        }
    }

    fn plot_width(&self) -> f64 {
        (f64::from(self.width) - LEFT - RIGHT_MARGIN).max(1.0)
    }

    fn baseline(&self) -> f64 {
        f64::from(self.height) - BOTTOM_MARGIN
    }

    /// Column of a wavelength.
    #[must_use]
    pub fn nm_to_x(&self, nm: f64) -> f64 {
        LEFT + (nm - VISIBLE_MIN_NM) / (VISIBLE_MAX_NM - VISIBLE_MIN_NM) * self.plot_width()
    }

    /// Row of a relative response in [0, 1].
    #[must_use]
    pub fn response_to_y(&self, response: f64) -> f64 {
        self.baseline() - response * (f64::from(self.height) - 2.0 * BOTTOM_MARGIN).max(1.0)
    }

    /// Wavelengths with an axis tick label.
    #[must_use]
    pub fn tick_wavelengths() -> [f64; 4] {
        [400.0, 500.0, 600.0, 700.0]
    }

    #[must_use]
    pub fn render(&self) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.width, self.height);
        fb.fill(Rgb::WHITE);

        let (x0, x1) = (LEFT, LEFT + self.plot_width());
        let (y0, y1) = (TOP.max(0.0) as u32, self.baseline().max(0.0) as u32);
        for x in x0 as u32..(x1 as u32).min(self.width) {
            let tint = background_tint((f64::from(x) - x0) / (x1 - x0));
            for y in y0..y1 {
                fb.put(x, y, tint);
            }
        }

        let axis = Rgb::from_u8(0x22, 0x22, 0x22);
        let base = self.baseline();
        fb.draw_line((x0, base), (x1, base), 1.0, axis, 1.0, BlendMode::Normal);
        fb.draw_line((x0, base), (x0, TOP), 1.0, axis, 1.0, BlendMode::Normal);

        let samples = ((VISIBLE_MAX_NM - VISIBLE_MIN_NM) / CURVE_STEP_NM).round() as u32;
        for curve in &RESPONSE_CURVES {
            let point = |i: u32| {
                let nm = VISIBLE_MIN_NM + f64::from(i) * CURVE_STEP_NM;
                (self.nm_to_x(nm), self.response_to_y(curve.response_at(nm)))
            };
            let mut prev = point(0);
            for i in 1..=samples {
                let next = point(i);
                fb.draw_line(prev, next, 2.0, curve.color, 1.0, BlendMode::Normal);
                prev = next;
            }
        }

        // Legend swatches along the top edge.
        let legend_x = f64::from(self.width) / 2.0 - 180.0;
        for (i, curve) in RESPONSE_CURVES.iter().enumerate() {
            let x = legend_x + i as f64 * 120.0;
            fb.draw_line((x, 18.0), (x + 40.0, 18.0), 3.0, curve.color, 1.0, BlendMode::Normal);
        }
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> ConePlot {
        ConePlot::from_config(&SpectrumConfig::default())
    }

    #[test]
    fn axis_mapping() {
        let p = plot();
        assert_eq!(p.nm_to_x(380.0), 60.0);
        assert_eq!(p.nm_to_x(700.0), f64::from(p.width) - 30.0);
        assert_eq!(p.response_to_y(0.0), f64::from(p.height) - 40.0);
        assert_eq!(p.response_to_y(1.0), 40.0);
    }

    #[test]
    fn curve_peaks_are_drawn_in_their_color() {
        let p = plot();
        let fb = p.render();
        for curve in &RESPONSE_CURVES {
            let x = p.nm_to_x(curve.peak_nm);
            let y = p.response_to_y(curve.height);
            assert_eq!(fb.rgb_at(x as u32, y as u32).to_u8(), curve.color.to_u8(), "{}", curve.label);
        }
    }

    #[test]
    fn background_is_tinted() {
        let p = plot();
        let fb = p.render();
        // Near the top of the plot at 690 nm every curve is far below.
        let (r, g, b, _) = fb.pixel(p.nm_to_x(690.0) as u32, 34);
        assert!(r > g && r > b, "({r}, {g}, {b})");
        // Outside the plot area stays white.
        assert_eq!(fb.rgb_at(5, p.height - 5), Rgb::WHITE);
    }

    #[test]
    fn tint_interpolates_between_stops() {
        let mid = background_tint(0.04);
        let (a, b) = (rgb_of(0xe6e6fa), rgb_of(0xb6a1ff));
        assert!((mid.r - (a.r + b.r) / 2.0).abs() < 1e-12);
        assert_eq!(background_tint(-3.0), a);
    }
}
