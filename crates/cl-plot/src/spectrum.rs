//! Visible-spectrum widget: an animated wave above a static color strip.
//!
//! The left and right 18 % stand for ultraviolet and infrared; there the
//! wave is drawn dotted gray and the strip fades to dark.

use std::f64::consts::TAU;

use cl_core::color::Rgb;
use cl_core::config::SpectrumConfig;
use cl_core::frame::{BlendMode, FrameBuffer};
use cl_core::spectrum::{SpectralBand, SpectrumLayout};
use cl_core::traits::Animation;

/// Wave amplitude in pixels.
pub const WAVE_AMPLITUDE: f64 = 36.0;
/// Local wavelength at the left edge, in pixels.
pub const MIN_WAVELENGTH_PX: f64 = 40.0;
/// Local wavelength at the right edge, in pixels.
pub const MAX_WAVELENGTH_PX: f64 = 160.0;
/// Phase advance per frame (one second of phase at 60 frames).
const PHASE_PER_FRAME: f64 = 1.0 / 60.0;
const STRIP_HEIGHT: u32 = 28;
const GUIDE_GRAY: Rgb = Rgb::new(187.0 / 255.0, 187.0 / 255.0, 187.0 / 255.0);

/// Wave + strip raster, animated by its phase.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumPlot {
    pub layout: SpectrumLayout,
    pub height: u32,
    phase: f64,
}

impl SpectrumPlot {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layout: SpectrumLayout::new(width),
            height,
            phase: 0.0,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &SpectrumConfig) -> Self {
        Self::new(cfg.width, cfg.height)
    }

    #[must_use]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Wave centre line.
    #[must_use]
    pub fn wave_y(&self) -> u32 {
        (self.height / 2).saturating_sub(WAVE_AMPLITUDE as u32 / 2)
    }

    /// First row of the color strip.
    #[must_use]
    pub fn strip_top(&self) -> u32 {
        self.wave_y() + WAVE_AMPLITUDE as u32 + 16
    }

    /// Wavelength of the drawn wave at column `x`: short on the left, long on the right.
    ///
    /// # Example
    /// ```
    /// use cl_plot::SpectrumPlot;
    /// let p = SpectrumPlot::new(700, 320);
    /// assert_eq!(p.local_wavelength(0), 40.0);
    /// assert!(p.local_wavelength(699) < 160.0);
    /// ```
    #[must_use]
    pub fn local_wavelength(&self, x: u32) -> f64 {
        let t = f64::from(x) / f64::from(self.layout.width.max(1));
        MIN_WAVELENGTH_PX + (MAX_WAVELENGTH_PX - MIN_WAVELENGTH_PX) * t
    }

    /// Vertical wave offset at column `x`, in [-amplitude, amplitude].
    #[must_use]
    pub fn wave_offset(&self, x: u32) -> f64 {
        (f64::from(x) / self.local_wavelength(x) * TAU + self.phase).sin() * WAVE_AMPLITUDE
    }

    /// Whether the wave is drawn at column `x` (always in the visible band,
    /// every other run of three columns outside it).
    #[must_use]
    pub fn wave_visible_at(&self, x: u32) -> bool {
        self.layout.band(x) == SpectralBand::Visible || x % 6 < 3
    }
}

impl Animation for SpectrumPlot {
    fn step(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.phase = (self.phase + dt * PHASE_PER_FRAME).rem_euclid(TAU);
        }
    }

    fn render(&self, target: &mut FrameBuffer) {
        target.fill(Rgb::WHITE);
        let width = self.layout.width.min(target.width);
        let wave_y = f64::from(self.wave_y());
        let strip_top = self.strip_top();

        for x in 0..width {
            // Wave, 1×2 px per column.
            if self.wave_visible_at(x) {
                let color = match self.layout.band(x) {
                    SpectralBand::Visible => self.layout.strip_color(x),
                    _ => GUIDE_GRAY,
                };
                let y = wave_y + self.wave_offset(x);
                if y >= 0.0 {
                    target.put(x, y as u32, color);
                    target.put(x, y as u32 + 1, color);
                }
            }
            let strip = self.layout.strip_color(x);
            for y in strip_top..strip_top + STRIP_HEIGHT {
                target.put(x, y, strip);
            }
        }

        let w = f64::from(width);
        let above_strip = f64::from(strip_top) - 8.0;
        let below_strip = f64::from(strip_top + STRIP_HEIGHT);
        target.draw_line((0.0, above_strip), (w, above_strip), 1.0, GUIDE_GRAY, 1.0, BlendMode::Normal);
        target.draw_line((0.0, below_strip), (w, below_strip), 1.0, GUIDE_GRAY, 1.0, BlendMode::Normal);

        // Band boundaries across the wave and the strip.
        for tx in [self.layout.visible_start, self.layout.visible_end] {
            let x = f64::from(tx);
            let wave_top = (wave_y - WAVE_AMPLITUDE - 8.0).max(0.0);
            target.draw_line((x, wave_top), (x, above_strip), 1.0, Rgb::BLACK, 0.22, BlendMode::Normal);
            target.draw_line((x, f64::from(strip_top)), (x, below_strip), 1.0, Rgb::BLACK, 0.22, BlendMode::Normal);
        }
    }

    fn name(&self) -> &'static str {
        "spectrum"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(plot: &SpectrumPlot) -> FrameBuffer {
        let mut fb = FrameBuffer::new(plot.layout.width, plot.height);
        plot.render(&mut fb);
        fb
    }

    #[test]
    fn strip_matches_layout_colors() {
        let plot = SpectrumPlot::new(700, 320);
        let fb = rendered(&plot);
        let y = plot.strip_top() + 10;
        for x in [0, 60, 200, 400, 600, 699] {
            if x == plot.layout.visible_start || x == plot.layout.visible_end {
                continue;
            }
            let (r, g, b) = plot.layout.strip_color(x).to_u8();
            assert_eq!(fb.pixel(x, y), (r, g, b, 255), "x = {x}");
        }
    }

    #[test]
    fn invisible_bands_are_dotted() {
        let plot = SpectrumPlot::new(700, 320);
        let fb = rendered(&plot);
        let top = plot.wave_y() - WAVE_AMPLITUDE as u32;
        let bottom = plot.wave_y() + WAVE_AMPLITUDE as u32 + 2;
        for x in [4, 5, 10, 695] {
            assert!(!plot.wave_visible_at(x));
            for y in top..bottom {
                assert_eq!(fb.rgb_at(x, y), Rgb::WHITE, "({x}, {y})");
            }
        }
        assert!(plot.wave_visible_at(1) && plot.wave_visible_at(300));
    }

    #[test]
    fn wave_color_follows_the_strip() {
        let plot = SpectrumPlot::new(700, 320);
        let fb = rendered(&plot);
        let x = 300;
        let y = (f64::from(plot.wave_y()) + plot.wave_offset(x)) as u32;
        assert_eq!(fb.rgb_at(x, y).to_u8(), plot.layout.strip_color(x).to_u8());
    }

    #[test]
    fn stepping_moves_the_wave() {
        let mut plot = SpectrumPlot::new(700, 320);
        let before: Vec<f64> = (0..50).map(|x| plot.wave_offset(x)).collect();
        plot.step(30.0);
        assert!((plot.phase() - 0.5).abs() < 1e-12);
        let after: Vec<f64> = (0..50).map(|x| plot.wave_offset(x)).collect();
        assert_ne!(before, after);
        assert!(after.iter().all(|o| o.abs() <= WAVE_AMPLITUDE));
    }
}
