//! Animated previews shown next to the mixer.
//!
//! Both are decorative: the wave lens suggests light adding up, the molecule
//! field suggests pigment absorbing it. Neither feeds back into the mix.

use std::f64::consts::TAU;

use cl_core::color::Rgb;
use cl_core::config::MixMode;
use cl_core::frame::{BlendMode, FrameBuffer};
use cl_core::traits::Animation;

use crate::mixer::Mixer;

/// Reference side length the drawing constants are tuned for.
const REFERENCE_SIZE: f64 = 132.0;
/// Wave stroke width at the reference size.
const WAVE_STROKE: f64 = 6.0;
/// Bond stroke width at the reference size.
const BOND_STROKE: f64 = 2.0;
/// Phase advance per frame of the wave lens.
const WAVE_TIME_STEP: f64 = 0.05;
/// Molecules may drift this far past an edge before wrapping.
const WRAP_MARGIN: f64 = 40.0;
/// Atom colors: cyan, magenta, yellow inks.
const INK_PALETTE: [Rgb; 3] = [
    Rgb::new(0.0, 188.0 / 255.0, 212.0 / 255.0),
    Rgb::new(1.0, 0.0, 170.0 / 255.0),
    Rgb::new(1.0, 230.0 / 255.0, 0.0),
];

/// One sine wave of the additive lens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub amplitude: f64,
    /// Spatial frequency, radians per pixel.
    pub frequency: f64,
    /// Phase speed, radians per unit time.
    pub speed: f64,
    pub color: Rgb,
    pub alpha: f64,
}

impl WaveParams {
    /// Derive frequency and speed from the hue: red is the slowest,
    /// longest wave and both grow monotonically towards violet.
    ///
    /// # Example
    /// ```
    /// use cl_core::color::Rgb;
    /// use cl_mixer::lens::WaveParams;
    /// let red = WaveParams::for_color(Rgb::RED, 18.0, 0.55);
    /// let blue = WaveParams::for_color(Rgb::BLUE, 18.0, 0.55);
    /// assert!((red.frequency - 0.05).abs() < 1e-12);
    /// assert!(blue.frequency > red.frequency && blue.speed > red.speed);
    /// ```
    #[must_use]
    pub fn for_color(color: Rgb, amplitude: f64, alpha: f64) -> Self {
        let norm = color.hue() / 360.0;
        Self {
            amplitude,
            frequency: 0.05 + norm * 0.23,
            speed: 0.4 + norm * 0.6,
            color,
            alpha,
        }
    }
}

/// Three waves (A, B, mixed) composited with additive blending.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveLens {
    waves: [WaveParams; 3],
    mixed: Rgb,
    time: f64,
}

impl WaveLens {
    #[must_use]
    pub fn new(a: Rgb, b: Rgb, mixed: Rgb) -> Self {
        Self {
            waves: Self::waves_for(a, b, mixed),
            mixed,
            time: 0.0,
        }
    }

    fn waves_for(a: Rgb, b: Rgb, mixed: Rgb) -> [WaveParams; 3] {
        [
            WaveParams::for_color(a, 18.0, 0.55),
            WaveParams::for_color(b, 14.0, 0.55),
            WaveParams::for_color(mixed, 10.0, 0.5),
        ]
    }

    /// Replace the colors, keeping the current phase.
    pub fn set_colors(&mut self, a: Rgb, b: Rgb, mixed: Rgb) {
        self.waves = Self::waves_for(a, b, mixed);
        self.mixed = mixed;
    }

    #[must_use]
    pub fn waves(&self) -> &[WaveParams; 3] {
        &self.waves
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Vertical offset of wave `index` at column `x`.
    #[must_use]
    pub fn wave_y(&self, index: usize, x: f64) -> f64 {
        self.waves.get(index).map_or(0.0, |w| {
            (x * w.frequency + self.time * w.speed + index as f64).sin() * w.amplitude
        })
    }
}

impl Animation for WaveLens {
    fn step(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            // Phase is periodic; keep it small so it never loses precision.
            self.time = (self.time + WAVE_TIME_STEP * dt).rem_euclid(TAU * 1000.0);
        }
    }

    fn render(&self, target: &mut FrameBuffer) {
        target.clear();
        let (w, h) = (f64::from(target.width), f64::from(target.height));
        let k = w.min(h) / REFERENCE_SIZE;
        let mid = h / 2.0;

        for (i, wave) in self.waves.iter().enumerate() {
            let path: Vec<(f64, f64)> = (0..target.width)
                .map(|x| {
                    let px = f64::from(x);
                    (px, mid + self.wave_y(i, px) * k)
                })
                .collect();
            target.stroke_polyline(&path, WAVE_STROKE * k, wave.color, wave.alpha, BlendMode::Lighter);
        }

        // Soft ellipse of the mixed color over the centre.
        let (rx, ry) = (70.0 * k, 40.0 * k);
        let (inner, outer) = (10.0 * k, 70.0 * k);
        for y in 0..target.height {
            for x in 0..target.width {
                let dx = f64::from(x) + 0.5 - w / 2.0;
                let dy = f64::from(y) + 0.5 - mid;
                if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                    continue;
                }
                let alpha = 0.65 * radial_falloff(dx.hypot(dy), inner, outer);
                target.blend_pixel(x, y, self.mixed, alpha, BlendMode::Lighter);
            }
        }
    }

    fn name(&self) -> &'static str {
        "waves"
    }
}

/// Linear ramp from 1 at `inner` to 0 at `outer`.
fn radial_falloff(d: f64, inner: f64, outer: f64) -> f64 {
    if d <= inner {
        1.0
    } else if d >= outer {
        0.0
    } else {
        1.0 - (d - inner) / (outer - inner)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Atom {
    offset_radius: f64,
    offset_angle: f64,
    size: f64,
    color: Rgb,
}

/// A nucleus with 3 to 5 orbiting atoms.
#[derive(Clone, Debug, PartialEq)]
pub struct Molecule {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    rotation: f64,
    rotation_speed: f64,
    atoms: Vec<Atom>,
}

impl Molecule {
    fn random(rng: &mut fastrand::Rng, width: f64, height: f64) -> Self {
        let mut signed = |scale: f64| (rng.f64() * 2.0 - 1.0) * scale;
        let (vx, vy, rotation_speed) = (signed(0.04), signed(0.04), signed(0.004));
        let atoms = (0..rng.usize(3..=5))
            .map(|_| Atom {
                offset_radius: 12.0 + rng.f64() * 26.0,
                offset_angle: rng.f64() * TAU,
                size: 6.0 + rng.f64() * 5.0,
                color: INK_PALETTE[rng.usize(..INK_PALETTE.len())],
            })
            .collect();
        Self {
            x: rng.f64() * width,
            y: rng.f64() * height,
            vx,
            vy,
            rotation: rng.f64() * TAU,
            rotation_speed,
            atoms,
        }
    }

    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    fn atom_positions(&self) -> impl Iterator<Item = (f64, f64, &Atom)> {
        self.atoms.iter().map(|a| {
            let angle = a.offset_angle + self.rotation;
            (
                self.x + angle.cos() * a.offset_radius,
                self.y + angle.sin() * a.offset_radius,
                a,
            )
        })
    }
}

/// Drifting molecules composited with multiplicative blending.
#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeField {
    width: f64,
    height: f64,
    molecules: Vec<Molecule>,
}

impl MoleculeField {
    /// Seeded field, so a given seed always produces the same layout.
    #[must_use]
    pub fn new(width: u32, height: u32, count: usize, seed: u64) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let mut rng = fastrand::Rng::with_seed(seed);
        let molecules = (0..count).map(|_| Molecule::random(&mut rng, w, h)).collect();
        log::debug!("champ de {count} molécules (graine {seed:#x})");
        Self {
            width: w,
            height: h,
            molecules,
        }
    }

    #[must_use]
    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    /// Range every molecule centre stays within.
    #[must_use]
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        (
            (-WRAP_MARGIN, self.width + WRAP_MARGIN),
            (-WRAP_MARGIN, self.height + WRAP_MARGIN),
        )
    }
}

fn wrap(v: f64, extent: f64) -> f64 {
    let lo = -WRAP_MARGIN;
    let span = extent + 2.0 * WRAP_MARGIN;
    if v < lo || v > lo + span {
        lo + (v - lo).rem_euclid(span)
    } else {
        v
    }
}

impl Animation for MoleculeField {
    fn step(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for m in &mut self.molecules {
            m.x = wrap(m.x + m.vx * dt, self.width);
            m.y = wrap(m.y + m.vy * dt, self.height);
            m.rotation = (m.rotation + m.rotation_speed * dt).rem_euclid(TAU);
        }
    }

    fn render(&self, target: &mut FrameBuffer) {
        // Paper.
        target.fill(Rgb::WHITE);
        let bond = Rgb::from_u8(60, 60, 60);
        let spoke = Rgb::from_u8(50, 50, 50);
        let nucleus = Rgb::from_u8(40, 40, 40);

        let k = self.width.min(self.height) / REFERENCE_SIZE;

        for m in &self.molecules {
            let atoms: Vec<(f64, f64, &Atom)> = m.atom_positions().collect();
            // Closed ring through the atoms.
            let ring: Vec<(f64, f64)> = atoms
                .iter()
                .chain(atoms.first())
                .map(|&(x, y, _)| (x, y))
                .collect();
            target.stroke_polyline(&ring, BOND_STROKE * k, bond, 0.35, BlendMode::Multiply);
            target.fill_disc(m.x, m.y, 4.0, nucleus, 0.5, BlendMode::Multiply);
            for &(ax, ay, _) in &atoms {
                target.draw_line((m.x, m.y), (ax, ay), 1.0, spoke, 0.3, BlendMode::Multiply);
            }
            for &(ax, ay, atom) in &atoms {
                target.fill_disc(ax, ay, atom.size, atom.color, 1.0, BlendMode::Multiply);
            }
        }

        // Dark core fading out from the centre.
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let (inner, outer) = (10.0 * k, 80.0 * k);
        for y in 0..target.height {
            for x in 0..target.width {
                let d = (f64::from(x) + 0.5 - cx).hypot(f64::from(y) + 0.5 - cy);
                if d < outer {
                    target.blend_pixel(x, y, Rgb::BLACK, 0.35 * radial_falloff(d, inner, outer), BlendMode::Normal);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "molecules"
    }
}

/// The lens matching a mix mode: waves for light, molecules for pigments.
#[derive(Clone, Debug, PartialEq)]
pub enum Lens {
    Waves(WaveLens),
    Molecules(MoleculeField),
}

impl Lens {
    /// Lens for the mixer's current mode.
    ///
    /// # Example
    /// ```
    /// use cl_core::config::MixMode;
    /// use cl_core::traits::Animation;
    /// use cl_mixer::{Lens, Mixer};
    /// let mut mixer = Mixer::default();
    /// assert_eq!(Lens::for_mixer(&mixer, 132, 10, 1).name(), "waves");
    /// mixer.set_mode(MixMode::Subtractive);
    /// assert_eq!(Lens::for_mixer(&mixer, 132, 10, 1).name(), "molecules");
    /// ```
    #[must_use]
    pub fn for_mixer(mixer: &Mixer, size: u32, molecule_count: usize, seed: u64) -> Self {
        match mixer.mode() {
            MixMode::Additive => Self::Waves(WaveLens::new(mixer.color_a(), mixer.color_b(), mixer.mixed())),
            MixMode::Subtractive | MixMode::Overprint => {
                Self::Molecules(MoleculeField::new(size, size, molecule_count, seed))
            }
        }
    }

    /// Follow input changes without restarting the animation.
    pub fn sync(&mut self, mixer: &Mixer) {
        if let Self::Waves(w) = self {
            w.set_colors(mixer.color_a(), mixer.color_b(), mixer.mixed());
        }
    }
}

impl Animation for Lens {
    fn step(&mut self, dt: f64) {
        match self {
            Self::Waves(w) => w.step(dt),
            Self::Molecules(m) => m.step(dt),
        }
    }

    fn render(&self, target: &mut FrameBuffer) {
        match self {
            Self::Waves(w) => w.render(target),
            Self::Molecules(m) => m.render(target),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Waves(w) => w.name(),
            Self::Molecules(m) => m.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecules_stay_bounded() {
        let mut field = MoleculeField::new(132, 132, 10, 42);
        let ((x0, x1), (y0, y1)) = field.bounds();
        for frame in 0..20_000 {
            // Mix ordinary frames with a few very long ones.
            field.step(if frame % 997 == 0 { 5_000.0 } else { 1.0 });
            for m in field.molecules() {
                assert!(m.x >= x0 && m.x <= x1, "x = {}", m.x);
                assert!(m.y >= y0 && m.y <= y1, "y = {}", m.y);
            }
        }
    }

    #[test]
    fn field_is_seeded() {
        let a = MoleculeField::new(132, 132, 10, 7);
        let b = MoleculeField::new(132, 132, 10, 7);
        assert_eq!(a, b);
        assert_eq!(a.molecules().len(), 10);
        assert!(a.molecules().iter().all(|m| (3..=5).contains(&m.atom_count())));
    }

    #[test]
    fn invalid_steps_are_ignored() {
        let mut field = MoleculeField::new(64, 64, 3, 1);
        let before = field.clone();
        field.step(f64::NAN);
        field.step(-1.0);
        assert_eq!(field, before);

        let mut waves = WaveLens::new(Rgb::RED, Rgb::GREEN, Rgb::new(1.0, 1.0, 0.0));
        waves.step(f64::INFINITY);
        assert_eq!(waves.time(), 0.0);
        waves.step(2.0);
        assert!((waves.time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn wave_frequency_is_monotonic_in_hue() {
        let freqs: Vec<f64> = [0.0, 60.0, 120.0, 240.0, 300.0]
            .into_iter()
            .map(|h| WaveParams::for_color(cl_core::color::Hsv::new(h, 1.0, 1.0).to_rgb(), 10.0, 0.5).frequency)
            .collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]), "{freqs:?}");
        assert!(freqs.iter().all(|f| (0.05..=0.28).contains(f)));
    }

    #[test]
    fn wave_render_lights_the_centre() {
        let lens = WaveLens::new(Rgb::RED, Rgb::GREEN, Rgb::new(1.0, 1.0, 0.0));
        let mut fb = FrameBuffer::new(132, 132);
        lens.render(&mut fb);
        let (r, g, _, a) = fb.pixel(66, 66);
        assert!(r > 100 && g > 100 && a > 0);
        // Corners stay dark: nothing reaches them.
        assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    }

    #[test]
    fn wave_strokes_scale_and_do_not_build_up() {
        // A black mix adds nothing, leaving the two red strokes alone.
        let lens = WaveLens::new(Rgb::RED, Rgb::RED, Rgb::BLACK);
        let column = |size: u32| {
            let mut fb = FrameBuffer::new(size, size);
            lens.render(&mut fb);
            (0..size).map(|y| fb.pixel(1, y).0).filter(|&r| r > 0).collect::<Vec<u8>>()
        };
        let small = column(132);
        let large = column(264);
        assert!(small.len() >= 5, "{small:?}");
        assert!(large.len() > small.len() + 4, "{} vs {}", large.len(), small.len());
        // The strokes do not cross at x = 1: each lit pixel got 0.55 once.
        let single = (0.55_f64 * 255.0).round() as u8;
        assert!(small.iter().all(|&r| r == single), "{small:?}");
    }

    #[test]
    fn molecule_render_darkens_centre() {
        let field = MoleculeField::new(132, 132, 0, 1);
        let mut fb = FrameBuffer::new(132, 132);
        field.render(&mut fb);
        let centre = fb.pixel(66, 66).0;
        let corner = fb.pixel(0, 0).0;
        assert!(centre < corner, "{centre} vs {corner}");
    }

    #[test]
    fn lens_sync_keeps_phase() {
        let mut mixer = Mixer::default();
        let mut lens = Lens::for_mixer(&mixer, 132, 10, 1);
        lens.step(4.0);
        mixer.set_color_b(Rgb::BLUE);
        lens.sync(&mixer);
        match &lens {
            Lens::Waves(w) => {
                assert!((w.time() - 0.2).abs() < 1e-12);
                assert_eq!(w.waves()[1].color, Rgb::BLUE);
            }
            Lens::Molecules(_) => panic!("expected waves"),
        }
    }
}
