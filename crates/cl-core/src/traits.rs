use glam::DVec3;
use rayon::prelude::*;

use crate::color::Rgb;
use crate::frame::FrameBuffer;

/// Maps a sample position of some parametric domain to a color.
///
/// Implémenté par : `HsvCylinder`, `HueRing`, `RgbCube`, `SaturationValuePlane`.
/// Sampling is pure: the same position always yields the same color.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::traits::ColorSampler;
/// use glam::DVec3;
///
/// struct Gray;
/// impl ColorSampler for Gray {
///     fn sample(&self, p: DVec3) -> Rgb { Rgb::new(p.y, p.y, p.y) }
///     fn name(&self) -> &'static str { "gray" }
/// }
/// let colors = Gray.sample_all(&[DVec3::ZERO, DVec3::Y]);
/// assert_eq!(colors[1], Rgb::WHITE);
/// ```
pub trait ColorSampler: Send + Sync {
    /// Couleur au point `position` (coordonnées locales de la forme).
    fn sample(&self, position: DVec3) -> Rgb;

    /// Nom lisible pour le debug/UI.
    fn name(&self) -> &'static str;

    /// One color per position, aligned 1:1 with the input.
    fn sample_all(&self, positions: &[DVec3]) -> Vec<Rgb> {
        positions.par_iter().map(|&p| self.sample(p)).collect()
    }
}

/// Decorative animation advanced by explicit time steps.
///
/// The internal state (particles, phases) is owned by the implementor and has
/// no contract beyond staying bounded.
///
/// # Example
/// ```
/// use cl_core::frame::FrameBuffer;
/// use cl_core::traits::Animation;
///
/// struct Idle(f64);
/// impl Animation for Idle {
///     fn step(&mut self, dt: f64) { self.0 += dt; }
///     fn render(&self, _target: &mut FrameBuffer) {}
///     fn name(&self) -> &'static str { "idle" }
/// }
/// let mut a = Idle(0.0);
/// a.step(0.5);
/// assert_eq!(a.0, 0.5);
/// ```
pub trait Animation: Send {
    /// Avance l'état de `dt` (unités de frame).
    fn step(&mut self, dt: f64);

    /// Dessine l'état courant dans `target`.
    fn render(&self, target: &mut FrameBuffer);

    fn name(&self) -> &'static str;
}
