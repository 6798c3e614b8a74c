//! Per-sample color synthesis for the parametric color solids.
//!
//! Every sampler maps a local position to color-space parameters and
//! delegates to the conversions of `cl_core::color`. Positions use the
//! y-up convention: the HSV cylinder stands on the y axis, centred on the
//! origin, and hue runs counter-clockwise in the xz plane from +x.

use cl_core::color::{Hsv, Rgb, clamp01, wrap_hue};
use cl_core::traits::ColorSampler;
use glam::DVec3;

/// Hue angle (degrees) of a point around the y axis.
///
/// Hue 0 (red) lies on +x and hue grows towards +z, the same convention as
/// the marker position, so a marker sits on the wall of its own hue.
///
/// On the axis itself (x = z = 0) the angle is undefined; hue 0 is returned.
///
/// # Example
/// ```
/// use cl_geometry::sampler::hue_from_xz;
/// assert_eq!(hue_from_xz(0.0, 0.0), 0.0);
/// assert!((hue_from_xz(0.0, 1.0) - 90.0).abs() < 1e-9);
/// assert!((hue_from_xz(-1.0, -1e-12) - 180.0).abs() < 1e-6);
/// ```
#[inline]
#[must_use]
pub fn hue_from_xz(x: f64, z: f64) -> f64 {
    if x == 0.0 && z == 0.0 {
        return 0.0;
    }
    wrap_hue(z.atan2(x).to_degrees())
}

/// Radial distance from the y axis divided by `radius`, clamped to [0, 1].
#[inline]
#[must_use]
pub fn radial_fraction(x: f64, z: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    clamp01(x.hypot(z) / radius)
}

/// Height within a solid of height `height` centred on y = 0, mapped to [0, 1].
#[inline]
#[must_use]
pub fn height_fraction(y: f64, height: f64) -> f64 {
    if height <= 0.0 {
        return 0.0;
    }
    clamp01((y + height / 2.0) / height)
}

/// Which part of the HSV cylinder a sample belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CylinderSurface {
    /// Side wall: value follows height.
    Wall,
    /// Top disc: value is exactly 1.
    TopCap,
    /// Bottom disc: value is exactly 0.
    BottomCap,
}

/// L'espace HSV en cylindre : angle → teinte, rayon → saturation, hauteur → valeur.
///
/// # Example
/// ```
/// use cl_core::traits::ColorSampler;
/// use cl_geometry::sampler::HsvCylinder;
/// use glam::DVec3;
///
/// let wall = HsvCylinder::wall(1.2, 2.4);
/// // Outer wall at +x, top edge: pure red.
/// assert_eq!(wall.sample(DVec3::new(1.2, 1.2, 0.0)).to_hex(), "#ff0000");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HsvCylinder {
    pub radius: f64,
    pub height: f64,
    pub surface: CylinderSurface,
}

impl HsvCylinder {
    #[must_use]
    pub fn wall(radius: f64, height: f64) -> Self {
        Self { radius, height, surface: CylinderSurface::Wall }
    }

    #[must_use]
    pub fn top_cap(radius: f64, height: f64) -> Self {
        Self { radius, height, surface: CylinderSurface::TopCap }
    }

    #[must_use]
    pub fn bottom_cap(radius: f64, height: f64) -> Self {
        Self { radius, height, surface: CylinderSurface::BottomCap }
    }

    /// HSV coordinates of a sample, before conversion.
    #[must_use]
    pub fn hsv_at(&self, p: DVec3) -> Hsv {
        let h = hue_from_xz(p.x, p.z);
        let s = radial_fraction(p.x, p.z, self.radius);
        let v = match self.surface {
            CylinderSurface::Wall => height_fraction(p.y, self.height),
            CylinderSurface::TopCap => 1.0,
            CylinderSurface::BottomCap => 0.0,
        };
        Hsv::new(h, s, v)
    }
}

impl ColorSampler for HsvCylinder {
    fn sample(&self, position: DVec3) -> Rgb {
        self.hsv_at(position).to_rgb()
    }

    fn name(&self) -> &'static str {
        match self.surface {
            CylinderSurface::Wall => "hsv-wall",
            CylinderSurface::TopCap => "hsv-top-cap",
            CylinderSurface::BottomCap => "hsv-bottom-cap",
        }
    }
}

/// Annulus around the cylinder colored by fully saturated hue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HueRing;

impl ColorSampler for HueRing {
    fn sample(&self, position: DVec3) -> Rgb {
        Hsv::new(hue_from_xz(position.x, position.z), 1.0, 1.0).to_rgb()
    }

    fn name(&self) -> &'static str {
        "hue-ring"
    }
}

/// The RGB cube spanning [-1, 1]³: the cube is the color space.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::traits::ColorSampler;
/// use cl_geometry::sampler::RgbCube;
/// use glam::DVec3;
/// assert_eq!(RgbCube.sample(DVec3::new(1.0, -1.0, -1.0)), Rgb::RED);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RgbCube;

impl ColorSampler for RgbCube {
    fn sample(&self, p: DVec3) -> Rgb {
        Rgb::new((p.x + 1.0) / 2.0, (p.y + 1.0) / 2.0, (p.z + 1.0) / 2.0).clamped()
    }

    fn name(&self) -> &'static str {
        "rgb-cube"
    }
}

/// Constant-hue half-plane through the cylinder axis: radius → saturation, height → value.
///
/// The hue comes from the live marker state, not from the sample angle, so
/// samples on the axis keep the selected hue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturationValuePlane {
    pub hue_deg: f64,
    pub radius: f64,
    pub height: f64,
}

impl ColorSampler for SaturationValuePlane {
    fn sample(&self, p: DVec3) -> Rgb {
        let s = radial_fraction(p.x, p.z, self.radius);
        let v = height_fraction(p.y, self.height);
        Hsv::new(self.hue_deg, s, v).to_rgb()
    }

    fn name(&self) -> &'static str {
        "sv-plane"
    }
}

/// Horizontal disc at a fixed value: angle → hue, radius → saturation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueDisc {
    pub value: f64,
    pub radius: f64,
}

impl ColorSampler for ValueDisc {
    fn sample(&self, p: DVec3) -> Rgb {
        let h = hue_from_xz(p.x, p.z);
        let s = radial_fraction(p.x, p.z, self.radius);
        Hsv::new(h, s, clamp01(self.value)).to_rgb()
    }

    fn name(&self) -> &'static str {
        "value-disc"
    }
}

/// Vertical gradient at one hue: bottom value 0, top value 1, full saturation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueBar {
    pub hue_deg: f64,
}

impl ValueBar {
    /// `n` colors from bottom (value 0) to top (value 1).
    ///
    /// # Example
    /// ```
    /// use cl_geometry::sampler::ValueBar;
    /// let bar = ValueBar { hue_deg: 120.0 }.colors(5);
    /// assert_eq!(bar[0].to_hex(), "#000000");
    /// assert_eq!(bar[4].to_hex(), "#00ff00");
    /// ```
    #[must_use]
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        ramp(n)
            .map(|t| Hsv::new(self.hue_deg, 1.0, t).to_rgb())
            .collect()
    }
}

/// Radial gradient at one hue and value: saturation 0 at the axis → 1 at the rim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturationStrip {
    pub hue_deg: f64,
    pub value: f64,
}

impl SaturationStrip {
    /// `n` colors from the axis (saturation 0) outwards.
    #[must_use]
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        let v = clamp01(self.value);
        ramp(n)
            .map(|t| Hsv::new(self.hue_deg, t, v).to_rgb())
            .collect()
    }
}

/// `n` evenly spaced parameters covering [0, 1], endpoints included.
fn ramp(n: usize) -> impl Iterator<Item = f64> {
    let last = n.saturating_sub(1).max(1) as f64;
    (0..n).map(move |i| i as f64 / last)
}

/// Interleave colors as `[r, g, b, r, g, b, ...]` single-precision floats,
/// the layout of a GPU vertex color attribute.
#[must_use]
pub fn flatten_colors(colors: &[Rgb]) -> Vec<f32> {
    colors
        .iter()
        .flat_map(|c| [c.r as f32, c.g as f32, c.b as f32])
        .collect()
}
