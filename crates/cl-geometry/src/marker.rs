//! Marker state → per-frame render attributes.
//!
//! The marker has no modes of its own: each tick the owner passes the current
//! [`MarkerState`] to [`recompute_frame`], which rebuilds every dependent
//! element (position, colors, gradients, guides, preview) from scratch.

use cl_core::color::{Hsv, Rgb, clamp01, wrap_hue};
use cl_core::config::{GeometryConfig, MarkerConfig, MarkerKind};
use cl_core::frame::FrameBuffer;
use glam::DVec3;
use rayon::prelude::*;

use crate::mesh::{ColoredMesh, filled_disc, hue_plane};
use crate::sampler::{SaturationStrip, SaturationValuePlane, ValueBar, ValueDisc};

/// Sliders driving the marker: hue in [0, 360), value and radius fraction in [0, 1].
///
/// Constructors and setters clamp, so a state read by the renderer is always
/// in range and free of NaN.
///
/// # Example
/// ```
/// use cl_geometry::marker::MarkerState;
/// let s = MarkerState::new(370.0, 1.4, -0.2);
/// assert_eq!((s.hue_deg(), s.value(), s.radius_fraction()), (10.0, 1.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerState {
    hue_deg: f64,
    value: f64,
    radius_fraction: f64,
}

impl Default for MarkerState {
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}

impl MarkerState {
    #[must_use]
    pub fn new(hue_deg: f64, value: f64, radius_fraction: f64) -> Self {
        Self {
            hue_deg: wrap_hue(hue_deg),
            value: clamp01(value),
            radius_fraction: clamp01(radius_fraction),
        }
    }

    /// Initial state from the `[marker]` section.
    #[must_use]
    pub fn from_config(m: &MarkerConfig) -> Self {
        Self::new(m.hue_deg, m.value, m.radius_fraction)
    }

    #[must_use]
    pub fn hue_deg(&self) -> f64 {
        self.hue_deg
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn radius_fraction(&self) -> f64 {
        self.radius_fraction
    }

    /// Replace all three fields at once.
    pub fn set(&mut self, hue_deg: f64, value: f64, radius_fraction: f64) {
        *self = Self::new(hue_deg, value, radius_fraction);
    }

    /// Rotate the hue, wrapping around 360.
    pub fn nudge_hue(&mut self, delta_deg: f64) {
        self.hue_deg = wrap_hue(self.hue_deg + delta_deg);
    }

    pub fn nudge_value(&mut self, delta: f64) {
        self.value = clamp01(self.value + delta);
    }

    pub fn nudge_radius(&mut self, delta: f64) {
        self.radius_fraction = clamp01(self.radius_fraction + delta);
    }

    /// The color the marker designates: `hsv(hue, radius_fraction, value)`.
    #[must_use]
    pub fn selected_color(&self) -> Rgb {
        Hsv::new(self.hue_deg, self.radius_fraction, self.value).to_rgb()
    }
}

/// Fixed dimensions the marker is laid out against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerLayout {
    /// Outer radius reached at `radius_fraction = 1`.
    pub radius: f64,
    pub height: f64,
    pub value_bar_samples: usize,
    pub saturation_samples: usize,
    pub preview_size: u32,
    /// Sphere marker radius.
    pub sphere_radius: f64,
    /// Grid resolution of the plane and circle visuals.
    pub visual_segments: u32,
}

impl Default for MarkerLayout {
    fn default() -> Self {
        Self::from_config(&GeometryConfig::default(), &MarkerConfig::default())
    }
}

impl MarkerLayout {
    #[must_use]
    pub fn from_config(g: &GeometryConfig, m: &MarkerConfig) -> Self {
        Self {
            radius: g.radius,
            height: g.height,
            value_bar_samples: m.value_bar_samples as usize,
            saturation_samples: m.saturation_samples as usize,
            preview_size: m.preview_size.max(2),
            sphere_radius: g.radius * 0.06,
            visual_segments: 16,
        }
    }

    /// World position of a state: polar (r·R, θ) in xz, height from value.
    #[must_use]
    pub fn position(&self, state: &MarkerState) -> DVec3 {
        let r = state.radius_fraction * self.radius;
        let (sin, cos) = state.hue_deg.to_radians().sin_cos();
        DVec3::new(r * cos, self.value_height(state.value), r * sin)
    }

    /// y coordinate of a value in [0, 1].
    #[must_use]
    pub fn value_height(&self, value: f64) -> f64 {
        value * self.height - self.height / 2.0
    }
}

/// Straight guide segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideLine {
    pub from: DVec3,
    pub to: DVec3,
}

/// Geometry and color of the marker itself, one shape per [`MarkerKind`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerVisual {
    /// Dot at the marker position.
    Sphere { center: DVec3, radius: f64, color: Rgb },
    /// Constant-hue half-plane, saturation outwards and value upwards.
    Plane(ColoredMesh),
    /// Constant-value disc at the marker height.
    Circle(ColoredMesh),
}

impl MarkerVisual {
    #[must_use]
    pub fn kind(&self) -> MarkerKind {
        match self {
            Self::Sphere { .. } => MarkerKind::Sphere,
            Self::Plane(_) => MarkerKind::Plane,
            Self::Circle(_) => MarkerKind::Circle,
        }
    }
}

/// Build the visual for `kind` from the current state.
#[must_use]
pub fn compute_marker_visual(kind: MarkerKind, state: &MarkerState, layout: &MarkerLayout) -> MarkerVisual {
    let n = layout.visual_segments;
    match kind {
        MarkerKind::Sphere => MarkerVisual::Sphere {
            center: layout.position(state),
            radius: layout.sphere_radius,
            color: marker_color(state),
        },
        MarkerKind::Plane => {
            let sampler = SaturationValuePlane {
                hue_deg: state.hue_deg,
                radius: layout.radius,
                height: layout.height,
            };
            let positions = hue_plane(state.hue_deg, layout.radius, layout.height, n, n);
            MarkerVisual::Plane(ColoredMesh::sample("marker-plane", positions, &sampler))
        }
        MarkerKind::Circle => {
            let sampler = ValueDisc {
                value: state.value,
                radius: layout.radius,
            };
            let positions = filled_disc(layout.radius, layout.value_height(state.value), n * 4, n);
            MarkerVisual::Circle(ColoredMesh::sample("marker-circle", positions, &sampler))
        }
    }
}

/// Pure hue at full saturation and value.
#[must_use]
pub fn marker_color(state: &MarkerState) -> Rgb {
    Hsv::new(state.hue_deg, 1.0, 1.0).to_rgb()
}

/// Everything downstream of the marker state for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderAttributes {
    /// The state these attributes were computed from.
    pub state: MarkerState,
    pub position: DVec3,
    /// `hsv(hue, 1, 1)`.
    pub marker_color: Rgb,
    /// `hsv(hue, 1, value)`: the value bar's color at the marker height.
    pub value_color: Rgb,
    /// `hsv(hue, radius_fraction, value)`.
    pub selected_color: Rgb,
    /// Bottom (value 0) to top (value 1) at the current hue.
    pub value_bar: Vec<Rgb>,
    /// Axis (saturation 0) to rim (saturation 1) at the current hue and value.
    pub saturation_strip: Vec<Rgb>,
    /// Full-height line through the marker's (x, z).
    pub vertical_guide: GuideLine,
    /// From the axis to the marker, at the marker height.
    pub radial_guide: GuideLine,
    /// Saturation × value raster at the current hue.
    pub preview: FrameBuffer,
    pub visual: MarkerVisual,
}

/// Recompute every marker-dependent element from `state`.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_core::config::MarkerKind;
/// use cl_geometry::marker::{MarkerLayout, MarkerState, recompute_frame};
/// use glam::DVec3;
///
/// let layout = MarkerLayout::default();
/// let frame = recompute_frame(&MarkerState::new(0.0, 1.0, 1.0), &layout, MarkerKind::Sphere);
/// assert_eq!(frame.position, DVec3::new(layout.radius, layout.height / 2.0, 0.0));
/// assert_eq!(frame.marker_color, Rgb::RED);
/// ```
#[must_use]
pub fn recompute_frame(state: &MarkerState, layout: &MarkerLayout, kind: MarkerKind) -> RenderAttributes {
    let position = layout.position(state);
    let half = layout.height / 2.0;
    let hue = state.hue_deg;

    RenderAttributes {
        state: *state,
        position,
        marker_color: marker_color(state),
        value_color: Hsv::new(hue, 1.0, state.value).to_rgb(),
        selected_color: state.selected_color(),
        value_bar: ValueBar { hue_deg: hue }.colors(layout.value_bar_samples),
        saturation_strip: SaturationStrip {
            hue_deg: hue,
            value: state.value,
        }
        .colors(layout.saturation_samples),
        vertical_guide: GuideLine {
            from: DVec3::new(position.x, -half, position.z),
            to: DVec3::new(position.x, half, position.z),
        },
        radial_guide: GuideLine {
            from: DVec3::new(0.0, position.y, 0.0),
            to: position,
        },
        preview: sv_preview(hue, layout.preview_size),
        visual: compute_marker_visual(kind, state, layout),
    }
}

/// Square saturation × value raster at `hue_deg`: saturation grows to the
/// right, value grows upwards.
///
/// # Example
/// ```
/// use cl_core::color::Rgb;
/// use cl_geometry::marker::sv_preview;
/// let fb = sv_preview(0.0, 16);
/// assert_eq!(fb.rgb_at(0, 0), Rgb::WHITE);
/// assert_eq!(fb.rgb_at(15, 0), Rgb::RED);
/// assert_eq!(fb.rgb_at(15, 15), Rgb::BLACK);
/// ```
#[must_use]
pub fn sv_preview(hue_deg: f64, size: u32) -> FrameBuffer {
    let size = size.max(2);
    let mut fb = FrameBuffer::new(size, size);
    let last = f64::from(size - 1);
    let stride = fb.stride();
    fb.data.par_chunks_exact_mut(stride).enumerate().for_each(|(y, row)| {
        let v = 1.0 - y as f64 / last;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let s = x as f64 / last;
            let (r, g, b) = Hsv::new(hue_deg, s, v).to_rgb().to_u8();
            px.copy_from_slice(&[r, g, b, 255]);
        }
    });
    fb
}

/// Inverse of [`sv_preview`]: pointer coordinates → (saturation, value), clamped.
///
/// # Example
/// ```
/// use cl_geometry::marker::pick_from_preview;
/// assert_eq!(pick_from_preview(0.0, 0.0, 16), (0.0, 1.0));
/// assert_eq!(pick_from_preview(40.0, 99.0, 16), (1.0, 0.0));
/// ```
#[must_use]
pub fn pick_from_preview(x: f64, y: f64, size: u32) -> (f64, f64) {
    let last = f64::from(size.max(2) - 1);
    (clamp01(x / last), clamp01(1.0 - y / last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_guide_tracks_marker_exactly() {
        let layout = MarkerLayout::default();
        let mut rng = fastrand::Rng::with_seed(3);
        let mut state = MarkerState::default();
        for _ in 0..300 {
            state.set(rng.f64() * 720.0 - 180.0, rng.f64() * 1.4 - 0.2, rng.f64() * 1.4 - 0.2);
            let f = recompute_frame(&state, &layout, MarkerKind::Sphere);
            assert_eq!(f.vertical_guide.from.x, f.position.x);
            assert_eq!(f.vertical_guide.from.z, f.position.z);
            assert_eq!(f.vertical_guide.to.x, f.position.x);
            assert_eq!(f.vertical_guide.to.z, f.position.z);
            assert_eq!(f.radial_guide.to, f.position);
            assert_eq!(f.radial_guide.from.y, f.position.y);
        }
    }

    #[test]
    fn zero_radius_collapses_to_axis() {
        let layout = MarkerLayout::default();
        let f = recompute_frame(&MarkerState::new(240.0, 0.5, 0.0), &layout, MarkerKind::Sphere);
        assert_eq!(f.position, DVec3::ZERO);
        assert_eq!(f.marker_color, Rgb::BLUE);
        assert_eq!(f.value_color.to_hex(), "#000080");
        assert!(!f.position.is_nan());
    }

    #[test]
    fn position_ignores_hue_at_zero_radius() {
        let layout = MarkerLayout::default();
        let a = layout.position(&MarkerState::new(10.0, 0.3, 0.0));
        let b = layout.position(&MarkerState::new(200.0, 0.3, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn dependent_buffers_follow_hue() {
        let layout = MarkerLayout::default();
        let f = recompute_frame(&MarkerState::new(120.0, 0.5, 0.5), &layout, MarkerKind::Sphere);
        assert_eq!(f.value_bar.len(), layout.value_bar_samples);
        assert_eq!(f.value_bar.last().map(|c| c.to_hex()), Some("#00ff00".into()));
        assert_eq!(f.saturation_strip.len(), layout.saturation_samples);
        assert_eq!(f.preview.width, layout.preview_size);
        assert_eq!(f.preview.rgb_at(layout.preview_size - 1, 0), Rgb::GREEN);
    }

    #[test]
    fn recompute_is_a_pure_function_of_state() {
        let layout = MarkerLayout::default();
        let s = MarkerState::new(33.0, 0.7, 0.4);
        let first = recompute_frame(&s, &layout, MarkerKind::Circle);
        let _other = recompute_frame(&MarkerState::new(300.0, 0.1, 0.9), &layout, MarkerKind::Plane);
        assert_eq!(recompute_frame(&s, &layout, MarkerKind::Circle), first);
    }

    #[test]
    fn visuals_per_kind() {
        let layout = MarkerLayout::default();
        let s = MarkerState::new(60.0, 0.25, 0.5);
        for kind in MarkerKind::ALL {
            assert_eq!(compute_marker_visual(kind, &s, &layout).kind(), kind);
        }
        match compute_marker_visual(MarkerKind::Circle, &s, &layout) {
            MarkerVisual::Circle(mesh) => {
                let y = layout.value_height(0.25);
                assert!(mesh.positions.iter().all(|p| (p.y - y).abs() < 1e-12));
                assert!(mesh.colors.iter().all(|c| (c.to_hsv().v - 0.25).abs() < 1e-9));
            }
            other => panic!("unexpected visual {other:?}"),
        }
        match compute_marker_visual(MarkerKind::Plane, &s, &layout) {
            MarkerVisual::Plane(mesh) => {
                // Axis samples keep the selected hue instead of falling back to 0.
                let top_rim = mesh.colors.last().copied().unwrap_or_default();
                assert!((top_rim.hue() - 60.0).abs() < 1e-6);
            }
            other => panic!("unexpected visual {other:?}"),
        }
    }

    #[test]
    fn nudges_clamp_and_wrap() {
        let mut s = MarkerState::new(355.0, 0.98, 0.02);
        s.nudge_hue(10.0);
        s.nudge_value(0.1);
        s.nudge_radius(-0.1);
        assert!((s.hue_deg() - 5.0).abs() < 1e-9);
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.radius_fraction(), 0.0);
    }

    #[test]
    fn picking_inverts_preview() {
        let size = 32;
        let fb = sv_preview(200.0, size);
        for (x, y) in [(0u32, 0u32), (31, 31), (10, 20), (31, 5)] {
            let (s, v) = pick_from_preview(f64::from(x), f64::from(y), size);
            let expected = Hsv::new(200.0, s, v).to_rgb().to_u8();
            let (r, g, b, _) = fb.pixel(x, y);
            assert_eq!((r, g, b), expected);
        }
    }
}
