//! Vertex-set generators for the color solids.
//!
//! Only vertex positions are produced (no triangulation); each set is paired
//! with a sampler to give a per-vertex color buffer.

use std::f64::consts::TAU;

use cl_core::color::Rgb;
use cl_core::config::GeometryConfig;
use cl_core::traits::ColorSampler;
use glam::DVec3;
use serde::Serialize;

use crate::sampler::{HsvCylinder, HueRing, RgbCube, flatten_colors};

/// Positions plus one color per position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColoredMesh {
    pub name: String,
    pub positions: Vec<DVec3>,
    pub colors: Vec<Rgb>,
}

impl ColoredMesh {
    /// Color `positions` with `sampler`.
    #[must_use]
    pub fn sample(name: impl Into<String>, positions: Vec<DVec3>, sampler: &dyn ColorSampler) -> Self {
        let colors = sampler.sample_all(&positions);
        Self {
            name: name.into(),
            positions,
            colors,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Color buffer as interleaved `f32` RGB.
    #[must_use]
    pub fn color_attribute(&self) -> Vec<f32> {
        flatten_colors(&self.colors)
    }
}

/// Side wall of a cylinder: `(radial + 1) × (height + 1)` vertices, top row first.
///
/// # Example
/// ```
/// use cl_geometry::mesh::cylinder_wall;
/// let v = cylinder_wall(1.2, 2.4, 64, 32);
/// assert_eq!(v.len(), 65 * 33);
/// ```
#[must_use]
pub fn cylinder_wall(radius: f64, height: f64, radial_segments: u32, height_segments: u32) -> Vec<DVec3> {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let mut out = Vec::with_capacity((radial as usize + 1) * (rows as usize + 1));
    for j in 0..=rows {
        let y = height / 2.0 - f64::from(j) / f64::from(rows) * height;
        for i in 0..=radial {
            let theta = f64::from(i) / f64::from(radial) * TAU;
            out.push(DVec3::new(radius * theta.cos(), y, radius * theta.sin()));
        }
    }
    out
}

/// Flat disc at height `y`: the centre, then `segments + 1` rim vertices.
#[must_use]
pub fn disc(radius: f64, y: f64, segments: u32) -> Vec<DVec3> {
    let segments = segments.max(3);
    let mut out = Vec::with_capacity(segments as usize + 2);
    out.push(DVec3::new(0.0, y, 0.0));
    for i in 0..=segments {
        let theta = f64::from(i) / f64::from(segments) * TAU;
        out.push(DVec3::new(radius * theta.cos(), y, radius * theta.sin()));
    }
    out
}

/// Concentric rings of a disc, so interior samples exist between centre and rim.
#[must_use]
pub fn filled_disc(radius: f64, y: f64, segments: u32, rings: u32) -> Vec<DVec3> {
    let rings = rings.max(1);
    let mut out = vec![DVec3::new(0.0, y, 0.0)];
    for k in 1..=rings {
        let r = radius * f64::from(k) / f64::from(rings);
        out.extend(disc(r, y, segments).into_iter().skip(1));
    }
    out
}

/// Flat annulus at height `y` between `inner` and `outer`, two vertex rows.
#[must_use]
pub fn ring(inner: f64, outer: f64, y: f64, segments: u32) -> Vec<DVec3> {
    let segments = segments.max(3);
    let mut out = Vec::with_capacity(2 * (segments as usize + 1));
    for r in [inner, outer] {
        for i in 0..=segments {
            let theta = f64::from(i) / f64::from(segments) * TAU;
            out.push(DVec3::new(r * theta.cos(), y, r * theta.sin()));
        }
    }
    out
}

/// Grid vertices on the six faces of the [-1, 1]³ cube, `(n + 1)²` per face.
///
/// Edge and corner vertices appear once per face that touches them.
#[must_use]
pub fn cube_faces(subdivisions: u32) -> Vec<DVec3> {
    let n = subdivisions.max(1);
    let coord = |k: u32| -1.0 + 2.0 * f64::from(k) / f64::from(n);
    let mut out = Vec::with_capacity(6 * (n as usize + 1).pow(2));
    for axis in 0..3 {
        for side in [-1.0, 1.0] {
            for a in 0..=n {
                for b in 0..=n {
                    let (u, v) = (coord(a), coord(b));
                    out.push(match axis {
                        0 => DVec3::new(side, u, v),
                        1 => DVec3::new(u, side, v),
                        _ => DVec3::new(u, v, side),
                    });
                }
            }
        }
    }
    out
}

/// Half-plane grid at angle `hue_deg`, from the axis out to `radius`,
/// spanning the full height.
#[must_use]
pub fn hue_plane(hue_deg: f64, radius: f64, height: f64, radial_segments: u32, height_segments: u32) -> Vec<DVec3> {
    let (sin, cos) = hue_deg.to_radians().sin_cos();
    let cols = radial_segments.max(1);
    let rows = height_segments.max(1);
    let mut out = Vec::with_capacity((cols as usize + 1) * (rows as usize + 1));
    for j in 0..=rows {
        let y = -height / 2.0 + f64::from(j) / f64::from(rows) * height;
        for i in 0..=cols {
            let r = radius * f64::from(i) / f64::from(cols);
            out.push(DVec3::new(r * cos, y, r * sin));
        }
    }
    out
}

/// Wall, caps and hue ring of the HSV cylinder, colored.
///
/// # Example
/// ```
/// use cl_core::config::GeometryConfig;
/// use cl_geometry::mesh::hsv_solid;
/// let parts = hsv_solid(&GeometryConfig::default());
/// let names: Vec<&str> = parts.iter().map(|m| m.name.as_str()).collect();
/// assert_eq!(names, ["wall", "top-cap", "bottom-cap", "hue-ring"]);
/// ```
#[must_use]
pub fn hsv_solid(g: &GeometryConfig) -> Vec<ColoredMesh> {
    let (r, h) = (g.radius, g.height);
    let cap_rings = (g.height_segments / 2).max(1);
    let parts = vec![
        ColoredMesh::sample(
            "wall",
            cylinder_wall(r, h, g.radial_segments, g.height_segments),
            &HsvCylinder::wall(r, h),
        ),
        ColoredMesh::sample(
            "top-cap",
            filled_disc(r, h / 2.0, g.radial_segments * 2, cap_rings),
            &HsvCylinder::top_cap(r, h),
        ),
        ColoredMesh::sample(
            "bottom-cap",
            filled_disc(r, -h / 2.0, g.radial_segments, cap_rings),
            &HsvCylinder::bottom_cap(r, h),
        ),
        hue_ring_mesh(g),
    ];
    log::debug!(
        "solide HSV : {} sommets",
        parts.iter().map(ColoredMesh::len).sum::<usize>()
    );
    parts
}

/// The hue ring alone, slightly above the top cap.
#[must_use]
pub fn hue_ring_mesh(g: &GeometryConfig) -> ColoredMesh {
    ColoredMesh::sample(
        "hue-ring",
        ring(
            g.radius + g.ring_inner_offset,
            g.radius + g.ring_outer_offset,
            g.height / 2.0 + 0.02,
            g.ring_segments,
        ),
        &HueRing,
    )
}

/// The RGB cube faces, colored.
#[must_use]
pub fn rgb_solid(g: &GeometryConfig) -> Vec<ColoredMesh> {
    let mesh = ColoredMesh::sample("cube", cube_faces(g.cube_subdivisions), &RgbCube);
    log::debug!("cube RGB : {} sommets", mesh.len());
    vec![mesh]
}
