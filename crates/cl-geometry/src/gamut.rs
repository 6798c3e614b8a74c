//! CIE 1931 chromaticity diagram geometry: the spectral locus and the sRGB triangle.

use cl_core::cie::{Chromaticity, D65_CHROMATICITY};
use cl_core::color::{Rgb, clamp01};
use glam::DVec2;

/// Approximate spectral-locus anchors, 380 → 700 nm.
pub const SPECTRAL_LOCUS: [(u32, Chromaticity); 13] = [
    (380, Chromaticity::new(0.1741, 0.0050)),
    (400, Chromaticity::new(0.1733, 0.0048)),
    (420, Chromaticity::new(0.1689, 0.0091)),
    (450, Chromaticity::new(0.1566, 0.0177)),
    (480, Chromaticity::new(0.0913, 0.1327)),
    (500, Chromaticity::new(0.0082, 0.5384)),
    (520, Chromaticity::new(0.0743, 0.8338)),
    (540, Chromaticity::new(0.2296, 0.7543)),
    (560, Chromaticity::new(0.3731, 0.6245)),
    (580, Chromaticity::new(0.5125, 0.4866)),
    (600, Chromaticity::new(0.6270, 0.3725)),
    (620, Chromaticity::new(0.6915, 0.3083)),
    (700, Chromaticity::new(0.7347, 0.2653)),
];

/// Default spline tension of the locus curve.
pub const LOCUS_TENSION: f64 = 0.2;

/// Chromaticities of an RGB primary set and its white point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
    pub white: Chromaticity,
}

/// sRGB / Rec. 709 primaries with the D65 white point.
pub const SRGB_PRIMARIES: Primaries = Primaries {
    red: Chromaticity::new(0.64, 0.33),
    green: Chromaticity::new(0.30, 0.60),
    blue: Chromaticity::new(0.15, 0.06),
    white: D65_CHROMATICITY,
};

#[inline]
fn v(c: Chromaticity) -> DVec2 {
    DVec2::new(c.x, c.y)
}

#[inline]
fn c(p: DVec2) -> Chromaticity {
    Chromaticity::new(p.x, p.y)
}

/// One cubic Bézier segment `p0 → p3` with control points `p1`, `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub p0: DVec2,
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl CubicSegment {
    #[must_use]
    pub fn point(&self, t: f64) -> DVec2 {
        let u = 1.0 - t;
        self.p0 * (u * u * u) + self.p1 * (3.0 * u * u * t) + self.p2 * (3.0 * u * t * t) + self.p3 * (t * t * t)
    }
}

/// Smoothed spectral locus: Catmull-Rom style cubic segments through the
/// anchors, closed by a straight line (the line of purples) back to the start.
///
/// # Example
/// ```
/// use cl_geometry::gamut::{LocusCurve, SPECTRAL_LOCUS};
/// let curve = LocusCurve::spectral(0.2);
/// assert_eq!(curve.segments.len(), SPECTRAL_LOCUS.len() - 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LocusCurve {
    pub segments: Vec<CubicSegment>,
}

impl LocusCurve {
    /// Curve through arbitrary anchors. Endpoints reuse themselves as the
    /// missing neighbour, so the curve leaves and enters them tangentially.
    #[must_use]
    pub fn through(points: &[Chromaticity], tension: f64) -> Self {
        let pts: Vec<DVec2> = points.iter().map(|&p| v(p)).collect();
        let n = pts.len();
        let mut segments = Vec::with_capacity(n.saturating_sub(1));
        for i in 0..n.saturating_sub(1) {
            let p0 = pts[i.saturating_sub(1)];
            let p1 = pts[i];
            let p2 = pts[i + 1];
            let p3 = if i + 2 < n { pts[i + 2] } else { p2 };
            segments.push(CubicSegment {
                p0: p1,
                p1: p1 + (p2 - p0) * tension,
                p2: p2 - (p3 - p1) * tension,
                p3: p2,
            });
        }
        Self { segments }
    }

    /// The CIE 1931 spectral locus with the given tension.
    #[must_use]
    pub fn spectral(tension: f64) -> Self {
        let anchors: Vec<Chromaticity> = SPECTRAL_LOCUS.iter().map(|&(_, p)| p).collect();
        Self::through(&anchors, tension)
    }

    /// Closed polygon approximation with `per_segment` points per segment.
    /// The closing edge (last → first point) is implicit.
    #[must_use]
    pub fn polyline(&self, per_segment: u32) -> Vec<Chromaticity> {
        let steps = per_segment.max(1);
        let mut out = Vec::with_capacity(self.segments.len() * steps as usize + 1);
        if let Some(first) = self.segments.first() {
            out.push(c(first.p0));
        }
        for seg in &self.segments {
            for k in 1..=steps {
                out.push(c(seg.point(f64::from(k) / f64::from(steps))));
            }
        }
        log::debug!("locus échantillonné : {} points", out.len());
        out
    }
}

/// Even-odd point-in-polygon test; the polygon closes implicitly.
///
/// # Example
/// ```
/// use cl_core::cie::Chromaticity;
/// use cl_geometry::gamut::polygon_contains;
/// let square = [
///     Chromaticity::new(0.0, 0.0),
///     Chromaticity::new(1.0, 0.0),
///     Chromaticity::new(1.0, 1.0),
///     Chromaticity::new(0.0, 1.0),
/// ];
/// assert!(polygon_contains(&square, Chromaticity::new(0.5, 0.5)));
/// assert!(!polygon_contains(&square, Chromaticity::new(1.5, 0.5)));
/// ```
#[must_use]
pub fn polygon_contains(polygon: &[Chromaticity], p: Chromaticity) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn edge(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b - a).perp_dot(p - a)
}

impl Primaries {
    /// Vertices in red, green, blue order.
    #[must_use]
    pub fn triangle(&self) -> [Chromaticity; 3] {
        [self.red, self.green, self.blue]
    }

    /// Inside the primaries triangle, boundary included.
    #[must_use]
    pub fn contains(&self, p: Chromaticity) -> bool {
        const EPS: f64 = 1e-12;
        let (r, g, b, q) = (v(self.red), v(self.green), v(self.blue), v(p));
        let d1 = edge(r, g, q);
        let d2 = edge(g, b, q);
        let d3 = edge(b, r, q);
        let has_neg = d1 < -EPS || d2 < -EPS || d3 < -EPS;
        let has_pos = d1 > EPS || d2 > EPS || d3 > EPS;
        !(has_neg && has_pos)
    }

    /// Longest triangle edge; the reach of each primary's radial field.
    #[must_use]
    pub fn field_radius(&self) -> f64 {
        let [r, g, b] = self.triangle();
        r.distance(g).max(g.distance(b)).max(b.distance(r))
    }

    /// Color inside the triangle: three radial fields (one per primary,
    /// falling off quadratically with distance) screen-composited over
    /// black, then scaled so the brightest channel is 1.
    ///
    /// # Example
    /// ```
    /// use cl_geometry::gamut::SRGB_PRIMARIES;
    /// let red = SRGB_PRIMARIES.interior_color(SRGB_PRIMARIES.red);
    /// assert_eq!(red.r, 1.0);
    /// assert!(red.g < 0.1 && red.b < 0.1);
    /// ```
    #[must_use]
    pub fn interior_color(&self, p: Chromaticity) -> Rgb {
        let reach = self.field_radius();
        let field = |center: Chromaticity| {
            let f = clamp01(1.0 - center.distance(p) / reach);
            f * f
        };
        // Each field lights a single channel: screening them over black
        // leaves every channel equal to its own field.
        let rgb = Rgb::new(field(self.red), field(self.green), field(self.blue));
        let peak = rgb.r.max(rgb.g).max(rgb.b);
        if peak <= 0.0 {
            return Rgb::BLACK;
        }
        Rgb::new(rgb.r / peak, rgb.g / peak, rgb.b / peak)
    }
}

/// Where a chromaticity falls relative to the locus and the gamut triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamutRegion {
    /// Reproducible by the primaries.
    InGamut,
    /// A real color that the primaries cannot reproduce.
    OutOfGamut,
    /// Not a physical color.
    OutsideLocus,
}

/// Locus polygon plus primaries, ready for point classification.
///
/// # Example
/// ```
/// use cl_core::cie::Chromaticity;
/// use cl_geometry::gamut::{GamutDiagram, GamutRegion};
/// let d = GamutDiagram::srgb(0.2, 24);
/// assert_eq!(d.classify(Chromaticity::new(0.3127, 0.3290)), GamutRegion::InGamut);
/// assert_eq!(d.classify(Chromaticity::new(0.05, 0.6)), GamutRegion::OutOfGamut);
/// assert_eq!(d.classify(Chromaticity::new(0.9, 0.9)), GamutRegion::OutsideLocus);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GamutDiagram {
    pub locus: Vec<Chromaticity>,
    pub primaries: Primaries,
}

impl GamutDiagram {
    #[must_use]
    pub fn new(locus: Vec<Chromaticity>, primaries: Primaries) -> Self {
        Self { locus, primaries }
    }

    /// Smoothed spectral locus with the sRGB triangle.
    #[must_use]
    pub fn srgb(tension: f64, per_segment: u32) -> Self {
        Self::new(LocusCurve::spectral(tension).polyline(per_segment), SRGB_PRIMARIES)
    }

    #[must_use]
    pub fn locus_contains(&self, p: Chromaticity) -> bool {
        polygon_contains(&self.locus, p)
    }

    #[must_use]
    pub fn classify(&self, p: Chromaticity) -> GamutRegion {
        if self.primaries.contains(p) {
            GamutRegion::InGamut
        } else if self.locus_contains(p) {
            GamutRegion::OutOfGamut
        } else {
            GamutRegion::OutsideLocus
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_and_white_inside_locus() {
        let d = GamutDiagram::srgb(LOCUS_TENSION, 24);
        for p in [SRGB_PRIMARIES.red, SRGB_PRIMARIES.green, SRGB_PRIMARIES.blue, SRGB_PRIMARIES.white] {
            assert!(d.locus_contains(p), "{p:?}");
            assert_eq!(d.classify(p), GamutRegion::InGamut);
        }
        assert!(!d.locus_contains(Chromaticity::new(0.9, 0.9)));
        assert!(!d.locus_contains(Chromaticity::new(0.0, 0.0)));
    }

    #[test]
    fn curve_passes_through_anchors() {
        let curve = LocusCurve::spectral(LOCUS_TENSION);
        for (seg, w) in curve.segments.iter().zip(SPECTRAL_LOCUS.windows(2)) {
            assert_eq!(c(seg.point(0.0)), w[0].1);
            let end = c(seg.point(1.0));
            assert!(end.distance(w[1].1) < 1e-12);
        }
    }

    #[test]
    fn zero_tension_is_a_polyline() {
        let pts = [Chromaticity::new(0.0, 0.0), Chromaticity::new(1.0, 1.0)];
        let curve = LocusCurve::through(&pts, 0.0);
        let mid = c(curve.segments[0].point(0.5));
        assert!(mid.distance(Chromaticity::new(0.5, 0.5)) < 1e-12);
    }

    #[test]
    fn polyline_has_expected_length() {
        let poly = LocusCurve::spectral(0.2).polyline(10);
        assert_eq!(poly.len(), 12 * 10 + 1);
        assert_eq!(poly[0], SPECTRAL_LOCUS[0].1);
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!polygon_contains(&[], Chromaticity::new(0.0, 0.0)));
        let line = [Chromaticity::new(0.0, 0.0), Chromaticity::new(1.0, 1.0)];
        assert!(!polygon_contains(&line, Chromaticity::new(0.5, 0.5)));
    }

    #[test]
    fn triangle_edges_count_as_inside() {
        let mid = Chromaticity::new(
            (SRGB_PRIMARIES.red.x + SRGB_PRIMARIES.green.x) / 2.0,
            (SRGB_PRIMARIES.red.y + SRGB_PRIMARIES.green.y) / 2.0,
        );
        assert!(SRGB_PRIMARIES.contains(mid));
        assert!(!SRGB_PRIMARIES.contains(Chromaticity::new(0.7, 0.7)));
    }

    #[test]
    fn interior_colors_lean_toward_nearest_primary() {
        let p = SRGB_PRIMARIES;
        let g = p.interior_color(p.green);
        assert_eq!(g.g, 1.0);
        let b = p.interior_color(p.blue);
        assert_eq!(b.b, 1.0);
        let w = p.interior_color(p.white);
        assert!(w.r > 0.3 && w.g > 0.3 && w.b > 0.3, "{w:?}");
    }
}
