//! CIE 1931 XYZ, xy chromaticity and CIELAB for sRGB (D65) colors.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// sRGB (Rec. 709 primaries, D65) linear RGB → XYZ, row-major.
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

/// Reference white D65, Y normalised to 1.
pub const D65_WHITE: Xyz = Xyz {
    x: 0.950_47,
    y: 1.0,
    z: 1.088_83,
};

/// Chromaticity of the D65 white point.
pub const D65_CHROMATICITY: Chromaticity = Chromaticity::new(0.3127, 0.3290);

/// Tristimulus values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Point in the CIE 1931 xy plane.
///
/// # Example
/// ```
/// use cl_core::cie::Chromaticity;
/// let p = Chromaticity::new(0.64, 0.33);
/// assert_eq!(p.x, 0.64);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

/// CIELAB coordinates (L* in [0, 100]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    /// `lab(L*, a*, b*)`, one decimal.
    ///
    /// # Example
    /// ```
    /// use cl_core::cie::rgb_to_lab;
    /// use cl_core::color::Rgb;
    /// assert_eq!(rgb_to_lab(Rgb::WHITE).notation(), "lab(100.0, 0.0, 0.0)");
    /// assert_eq!(rgb_to_lab(Rgb::RED).notation(), "lab(53.2, 80.1, 67.2)");
    /// ```
    #[must_use]
    pub fn notation(self) -> String {
        // + 0.0 turns a rounded -0.0 into 0.0
        let r = |v: f64| (v * 10.0).round() / 10.0 + 0.0;
        format!("lab({:.1}, {:.1}, {:.1})", r(self.l), r(self.a), r(self.b))
    }
}

impl Chromaticity {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in the xy plane.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Xyz {
    /// Projection x = X/(X+Y+Z), y = Y/(X+Y+Z).
    ///
    /// Black has no chromaticity; it is placed on the D65 white point.
    #[must_use]
    pub fn chromaticity(self) -> Chromaticity {
        let sum = self.x + self.y + self.z;
        if sum < 1e-12 {
            return D65_CHROMATICITY;
        }
        Chromaticity::new(self.x / sum, self.y / sum)
    }
}

/// sRGB-encoded color → XYZ (linearised first).
///
/// # Example
/// ```
/// use cl_core::cie::rgb_to_xyz;
/// use cl_core::color::Rgb;
/// let xyz = rgb_to_xyz(Rgb::WHITE);
/// assert!((xyz.y - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn rgb_to_xyz(rgb: Rgb) -> Xyz {
    let lin = rgb.to_linear();
    let row = |m: [f64; 3]| m[0] * lin.r + m[1] * lin.g + m[2] * lin.b;
    Xyz {
        x: row(SRGB_TO_XYZ[0]),
        y: row(SRGB_TO_XYZ[1]),
        z: row(SRGB_TO_XYZ[2]),
    }
}

/// sRGB-encoded color → xy chromaticity.
#[must_use]
pub fn rgb_to_chromaticity(rgb: Rgb) -> Chromaticity {
    rgb_to_xyz(rgb).chromaticity()
}

/// XYZ → CIELAB relative to D65.
#[must_use]
pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    const EPSILON: f64 = 216.0 / 24_389.0;
    const KAPPA: f64 = 24_389.0 / 27.0;
    let f = |t: f64| {
        if t > EPSILON {
            t.cbrt()
        } else {
            (KAPPA * t + 16.0) / 116.0
        }
    };
    let fx = f(xyz.x / D65_WHITE.x);
    let fy = f(xyz.y / D65_WHITE.y);
    let fz = f(xyz.z / D65_WHITE.z);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// sRGB-encoded color → CIELAB.
///
/// # Example
/// ```
/// use cl_core::cie::rgb_to_lab;
/// use cl_core::color::Rgb;
/// let lab = rgb_to_lab(Rgb::RED);
/// assert!((lab.l - 53.24).abs() < 0.1);
/// assert!(lab.a > 75.0);
/// ```
#[must_use]
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    xyz_to_lab(rgb_to_xyz(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_project_to_rec709_chromaticities() {
        let cases = [
            (Rgb::RED, Chromaticity::new(0.64, 0.33)),
            (Rgb::GREEN, Chromaticity::new(0.30, 0.60)),
            (Rgb::BLUE, Chromaticity::new(0.15, 0.06)),
            (Rgb::WHITE, D65_CHROMATICITY),
        ];
        for (rgb, expected) in cases {
            let got = rgb_to_chromaticity(rgb);
            assert!(got.distance(expected) < 1e-3, "{rgb:?}: {got:?}");
        }
    }

    #[test]
    fn black_sits_on_white_point() {
        assert_eq!(rgb_to_chromaticity(Rgb::BLACK), D65_CHROMATICITY);
    }

    #[test]
    fn lab_of_neutrals_has_no_chroma() {
        for v in [0.1, 0.5, 0.9, 1.0] {
            let lab = rgb_to_lab(Rgb::new(v, v, v));
            assert!(lab.a.abs() < 0.05 && lab.b.abs() < 0.05, "{lab:?}");
        }
        let white = rgb_to_lab(Rgb::WHITE);
        assert!((white.l - 100.0).abs() < 0.01);
        assert!(rgb_to_lab(Rgb::BLACK).l.abs() < 1e-9);
    }

    #[test]
    fn lab_axes_point_the_right_way() {
        let blue = rgb_to_lab(Rgb::BLUE);
        assert!(blue.b < -100.0);
        let green = rgb_to_lab(Rgb::GREEN);
        assert!(green.a < -80.0);
        let yellow = rgb_to_lab(Rgb::new(1.0, 1.0, 0.0));
        assert!(yellow.b > 90.0);
    }
}
