//! Parametric color solids, chromaticity gamut and the marker model.
//!
//! - [`sampler`]: position → color for each solid surface.
//! - [`mesh`]: vertex sets for the HSV cylinder, hue ring and RGB cube.
//! - [`gamut`]: spectral locus and sRGB triangle on the CIE xy plane.
//! - [`marker`]: marker state → per-frame render attributes.

pub mod gamut;
pub mod marker;
pub mod mesh;
pub mod sampler;

pub use marker::{MarkerLayout, MarkerState, RenderAttributes, recompute_frame};
pub use mesh::ColoredMesh;
