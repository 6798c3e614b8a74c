//! Colour-space coordinate engine for chromalab.
//!
//! This crate holds the pure math shared by the rest of the workspace:
//! RGB/HSV/HSL conversions, two-color mixing, CIE chromaticity, wavelength
//! approximations, the RGBA raster type, configuration and errors.

pub mod cie;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod mix;
pub mod spectrum;
pub mod traits;

pub use color::{Hsl, Hsv, Rgb};
pub use config::{LabConfig, MarkerKind, MixMode};
pub use error::CoreError;
pub use frame::{BlendMode, FrameBuffer};
pub use traits::{Animation, ColorSampler};
