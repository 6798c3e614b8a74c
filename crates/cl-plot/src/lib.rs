//! 2D rasters of the explainer figures, drawn into [`cl_core::FrameBuffer`]s.
//!
//! Text labels are left to the caller (terminal UI or surrounding page):
//! every plot exposes its coordinate mapping so labels can be placed.

pub mod cones;
pub mod diagram;
pub mod palette;
pub mod spectrum;

pub use cones::ConePlot;
pub use diagram::GamutPlot;
pub use palette::PaletteKind;
pub use spectrum::SpectrumPlot;
