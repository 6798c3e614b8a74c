/// Terminal rendering for the chromalab explorer.
///
/// Half-block drawing of rasters, frame pacing and the explorer layout.
pub mod canvas;
pub mod clock;
pub mod ui;
