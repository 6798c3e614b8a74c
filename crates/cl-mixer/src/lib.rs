//! Two-color mixing engine and its animated lens previews.

pub mod lens;
pub mod mixer;

pub use lens::{Lens, MoleculeField, WaveLens};
pub use mixer::{MixResult, Mixer};
