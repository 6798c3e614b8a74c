//! Writing rasters and per-vertex color buffers to disk.

pub mod mesh;
pub mod png;

pub use mesh::{MeshExport, save_meshes_json, write_meshes};
pub use png::{load_png, save_png};
