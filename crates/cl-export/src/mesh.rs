//! JSON dump of colored vertex sets.
//!
//! Layout per mesh: `positions` as `[x, y, z]` triples and `colors` as a flat
//! `[r, g, b, ...]` float array aligned with them, ready to upload as vertex
//! attributes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use cl_geometry::mesh::ColoredMesh;
use serde::{Deserialize, Serialize};

/// One mesh as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshExport {
    pub name: String,
    pub vertex_count: usize,
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<f32>,
}

impl MeshExport {
    #[must_use]
    pub fn from_mesh(mesh: &ColoredMesh) -> Self {
        Self {
            name: mesh.name.clone(),
            vertex_count: mesh.len(),
            positions: mesh.positions.iter().map(|p| p.to_array()).collect(),
            colors: mesh.color_attribute(),
        }
    }
}

/// Serialize `meshes` as a JSON array into `out`.
///
/// # Errors
/// Fails if a mesh has misaligned buffers or the writer fails.
///
/// # Example
/// ```
/// use cl_core::config::GeometryConfig;
/// use cl_export::write_meshes;
/// use cl_geometry::mesh::rgb_solid;
/// let mut out = Vec::new();
/// write_meshes(&rgb_solid(&GeometryConfig::default()), &mut out).unwrap();
/// assert!(out.starts_with(b"["));
/// ```
pub fn write_meshes<W: Write>(meshes: &[ColoredMesh], out: W) -> Result<()> {
    let exports: Vec<MeshExport> = meshes.iter().map(MeshExport::from_mesh).collect();
    for e in &exports {
        ensure!(
            e.colors.len() == 3 * e.positions.len(),
            "Maillage {} : {} couleurs pour {} sommets",
            e.name,
            e.colors.len() / 3,
            e.positions.len()
        );
    }
    serde_json::to_writer_pretty(out, &exports).context("Sérialisation JSON")?;
    Ok(())
}

/// [`write_meshes`] to a file.
///
/// # Errors
/// Fails if the file cannot be created or written.
pub fn save_meshes_json(meshes: &[ColoredMesh], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_meshes(meshes, &mut writer)?;
    writer.flush().with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "JSON écrit : {} ({} maillages, {} sommets)",
        path.display(),
        meshes.len(),
        meshes.iter().map(ColoredMesh::len).sum::<usize>()
    );
    Ok(())
}
