use std::path::Path;

use anyhow::{Context, Result};
use cl_core::frame::FrameBuffer;

/// Écrit un `FrameBuffer` RGBA en PNG.
///
/// # Errors
/// Fails if the buffer length does not match its dimensions or the file
/// cannot be written.
///
/// # Example
/// ```no_run
/// use cl_core::frame::FrameBuffer;
/// use cl_export::save_png;
/// save_png(&FrameBuffer::new(4, 4), std::path::Path::new("out.png")).unwrap();
/// ```
pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<()> {
    let img = image::RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
        .with_context(|| format!("Buffer {}×{} incohérent", fb.width, fb.height))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("PNG écrit : {} ({}×{})", path.display(), fb.width, fb.height);
    Ok(())
}

/// Recharge un PNG en `FrameBuffer` RGBA.
///
/// # Errors
/// Fails if the file cannot be read or decoded.
pub fn load_png(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}
