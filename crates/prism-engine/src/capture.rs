//! Screenshot persistence.

use std::path::Path;

use anyhow::{Context, Result};

/// Writes tightly packed RGBA pixels to `path` as a PNG.
pub(crate) fn write_png(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<()> {
    let img: image::RgbaImage = image::ImageBuffer::from_raw(width, height, pixels)
        .context("pixel buffer does not match image dimensions")?;

    img.save(path)
        .with_context(|| format!("failed to write screenshot to {}", path.display()))?;

    log::info!("screenshot written to {}", path.display());
    Ok(())
}
