use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError};

use crate::canvas::PixelCanvas;

/// Export the canvas as a PNG into `dir`, upscaled by `scale` (nearest
/// neighbor) so the file matches the on-screen pixel size.  The filename is
/// derived from the current unix time: `pixel_art_<seconds>.png`.
///
/// Returns the written path.  A failure here (permissions, disk full) is the
/// one user-visible error in the application; the caller reports it and keeps
/// running.
pub fn export_png(canvas: &PixelCanvas, scale: u32, dir: &Path) -> Result<PathBuf, ImageError> {
    let img = canvas.to_rgba_image(scale);
    let path = dir.join(format!("pixel_art_{}.png", unix_seconds()));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let encoder = PngEncoder::new(&mut writer);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;

    Ok(path)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
