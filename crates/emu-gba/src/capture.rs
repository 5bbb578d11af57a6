//! Headless capture: PNG screenshots.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::Gba;

/// Save the current display surface as a PNG file.
///
/// The surface is converted from BGR555 cells to RGBA bytes for the PNG
/// encoder.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(gba: &Gba, path: &Path) -> Result<(), Box<dyn Error>> {
    let width = gba.framebuffer_width();
    let height = gba.framebuffer_height();
    let fb = gba.framebuffer_argb();

    let file = fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    // Convert ARGB32 → RGBA bytes
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for &pixel in &fb {
        rgba.push(((pixel >> 16) & 0xFF) as u8);
        rgba.push(((pixel >> 8) & 0xFF) as u8);
        rgba.push((pixel & 0xFF) as u8);
        rgba.push(0xFF);
    }

    writer.write_image_data(&rgba)?;
    Ok(())
}
