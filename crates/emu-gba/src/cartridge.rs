//! Cartridge ROM image.
//!
//! The program image is supplied once and is immutable thereafter; the
//! bus only ever reads it. Reads past the loaded length return 0xFF,
//! consistent with an unprogrammed storage cell.

use std::fs;
use std::path::Path;

/// A cartridge ROM image.
#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
}

impl Cartridge {
    /// Wrap a ROM image.
    #[must_use]
    pub fn new(rom: Vec<u8>) -> Self {
        Self { rom }
    }

    /// Load a ROM image from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is empty. Nothing
    /// is attached to a machine on failure.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let rom = fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        if rom.is_empty() {
            return Err(format!("{}: empty ROM image", path.display()));
        }
        Ok(Self::new(rom))
    }

    /// Read the byte at `offset` within the ROM window.
    ///
    /// Offsets past the loaded image - or any offset when the image is
    /// empty - read as 0xFF.
    #[must_use]
    pub fn read(&self, offset: u32) -> u8 {
        self.rom.get(offset as usize).copied().unwrap_or(0xFF)
    }

    /// Loaded image length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rom.len()
    }

    /// Whether no image bytes are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_inside_and_past_the_image() {
        let cart = Cartridge::new(vec![0x10, 0x20, 0x30]);
        assert_eq!(cart.read(0), 0x10);
        assert_eq!(cart.read(2), 0x30);
        assert_eq!(cart.read(3), 0xFF);
        assert_eq!(cart.read(0x00FF_FFFF), 0xFF);
    }

    #[test]
    fn empty_image_reads_as_unprogrammed() {
        let cart = Cartridge::new(Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.read(0), 0xFF);
    }

    #[test]
    fn from_file_reports_missing_files() {
        let err = Cartridge::from_file(Path::new("/nonexistent/rom.gba"));
        assert!(err.is_err());
    }
}
