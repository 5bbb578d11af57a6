//! GBA configuration.

/// GBA machine configuration.
pub struct GbaConfig {
    /// Raw cartridge ROM contents.
    pub rom_data: Vec<u8>,
}
