//! GBA bus: CPU address routing.
//!
//! Implements `emu_core::Bus` for the GBA. Routes addresses to the
//! mode 3 display surface (VRAM), the cartridge ROM window, and
//! on-board work RAM. The three regions are disjoint; everything else
//! is unmapped.
//!
//! The bus never faults. Reads of unmapped addresses return zero; reads
//! inside the ROM window but past the loaded image return 0xFF, like an
//! unprogrammed storage cell. Writes to unmapped or read-only targets
//! are dropped silently.

use emu_core::Bus;

use crate::cartridge::Cartridge;
use crate::ppu::Ppu;

/// Mode 3 display surface (VRAM) base address.
pub const VRAM_BASE: u32 = 0x0600_0000;
/// Mode 3 display surface size in bytes (240x160 16-bit cells).
pub const VRAM_SIZE: u32 = 240 * 160 * 2;
/// Cartridge ROM window base address.
pub const ROM_BASE: u32 = 0x0800_0000;
/// Cartridge ROM window size (32 MiB reserved, regardless of image length).
pub const ROM_SIZE: u32 = 32 * 1024 * 1024;
/// On-board work RAM base address.
pub const WRAM_BASE: u32 = 0x0200_0000;
/// On-board work RAM size.
pub const WRAM_SIZE: u32 = 256 * 1024;

const VRAM_END: u32 = VRAM_BASE + VRAM_SIZE - 1;
const ROM_END: u32 = ROM_BASE + ROM_SIZE - 1;
const WRAM_END: u32 = WRAM_BASE + WRAM_SIZE - 1;

/// The GBA bus, implementing `emu_core::Bus`.
///
/// Owns the work RAM. The display surface and the cartridge are
/// attached by the machine and may be absent (a bare bus in tests, or a
/// machine mid-construction); accesses to an absent store degrade to
/// the unmapped-address policy.
pub struct GbaBus {
    /// On-board work RAM.
    pub wram: Vec<u8>,
    /// Display surface, if attached.
    pub ppu: Option<Ppu>,
    /// Cartridge, if attached.
    pub cartridge: Option<Cartridge>,
}

impl GbaBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wram: vec![0; WRAM_SIZE as usize],
            ppu: None,
            cartridge: None,
        }
    }

    /// Attach the display surface.
    pub fn attach_ppu(&mut self, ppu: Ppu) {
        self.ppu = Some(ppu);
    }

    /// Attach (or replace) the cartridge.
    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    /// The VRAM cell index for a cell-aligned display-surface address.
    fn vram_cell(addr: u32) -> Option<usize> {
        if (VRAM_BASE..=VRAM_END).contains(&addr) && addr & 1 == 0 {
            Some(((addr - VRAM_BASE) >> 1) as usize)
        } else {
            None
        }
    }

    /// Read a byte without requiring `&mut self` (for observation).
    #[must_use]
    pub fn peek8(&self, addr: u32) -> u8 {
        match addr {
            VRAM_BASE..=VRAM_END => {
                // Byte access within the 16-bit surface reads half of
                // the enclosing cell.
                let off = addr - VRAM_BASE;
                match &self.ppu {
                    Some(ppu) => {
                        let cell = ppu.read_cell((off >> 1) as usize);
                        if off & 1 == 1 { (cell >> 8) as u8 } else { cell as u8 }
                    }
                    None => 0,
                }
            }
            ROM_BASE..=ROM_END => match &self.cartridge {
                Some(cart) => cart.read(addr - ROM_BASE),
                None => 0xFF,
            },
            WRAM_BASE..=WRAM_END => self.wram[(addr - WRAM_BASE) as usize],
            _ => 0,
        }
    }

    /// Read a halfword without requiring `&mut self`.
    ///
    /// A cell-aligned access inside the display surface reads the cell
    /// in one operation; everything else composes from bytes.
    #[must_use]
    pub fn peek16(&self, addr: u32) -> u16 {
        if let Some(index) = Self::vram_cell(addr) {
            return self.ppu.as_ref().map_or(0, |ppu| ppu.read_cell(index));
        }
        u16::from(self.peek8(addr)) | (u16::from(self.peek8(addr.wrapping_add(1))) << 8)
    }
}

impl Default for GbaBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for GbaBus {
    fn read8(&mut self, addr: u32) -> u8 {
        self.peek8(addr)
    }

    fn write8(&mut self, addr: u32, value: u8) {
        match addr {
            VRAM_BASE..=VRAM_END => {
                // Patch one half of the enclosing 16-bit cell.
                let off = addr - VRAM_BASE;
                if let Some(ppu) = &mut self.ppu {
                    let index = (off >> 1) as usize;
                    let cell = ppu.read_cell(index);
                    let patched = if off & 1 == 1 {
                        (cell & 0x00FF) | (u16::from(value) << 8)
                    } else {
                        (cell & 0xFF00) | u16::from(value)
                    };
                    ppu.write_cell(index, patched);
                }
            }
            WRAM_BASE..=WRAM_END => self.wram[(addr - WRAM_BASE) as usize] = value,
            // The ROM window is read-only; unmapped addresses drop writes.
            _ => {}
        }
    }

    fn read16(&mut self, addr: u32) -> u16 {
        self.peek16(addr)
    }

    fn write16(&mut self, addr: u32, value: u16) {
        if let Some(index) = Self::vram_cell(addr) {
            if let Some(ppu) = &mut self.ppu {
                ppu.write_cell(index, value);
            }
            return;
        }
        self.write8(addr, value as u8);
        self.write8(addr.wrapping_add(1), (value >> 8) as u8);
    }
}
