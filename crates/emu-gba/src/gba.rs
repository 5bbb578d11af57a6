//! Top-level GBA system.
//!
//! One machine instance owns the CPU and the bus (which in turn owns
//! the backing stores). `step()` executes exactly one instruction; the
//! caller decides how many steps make up a scheduling quantum, e.g. per
//! rendered frame. The core imposes no timing of its own and has no
//! notion of wall-clock time.

use arm_7tdmi::Arm7Tdmi;
use emu_core::{Cpu, Observable, Value};

use crate::bus::GbaBus;
use crate::cartridge::Cartridge;
use crate::config::GbaConfig;
use crate::ppu::{self, Ppu};

/// GBA system.
pub struct Gba {
    cpu: Arm7Tdmi,
    bus: GbaBus,
}

impl Gba {
    /// Create a new GBA from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM image is empty.
    pub fn new(config: &GbaConfig) -> Result<Self, String> {
        if config.rom_data.is_empty() {
            return Err("empty ROM image".into());
        }
        Ok(Self::from_cartridge(Cartridge::new(config.rom_data.clone())))
    }

    /// Create a new GBA from a pre-built cartridge.
    #[must_use]
    pub fn from_cartridge(cartridge: Cartridge) -> Self {
        let mut bus = GbaBus::new();
        bus.attach_ppu(Ppu::new());
        bus.attach_cartridge(cartridge);
        Self {
            cpu: Arm7Tdmi::new(),
            bus,
        }
    }

    /// Reset the CPU to its initial register and flag state.
    ///
    /// The backing stores are left alone; a fresh cartridge load
    /// replaces the program image wholesale instead.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Execute one instruction.
    pub fn step(&mut self) {
        self.cpu.step(&mut self.bus);
    }

    /// Execute `count` instructions.
    pub fn run_steps(&mut self, count: u64) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Replace the cartridge with a freshly loaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if `rom_data` is empty; the current image stays
    /// attached in that case.
    pub fn load_cartridge(&mut self, rom_data: Vec<u8>) -> Result<(), String> {
        if rom_data.is_empty() {
            return Err("empty ROM image".into());
        }
        self.bus.attach_cartridge(Cartridge::new(rom_data));
        Ok(())
    }

    /// The display surface converted to ARGB8888, row-major.
    #[must_use]
    pub fn framebuffer_argb(&self) -> Vec<u32> {
        self.bus.ppu.as_ref().map_or_else(
            || vec![0; (ppu::WIDTH * ppu::HEIGHT) as usize],
            Ppu::framebuffer_argb,
        )
    }

    /// Framebuffer width in pixels.
    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        ppu::WIDTH
    }

    /// Framebuffer height in pixels.
    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        ppu::HEIGHT
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Arm7Tdmi {
        &self.cpu
    }

    /// Mutable reference to the CPU.
    pub fn cpu_mut(&mut self) -> &mut Arm7Tdmi {
        &mut self.cpu
    }

    /// Reference to the bus.
    #[must_use]
    pub fn bus(&self) -> &GbaBus {
        &self.bus
    }

    /// Mutable reference to the bus.
    pub fn bus_mut(&mut self) -> &mut GbaBus {
        &mut self.bus
    }
}

impl Observable for Gba {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            return self.cpu.query(rest);
        }
        if let Some(rest) = path.strip_prefix("memory.") {
            let addr = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            return addr.map(|a| Value::U8(self.bus.peek8(a)));
        }
        self.cpu.query(path)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["cpu.<arm7tdmi paths>", "memory.<address>"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::ROM_BASE;
    use arm_7tdmi::flags;

    fn make_gba() -> Gba {
        // A single spin-on-self branch is enough for machine-level tests
        Gba::from_cartridge(Cartridge::new(vec![0xFF, 0xE7]))
    }

    #[test]
    fn reset_parks_pc_at_the_rom_base_in_thumb_state() {
        let mut gba = make_gba();
        gba.reset();
        assert_eq!(gba.cpu().pc(), ROM_BASE);
        assert!(gba.cpu().regs.cpsr.is_set(flags::T));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut gba = make_gba();
        gba.run_steps(3);
        gba.reset();
        let first = gba.cpu().registers();
        gba.reset();
        assert_eq!(gba.cpu().registers(), first);
    }

    #[test]
    fn empty_rom_is_rejected() {
        assert!(Gba::new(&GbaConfig { rom_data: vec![] }).is_err());
        assert!(Gba::new(&GbaConfig { rom_data: vec![0x00] }).is_ok());
    }

    #[test]
    fn failed_reload_keeps_the_old_image() {
        let mut gba = make_gba();
        assert!(gba.load_cartridge(Vec::new()).is_err());
        assert_eq!(gba.bus().peek8(ROM_BASE), 0xFF);
        assert_eq!(gba.bus().peek8(ROM_BASE + 1), 0xE7);
    }

    #[test]
    fn framebuffer_has_one_argb_word_per_pixel() {
        let gba = make_gba();
        let fb = gba.framebuffer_argb();
        assert_eq!(
            fb.len(),
            (gba.framebuffer_width() * gba.framebuffer_height()) as usize
        );
        assert!(fb.iter().all(|&px| px == 0xFF00_0000));
    }

    #[test]
    fn observable_routes_cpu_and_memory_paths() {
        let mut gba = make_gba();
        gba.bus_mut().wram[0] = 0xAB;
        assert_eq!(gba.query("cpu.pc"), Some(Value::U32(ROM_BASE)));
        assert_eq!(gba.query("memory.0x02000000"), Some(Value::U8(0xAB)));
        assert_eq!(gba.query("pc"), Some(Value::U32(ROM_BASE)));
    }
}
