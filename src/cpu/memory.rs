//! LC-3 memory subsystem.
//!
//! 65,536 sixteen-bit words addressed by a `u16`, so every address is in
//! range and address arithmetic wraps. Two addresses are keyboard device
//! registers that are refreshed from the I/O bridge when KBSR is read.

use std::io;

use crate::bridge::IoBridge;

/// The number of words in the address space.
pub const MEMORY_SIZE: usize = 1 << 16;

/// Keyboard status register. Bit 15 is set when a character is ready.
pub const KBSR: u16 = 0xFE00;

/// Keyboard data register. Holds the last character read.
pub const KBDR: u16 = 0xFE02;

const KBSR_READY: u16 = 1 << 15;

/// LC-3 memory: 64K words.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[u16]>,
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0u16; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Read a word as the CPU sees it.
    ///
    /// A read of [`KBSR`] first polls `io` and updates both keyboard
    /// registers; every other address is plain storage.
    pub fn read<B: IoBridge + ?Sized>(&mut self, addr: u16, io: &mut B) -> io::Result<u16> {
        if addr == KBSR {
            self.refresh_keyboard(io)?;
        }
        Ok(self.peek(addr))
    }

    /// Read a word from storage with no device side effects.
    #[inline]
    pub fn peek(&self, addr: u16) -> u16 {
        self.cells[addr as usize]
    }

    /// Store a word. Device addresses are plain storage on write.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u16) {
        self.cells[addr as usize] = value;
    }

    fn refresh_keyboard<B: IoBridge + ?Sized>(&mut self, io: &mut B) -> io::Result<()> {
        if io.key_available()? {
            let ch = io.read_char()?;
            self.write(KBSR, KBSR_READY);
            self.write(KBDR, ch as u16);
        } else {
            self.write(KBSR, 0);
        }
        Ok(())
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Copy `words` into memory starting at `origin`.
    ///
    /// Stops at the top of the address space instead of wrapping into low
    /// memory. Returns the number of words stored.
    pub fn load(&mut self, origin: u16, words: &[u16]) -> usize {
        let start = origin as usize;
        let count = words.len().min(MEMORY_SIZE - start);
        self.cells[start..start + count].copy_from_slice(&words[..count]);
        count
    }

    /// Dump a range of memory (for debugging). Clamped to the address space.
    pub fn dump(&self, start: u16, count: usize) -> Vec<(u16, u16)> {
        let end = (start as usize + count).min(MEMORY_SIZE);
        (start as usize..end)
            .map(|i| (i as u16, self.cells[i]))
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count non-zero cells
        let non_zero = self.cells.iter().filter(|&&cell| cell != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}
