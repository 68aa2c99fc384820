//! Trap service routines.
//!
//! The LC-3 OS routines for console I/O are implemented natively instead of
//! being loaded as guest code. A TRAP saves the return address in R7 before
//! dispatching here.

use log::warn;

use crate::bridge::IoBridge;
use crate::cpu::execute::{Vm, VmError, VmState};
use crate::cpu::memory::MEMORY_SIZE;
use crate::cpu::registers::Reg;

/// Message printed by HALT.
pub const HALT_MESSAGE: &str = "HALT\n";

/// Prompt printed by IN.
pub const IN_PROMPT: &str = "Enter a character: ";

/// Trap vectors with a service routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrapVector {
    /// Read a character into R0, no echo.
    Getc = 0x20,
    /// Write the character in R0.
    Out = 0x21,
    /// Write the string of one character per word at R0.
    Puts = 0x22,
    /// Prompt, read and echo a character into R0.
    In = 0x23,
    /// Write the string of two characters per word at R0.
    Putsp = 0x24,
    /// Stop the machine.
    Halt = 0x25,
}

impl TrapVector {
    pub fn from_u8(vector: u8) -> Option<Self> {
        match vector {
            0x20 => Some(TrapVector::Getc),
            0x21 => Some(TrapVector::Out),
            0x22 => Some(TrapVector::Puts),
            0x23 => Some(TrapVector::In),
            0x24 => Some(TrapVector::Putsp),
            0x25 => Some(TrapVector::Halt),
            _ => None,
        }
    }
}

impl<B: IoBridge> Vm<B> {
    /// Run the service routine for `vector`.
    pub(crate) fn trap(&mut self, vector: u8) -> Result<(), VmError> {
        let Some(routine) = TrapVector::from_u8(vector) else {
            warn!("ignoring unknown trap vector {:#04x} at {:#06x}", vector, self.regs.pc.wrapping_sub(1));
            return Ok(());
        };

        match routine {
            TrapVector::Getc => {
                let ch = self.bridge.read_char()?;
                self.regs.set(Reg::R0, ch as u16);
            }

            TrapVector::Out => {
                self.bridge.write_char(self.regs.get(Reg::R0) as u8)?;
                self.bridge.flush()?;
            }

            TrapVector::Puts => {
                for word in self.string_words() {
                    self.bridge.write_char(word as u8)?;
                }
                self.bridge.flush()?;
            }

            TrapVector::In => {
                self.bridge.write_str(IN_PROMPT)?;
                self.bridge.flush()?;
                let ch = self.bridge.read_char()?;
                self.bridge.write_char(ch)?;
                self.bridge.flush()?;
                self.regs.set(Reg::R0, ch as u16);
            }

            TrapVector::Putsp => {
                for word in self.string_words() {
                    let [low, high] = word.to_le_bytes();
                    self.bridge.write_char(low)?;
                    if high != 0 {
                        self.bridge.write_char(high)?;
                    }
                }
                self.bridge.flush()?;
            }

            TrapVector::Halt => {
                self.bridge.write_str(HALT_MESSAGE)?;
                self.bridge.flush()?;
                self.state = VmState::Halted;
            }
        }

        Ok(())
    }

    /// Words from R0 up to (not including) the first zero word.
    ///
    /// Reads plain storage and wraps at the top of memory; a string with no
    /// terminator ends after one pass over the address space.
    fn string_words(&self) -> Vec<u16> {
        let start = self.regs.get(Reg::R0);
        (0..MEMORY_SIZE)
            .map(|i| self.mem.peek(start.wrapping_add(i as u16)))
            .take_while(|&word| word != 0)
            .collect()
    }
}
