//! LC-3 register file.
//!
//! The machine has 10 registers:
//! - R0-R7: 16-bit general purpose registers
//! - PC: 16-bit program counter
//! - COND: condition flag, exactly one of N, Z or P

use serde::{Serialize, Deserialize};

/// Address the program counter holds at boot.
pub const PC_START: u16 = 0x3000;

/// A general purpose register index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// All registers in index order.
    pub const ALL: [Reg; 8] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3,
        Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    ];

    /// Register selected by the low 3 bits of `bits`.
    #[inline]
    pub fn from_bits(bits: u16) -> Self {
        Self::ALL[(bits & 0x7) as usize]
    }

    /// Index 0-7.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Condition flag.
///
/// Discriminants match the n/z/p bits (11-9) of a BR instruction,
/// so a branch is taken when `nzp & flag.bits() != 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CondFlag {
    Positive = 0b001,
    Zero = 0b010,
    Negative = 0b100,
}

impl CondFlag {
    /// Classify a 16-bit value by its two's complement sign.
    pub fn from_value(value: u16) -> Self {
        if value == 0 {
            CondFlag::Zero
        } else if value & 0x8000 != 0 {
            CondFlag::Negative
        } else {
            CondFlag::Positive
        }
    }

    /// The flag as an n/z/p mask.
    #[inline]
    pub fn bits(self) -> u16 {
        self as u16
    }
}

/// The LC-3 register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// R0-R7
    gpr: [u16; 8],

    /// Program counter
    pub pc: u16,

    /// Condition flag of the last general purpose register write
    pub cond: CondFlag,
}

impl Registers {
    /// Boot state: GPRs zeroed, PC at [`PC_START`], flag Z.
    pub fn new() -> Self {
        Self {
            gpr: [0; 8],
            pc: PC_START,
            cond: CondFlag::Zero,
        }
    }

    /// Return to the boot state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn get(&self, reg: Reg) -> u16 {
        self.gpr[reg.index()]
    }

    /// Write a general purpose register and refresh the condition flag
    /// from the written value.
    #[inline]
    pub fn set(&mut self, reg: Reg, value: u16) {
        self.gpr[reg.index()] = value;
        self.cond = CondFlag::from_value(value);
    }

    /// Write a general purpose register without touching the flag.
    ///
    /// Only the R7 link save of JSR/JSRR/TRAP uses this.
    #[inline]
    pub fn set_link(&mut self, value: u16) {
        self.gpr[Reg::R7.index()] = value;
    }

    /// Increment the program counter (wrapping). Returns the old value.
    pub fn advance_pc(&mut self) -> u16 {
        let old = self.pc;
        self.pc = self.pc.wrapping_add(1);
        old
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: u16) {
        self.pc = addr;
    }

    /// PC plus a sign-extended offset, modulo 2^16.
    pub fn pc_relative(&self, offset: i16) -> u16 {
        self.pc.wrapping_add(offset as u16)
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
