//! CPU emulation for the LC-3.
//!
//! This module implements the LC-3 architecture:
//! - 65,536 sixteen-bit memory words with memory-mapped keyboard registers
//! - 8 general purpose registers, PC and a N/Z/P condition flag
//! - 15-instruction set plus native trap routines for console I/O

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod trap;

pub use memory::Memory;
pub use registers::{Registers, Reg, CondFlag};
pub use decode::{Instruction, Opcode, Operand, DecodeError};
pub use execute::{Vm, VmError, VmState};
pub use trap::TrapVector;
