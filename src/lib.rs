//! # LC-3 VM
//!
//! An emulator for the LC-3, a 16-bit educational computer.
//!
//! A [`Vm`] owns its memory and registers and talks to the outside world
//! only through an [`IoBridge`], so any number of machines can run side by
//! side and tests can script their console.

pub mod cpu;
pub mod image;
pub mod bridge;

// Re-export commonly used types
pub use cpu::{Vm, VmError, VmState, Memory, Registers, Reg, CondFlag, Instruction, Opcode};
pub use image::{ImageError, LoadedImage, load_image, load_image_file};
pub use bridge::{IoBridge, PipeIo, StdIo};

#[cfg(feature = "terminal")]
pub use bridge::TerminalIo;
