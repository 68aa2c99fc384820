//! CPU execution engine for the LC-3.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use std::io::{self, Read};
use std::path::Path;

use log::{debug, error, info, trace};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::bridge::IoBridge;
use crate::cpu::decode::{self, DecodeError, Instruction, Opcode, Operand};
use crate::cpu::{Memory, Registers};
use crate::image::{self, ImageError, LoadedImage};

/// VM execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    /// Fetching and executing instructions.
    Running,
    /// A HALT trap was executed.
    Halted,
}

/// An LC-3 machine: registers, memory and the console it talks to.
pub struct Vm<B: IoBridge> {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: VmState,
    /// Instructions executed since boot.
    pub cycles: u64,
    pub(crate) bridge: B,
    images_loaded: usize,
    last_instr: Option<Instruction>,
}

impl<B: IoBridge> Vm<B> {
    /// Boot a machine with zeroed memory, PC at 0x3000 and flag Z.
    pub fn new(bridge: B) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: VmState::Running,
            cycles: 0,
            bridge,
            images_loaded: 0,
            last_instr: None,
        }
    }

    /// Reset to the boot state, discarding loaded images.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.state = VmState::Running;
        self.cycles = 0;
        self.images_loaded = 0;
        self.last_instr = None;
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Move the machine onto another console, keeping its state.
    ///
    /// Returns the machine and the console it was using.
    pub fn swap_bridge<C: IoBridge>(self, bridge: C) -> (Vm<C>, B) {
        let vm = Vm {
            regs: self.regs,
            mem: self.mem,
            state: self.state,
            cycles: self.cycles,
            bridge,
            images_loaded: self.images_loaded,
            last_instr: self.last_instr,
        };
        (vm, self.bridge)
    }

    /// Store `words` at `origin`, as if loaded from an image.
    ///
    /// Returns the number of words stored.
    pub fn load_program(&mut self, origin: u16, words: &[u16]) -> usize {
        self.images_loaded += 1;
        self.mem.load(origin, words)
    }

    /// Load an image from a byte stream.
    pub fn load_image<R: Read>(&mut self, reader: R) -> Result<LoadedImage, ImageError> {
        let loaded = image::load_image(&mut self.mem, reader)?;
        self.images_loaded += 1;
        Ok(loaded)
    }

    /// Load an image file.
    pub fn load_image_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadedImage, ImageError> {
        let loaded = image::load_image_file(&mut self.mem, path)?;
        self.images_loaded += 1;
        Ok(loaded)
    }

    /// Load image files in order; later images overwrite earlier ones
    /// where they overlap.
    ///
    /// An image that fails to load is logged and skipped. Fails only when
    /// none of them loaded. Returns the number loaded.
    pub fn load_image_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, VmError> {
        let mut loaded = 0;
        for path in paths {
            match self.load_image_file(path) {
                Ok(image) => {
                    info!("loaded {}: {} words at {:#06x}",
                        path.as_ref().display(), image.len, image.origin);
                    loaded += 1;
                }
                Err(e) => error!("{}", e),
            }
        }

        if loaded == 0 {
            return Err(VmError::NoImageLoaded);
        }
        Ok(loaded)
    }

    /// Number of images loaded since boot.
    pub fn images_loaded(&self) -> usize {
        self.images_loaded
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or an error. An
    /// [`VmError::UnknownOpcode`] is fatal: the machine has no defined state
    /// to continue from.
    pub fn step(&mut self) -> Result<Instruction, VmError> {
        if self.state != VmState::Running {
            return Err(VmError::NotRunning(self.state));
        }
        if self.images_loaded == 0 {
            return Err(VmError::NoImageLoaded);
        }

        // Fetch, advancing PC before execute (jumps override it)
        let pc = self.regs.advance_pc();
        let word = self.mem.read(pc, &mut self.bridge)?;

        // Decode
        let instr = decode::decode(word).map_err(|e| match e {
            DecodeError::UnknownOpcode(opcode) => VmError::UnknownOpcode { opcode, pc },
        })?;
        trace!("{:#06x}: {:#06x} {:?}", pc, word, instr);

        // Execute
        self.execute(instr)?;

        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(instr)
    }

    /// Run until HALT or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, VmError> {
        let start_cycles = self.cycles;

        while self.state == VmState::Running {
            self.step()?;
        }

        debug!("halted after {} instructions", self.cycles - start_cycles);
        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction.
    fn execute(&mut self, instr: Instruction) -> Result<(), VmError> {
        match instr {
            // ==================== Operate ====================

            Instruction::Add { dr, sr1, operand } => {
                let value = self.regs.get(sr1).wrapping_add(self.operand(operand));
                self.regs.set(dr, value);
            }

            Instruction::And { dr, sr1, operand } => {
                let value = self.regs.get(sr1) & self.operand(operand);
                self.regs.set(dr, value);
            }

            Instruction::Not { dr, sr } => {
                let value = !self.regs.get(sr);
                self.regs.set(dr, value);
            }

            // ==================== Data Movement ====================

            Instruction::Ld { dr, offset } => {
                let addr = self.regs.pc_relative(offset);
                let value = self.mem.read(addr, &mut self.bridge)?;
                self.regs.set(dr, value);
            }

            Instruction::Ldi { dr, offset } => {
                let pointer = self.regs.pc_relative(offset);
                let addr = self.mem.read(pointer, &mut self.bridge)?;
                let value = self.mem.read(addr, &mut self.bridge)?;
                self.regs.set(dr, value);
            }

            Instruction::Ldr { dr, base, offset } => {
                let addr = self.regs.get(base).wrapping_add(offset as u16);
                let value = self.mem.read(addr, &mut self.bridge)?;
                self.regs.set(dr, value);
            }

            Instruction::Lea { dr, offset } => {
                let addr = self.regs.pc_relative(offset);
                self.regs.set(dr, addr);
            }

            Instruction::St { sr, offset } => {
                let addr = self.regs.pc_relative(offset);
                self.mem.write(addr, self.regs.get(sr));
            }

            Instruction::Sti { sr, offset } => {
                let pointer = self.regs.pc_relative(offset);
                let addr = self.mem.read(pointer, &mut self.bridge)?;
                self.mem.write(addr, self.regs.get(sr));
            }

            Instruction::Str { sr, base, offset } => {
                let addr = self.regs.get(base).wrapping_add(offset as u16);
                self.mem.write(addr, self.regs.get(sr));
            }

            // ==================== Control ====================

            Instruction::Br { nzp, offset } => {
                if nzp & self.regs.cond.bits() != 0 {
                    let target = self.regs.pc_relative(offset);
                    self.regs.jump(target);
                }
            }

            Instruction::Jmp { base } => {
                let target = self.regs.get(base);
                self.regs.jump(target);
            }

            Instruction::Jsr { offset } => {
                let target = self.regs.pc_relative(offset);
                self.regs.set_link(self.regs.pc);
                self.regs.jump(target);
            }

            Instruction::Jsrr { base } => {
                // Read the base first so JSRR R7 jumps to the old R7.
                let target = self.regs.get(base);
                self.regs.set_link(self.regs.pc);
                self.regs.jump(target);
            }

            Instruction::Trap { vector } => {
                self.regs.set_link(self.regs.pc);
                self.trap(vector)?;
            }
        }

        Ok(())
    }

    fn operand(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Reg(reg) => self.regs.get(reg),
            Operand::Imm(imm) => imm as u16,
        }
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the VM has halted.
    pub fn is_halted(&self) -> bool {
        self.state == VmState::Halted
    }

    /// Check if the VM is running.
    pub fn is_running(&self) -> bool {
        self.state == VmState::Running
    }
}

impl<B: IoBridge> std::fmt::Debug for Vm<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during execution.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("VM not running: {0:?}")]
    NotRunning(VmState),

    #[error("no program image loaded")]
    NoImageLoaded,

    #[error("unknown opcode {opcode:?} at {pc:#06x}")]
    UnknownOpcode { opcode: Opcode, pc: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::PipeIo;
    use crate::cpu::decode::encode;
    use crate::cpu::memory::{KBDR, KBSR};
    use crate::cpu::registers::{CondFlag, Reg};
    use crate::cpu::trap::{TrapVector, HALT_MESSAGE};
    use proptest::prelude::*;

    const HALT: Instruction = Instruction::Trap { vector: TrapVector::Halt as u8 };

    fn make_program(instructions: &[Instruction]) -> Vec<u16> {
        instructions.iter().map(encode).collect()
    }

    fn vm_with(instructions: &[Instruction]) -> Vm<PipeIo> {
        let mut vm = Vm::new(PipeIo::new());
        vm.load_program(0x3000, &make_program(instructions));
        vm
    }

    #[test]
    fn test_vm_halt() {
        let mut vm = vm_with(&[HALT]);

        let executed = vm.run().unwrap();

        assert_eq!(executed, 1);
        assert!(vm.is_halted());
        assert_eq!(vm.regs.pc, 0x3001);
        assert_eq!(vm.bridge().output_string(), HALT_MESSAGE);
    }

    #[test]
    fn test_step_after_halt() {
        let mut vm = vm_with(&[HALT, HALT]);
        vm.run().unwrap();

        assert!(matches!(vm.step(), Err(VmError::NotRunning(VmState::Halted))));
        assert_eq!(vm.cycles, 1);
    }

    #[test]
    fn test_reset_returns_to_boot_state() {
        let mut vm = vm_with(&[HALT]);
        vm.regs.set(Reg::R3, 0x8000);
        vm.run().unwrap();

        vm.reset();

        assert!(vm.is_running());
        assert_eq!(vm.regs, Registers::new());
        assert_eq!(vm.mem.peek(0x3000), 0);
        assert_eq!(vm.images_loaded(), 0);
        assert_eq!(vm.last_instruction(), None);
    }

    #[test]
    fn test_requires_image() {
        let mut vm = Vm::new(PipeIo::new());
        assert!(matches!(vm.step(), Err(VmError::NoImageLoaded)));
        assert!(matches!(vm.run(), Err(VmError::NoImageLoaded)));
    }

    #[test]
    fn test_add_immediate() {
        // ADD R0, R1, #-1 with R1 = 5
        let mut vm = vm_with(&[Instruction::Add {
            dr: Reg::R0,
            sr1: Reg::R1,
            operand: Operand::Imm(-1),
        }]);
        vm.regs.set(Reg::R1, 5);
        vm.step().unwrap();

        assert_eq!(vm.regs.get(Reg::R0), 4);
        assert_eq!(vm.regs.cond, CondFlag::Positive);
    }

    #[test]
    fn test_add_register_wraps() {
        let mut vm = vm_with(&[Instruction::Add {
            dr: Reg::R2,
            sr1: Reg::R3,
            operand: Operand::Reg(Reg::R4),
        }]);
        vm.regs.set(Reg::R3, 0xFFFF);
        vm.regs.set(Reg::R4, 1);
        vm.step().unwrap();

        assert_eq!(vm.regs.get(Reg::R2), 0);
        assert_eq!(vm.regs.cond, CondFlag::Zero);
    }

    #[test]
    fn test_and_and_not() {
        let mut vm = vm_with(&[
            Instruction::And { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(0) },
            Instruction::And { dr: Reg::R1, sr1: Reg::R2, operand: Operand::Reg(Reg::R3) },
            Instruction::Not { dr: Reg::R4, sr: Reg::R1 },
        ]);
        vm.regs.set(Reg::R0, 0x1234);
        vm.regs.set(Reg::R2, 0xF0F0);
        vm.regs.set(Reg::R3, 0x3C3C);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R0), 0);
        assert_eq!(vm.regs.cond, CondFlag::Zero);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R1), 0x3030);
        assert_eq!(vm.regs.cond, CondFlag::Positive);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R4), 0xCFCF);
        assert_eq!(vm.regs.cond, CondFlag::Negative);
    }

    #[test]
    fn test_branch_taken_and_not_taken() {
        let mut vm = vm_with(&[
            Instruction::Br { nzp: 0b100, offset: 5 }, // BRn, flag is Z
            Instruction::Br { nzp: 0b010, offset: -2 }, // BRz back to start
        ]);

        vm.step().unwrap();
        assert_eq!(vm.regs.pc, 0x3001);

        vm.step().unwrap();
        assert_eq!(vm.regs.pc, 0x3000);
    }

    #[test]
    fn test_branch_never_with_empty_mask() {
        let mut vm = vm_with(&[Instruction::Br { nzp: 0, offset: 10 }]);
        vm.step().unwrap();
        assert_eq!(vm.regs.pc, 0x3001);
    }

    #[test]
    fn test_ld_lea_st() {
        let mut vm = vm_with(&[
            Instruction::Ld { dr: Reg::R1, offset: 3 },
            Instruction::Lea { dr: Reg::R2, offset: -2 },
            Instruction::St { sr: Reg::R1, offset: 2 },
        ]);
        vm.mem.write(0x3004, 0x8001);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R1), 0x8001);
        assert_eq!(vm.regs.cond, CondFlag::Negative);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R2), 0x3000);
        assert_eq!(vm.regs.cond, CondFlag::Positive);

        vm.step().unwrap();
        assert_eq!(vm.mem.peek(0x3005), 0x8001);
    }

    #[test]
    fn test_ldi_double_indirection() {
        let mut vm = Vm::new(PipeIo::new());
        // PC is 0x0081 after the fetch, 0x0081 + 0x7F = 0x0100
        vm.load_program(0x0080, &make_program(&[
            Instruction::Ldi { dr: Reg::R2, offset: 0x7F },
        ]));
        vm.regs.pc = 0x0080;
        vm.mem.write(0x0100, 0x0123);
        vm.mem.write(0x0123, 0x0042);

        vm.step().unwrap();

        assert_eq!(vm.regs.get(Reg::R2), 0x0042);
        assert_eq!(vm.regs.cond, CondFlag::Positive);
    }

    #[test]
    fn test_sti() {
        let mut vm = vm_with(&[Instruction::Sti { sr: Reg::R5, offset: 0 }]);
        vm.mem.write(0x3001, 0x4000);
        vm.regs.set(Reg::R5, 77);
        vm.step().unwrap();

        assert_eq!(vm.mem.peek(0x4000), 77);
        assert_eq!(vm.mem.peek(0x3001), 0x4000);
    }

    #[test]
    fn test_ldr_str_negative_offset() {
        let mut vm = vm_with(&[
            Instruction::Str { sr: Reg::R0, base: Reg::R6, offset: -1 },
            Instruction::Ldr { dr: Reg::R1, base: Reg::R6, offset: -1 },
        ]);
        vm.regs.set(Reg::R6, 0x0000);
        vm.regs.set(Reg::R0, 0xABCD);

        vm.step().unwrap();
        assert_eq!(vm.mem.peek(0xFFFF), 0xABCD);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R1), 0xABCD);
    }

    #[test]
    fn test_stores_leave_flag() {
        let mut vm = vm_with(&[Instruction::St { sr: Reg::R0, offset: 4 }]);
        vm.regs.set(Reg::R0, 0x8000);
        vm.regs.set(Reg::R1, 1);
        vm.step().unwrap();
        assert_eq!(vm.regs.cond, CondFlag::Positive);
    }

    #[test]
    fn test_jsr_and_return() {
        let mut vm = vm_with(&[
            Instruction::Jsr { offset: 2 },                                        // 0x3000
            HALT,                                                                  // 0x3001
            Instruction::Add { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(1) }, // 0x3002
            Instruction::Add { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(2) }, // 0x3003
            Instruction::Jmp { base: Reg::R7 },                                    // 0x3004
        ]);

        vm.step().unwrap();
        assert_eq!(vm.regs.get(Reg::R7), 0x3001);
        assert_eq!(vm.regs.pc, 0x3003);

        vm.run().unwrap();
        assert_eq!(vm.regs.get(Reg::R0), 2);
        assert_eq!(vm.regs.pc, 0x3002);
        assert!(vm.is_halted());
    }

    #[test]
    fn test_jsrr_through_r7() {
        let mut vm = vm_with(&[Instruction::Jsrr { base: Reg::R7 }]);
        vm.regs.set_link(0x4000);
        vm.step().unwrap();

        assert_eq!(vm.regs.pc, 0x4000);
        assert_eq!(vm.regs.get(Reg::R7), 0x3001);
    }

    #[test]
    fn test_unknown_opcode_is_fatal() {
        let mut vm = Vm::new(PipeIo::new());
        vm.load_program(0x3000, &[0x8000]);

        match vm.run() {
            Err(VmError::UnknownOpcode { opcode, pc }) => {
                assert_eq!(opcode, Opcode::Rti);
                assert_eq!(pc, 0x3000);
            }
            other => panic!("expected unknown opcode, got {:?}", other),
        }
        assert_eq!(vm.cycles, 0);
    }

    #[test]
    fn test_reserved_opcode_is_fatal() {
        let mut vm = Vm::new(PipeIo::new());
        vm.load_program(0x3000, &[0xD000]);
        assert!(matches!(vm.step(), Err(VmError::UnknownOpcode { opcode: Opcode::Res, .. })));
    }

    #[test]
    fn test_keyboard_polling_loop() {
        // poll: LDI R1, KBSR_PTR ; BRzp poll ; LDI R0, KBDR_PTR ; HALT
        let mut vm = Vm::new(PipeIo::with_input(b"x"));
        vm.load_program(0x3000, &make_program(&[
            Instruction::Ldi { dr: Reg::R1, offset: 3 },
            Instruction::Br { nzp: 0b011, offset: -2 },
            Instruction::Ldi { dr: Reg::R0, offset: 2 },
            HALT,
        ]));
        vm.mem.write(0x3004, KBSR);
        vm.mem.write(0x3005, KBDR);

        vm.run().unwrap();

        assert_eq!(vm.regs.get(Reg::R0), b'x' as u16);
        assert_eq!(vm.regs.get(Reg::R1), 0x8000);
    }

    #[test]
    fn test_multiple_loads_last_wins() {
        let mut vm = Vm::new(PipeIo::new());
        vm.load_program(0x3000, &[1, 2, 3]);
        vm.load_program(0x3001, &[9]);

        assert_eq!(vm.images_loaded(), 2);
        assert_eq!(vm.mem.dump(0x3000, 3), vec![(0x3000, 1), (0x3001, 9), (0x3002, 3)]);
    }

    #[test]
    fn test_swap_bridge_after_loading() {
        let mut boot = vm_with(&[
            Instruction::Trap { vector: TrapVector::Getc as u8 },
            HALT,
        ]);
        boot.regs.set(Reg::R3, 42);

        let (mut vm, old) = boot.swap_bridge(PipeIo::with_input(b"z"));
        vm.run().unwrap();

        assert!(old.output().is_empty());
        assert_eq!(vm.regs.get(Reg::R3), 42);
        assert_eq!(vm.regs.get(Reg::R0), b'z' as u16);
        assert_eq!(vm.bridge().output_string(), HALT_MESSAGE);
    }

    #[test]
    fn test_load_image_files_skips_missing() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("lc3-vm-skip-{}.obj", std::process::id()));
        std::fs::write(&good, [0x30, 0x00, 0xF0, 0x25]).unwrap();
        let missing = dir.join("lc3-vm-definitely-missing.obj");

        let mut vm = Vm::new(PipeIo::new());
        let loaded = vm.load_image_files(&[missing.clone(), good.clone()]).unwrap();
        std::fs::remove_file(&good).unwrap();

        assert_eq!(loaded, 1);
        vm.run().unwrap();
        assert!(vm.is_halted());

        let mut empty = Vm::new(PipeIo::new());
        assert!(matches!(empty.load_image_files(&[missing]), Err(VmError::NoImageLoaded)));
    }

    #[test]
    fn test_hello_world_program() {
        let mut vm = vm_with(&[
            Instruction::Lea { dr: Reg::R0, offset: 2 },
            Instruction::Trap { vector: TrapVector::Puts as u8 },
            HALT,
        ]);
        for (i, ch) in "Hello, World!\n".bytes().enumerate() {
            vm.mem.write(0x3003 + i as u16, ch as u16);
        }

        vm.run().unwrap();

        assert_eq!(vm.bridge().output_string(), "Hello, World!\nHALT\n");
    }

    #[test]
    fn test_countdown_loop() {
        // R0 = 5; loop: R1 += 2; R0 -= 1; BRp loop; HALT
        let mut vm = vm_with(&[
            Instruction::And { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(0) },
            Instruction::Add { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(5) },
            Instruction::Add { dr: Reg::R1, sr1: Reg::R1, operand: Operand::Imm(2) },
            Instruction::Add { dr: Reg::R0, sr1: Reg::R0, operand: Operand::Imm(-1) },
            Instruction::Br { nzp: 0b001, offset: -3 },
            HALT,
        ]);

        let executed = vm.run().unwrap();

        assert_eq!(vm.regs.get(Reg::R1), 10);
        assert_eq!(vm.regs.get(Reg::R0), 0);
        assert_eq!(executed, 2 + 5 * 3 + 1);
        assert_eq!(vm.last_instruction(), Some(HALT));
    }

    proptest! {
        #[test]
        fn prop_register_writes_set_one_flag(a: u16, b: u16, imm in -16i16..16) {
            let writers = [
                Instruction::Add { dr: Reg::R0, sr1: Reg::R1, operand: Operand::Reg(Reg::R2) },
                Instruction::Add { dr: Reg::R0, sr1: Reg::R1, operand: Operand::Imm(imm) },
                Instruction::And { dr: Reg::R0, sr1: Reg::R1, operand: Operand::Reg(Reg::R2) },
                Instruction::And { dr: Reg::R0, sr1: Reg::R1, operand: Operand::Imm(imm) },
                Instruction::Not { dr: Reg::R0, sr: Reg::R1 },
                Instruction::Ld { dr: Reg::R0, offset: 10 },
                Instruction::Ldr { dr: Reg::R0, base: Reg::R1, offset: 0 },
                Instruction::Lea { dr: Reg::R0, offset: imm },
            ];

            for instr in writers {
                let mut vm = vm_with(&[instr]);
                vm.regs.set(Reg::R1, a);
                vm.regs.set(Reg::R2, b);
                vm.mem.write(0x300B, b);
                vm.step().unwrap();

                let written = vm.regs.get(Reg::R0);
                let expected = match written {
                    0 => CondFlag::Zero,
                    w if w & 0x8000 != 0 => CondFlag::Negative,
                    _ => CondFlag::Positive,
                };
                prop_assert_eq!(vm.regs.cond, expected);
            }
        }
    }
}
