//! Instruction decoder for the LC-3.
//!
//! Every instruction is one 16-bit word. Bits 15-12 select the opcode and
//! the remaining bits hold opcode-specific fields:
//!
//! ```text
//! ADD/AND  | op | DR  | SR1 | 0 | 00 | SR2 |     or  | op | DR | SR1 | 1 | imm5 |
//! BR       | op | n z p | PCoffset9 |
//! JMP      | op | 000 | BaseR | 000000 |
//! JSR      | op | 1 | PCoffset11 |           JSRR | op | 0 | 00 | BaseR | 000000 |
//! LD/LDI/LEA/ST/STI | op | DR/SR | PCoffset9 |
//! LDR/STR  | op | DR/SR | BaseR | offset6 |
//! NOT      | op | DR | SR | 111111 |
//! TRAP     | op | 0000 | trapvect8 |
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::cpu::registers::Reg;

/// Widen the low `bits` bits of `value` to 16 bits, copying the field's top
/// bit into every higher position.
///
/// `bits` must be in `1..16`.
#[inline]
pub fn sign_extend(value: u16, bits: u32) -> u16 {
    debug_assert!(bits > 0 && bits < 16);
    let field = value & ((1u16 << bits) - 1);
    if (field >> (bits - 1)) & 1 == 1 {
        field | (0xFFFF << bits)
    } else {
        field
    }
}

/// Extract `width` bits starting at bit `lo`.
#[inline]
fn field(word: u16, lo: u32, width: u32) -> u16 {
    (word >> lo) & ((1u16 << width) - 1)
}

#[inline]
fn signed_field(word: u16, width: u32) -> i16 {
    sign_extend(word, width) as i16
}

/// The 16 values of bits 15-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    Br = 0,
    Add,
    Ld,
    St,
    Jsr,
    And,
    Ldr,
    Str,
    /// Return from interrupt. Unsupported.
    Rti,
    Not,
    Ldi,
    Sti,
    Jmp,
    /// Reserved.
    Res,
    Lea,
    Trap,
}

impl Opcode {
    const ALL: [Opcode; 16] = [
        Opcode::Br, Opcode::Add, Opcode::Ld, Opcode::St,
        Opcode::Jsr, Opcode::And, Opcode::Ldr, Opcode::Str,
        Opcode::Rti, Opcode::Not, Opcode::Ldi, Opcode::Sti,
        Opcode::Jmp, Opcode::Res, Opcode::Lea, Opcode::Trap,
    ];

    /// Opcode of an instruction word.
    #[inline]
    pub fn of(word: u16) -> Self {
        Self::ALL[(word >> 12) as usize]
    }

    /// The 4-bit opcode value.
    #[inline]
    pub fn bits(self) -> u16 {
        self as u16
    }
}

/// Second operand of ADD and AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// SR2 (bit 5 clear)
    Reg(Reg),
    /// Sign-extended imm5 (bit 5 set)
    Imm(i16),
}

/// Decoded LC-3 instruction.
///
/// Offsets and immediates are already sign-extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ==================== Operate ====================

    /// DR := SR1 + operand
    Add { dr: Reg, sr1: Reg, operand: Operand },

    /// DR := SR1 & operand
    And { dr: Reg, sr1: Reg, operand: Operand },

    /// DR := !SR
    Not { dr: Reg, sr: Reg },

    // ==================== Data Movement ====================

    /// DR := mem[PC + offset]
    Ld { dr: Reg, offset: i16 },

    /// DR := mem[mem[PC + offset]]
    Ldi { dr: Reg, offset: i16 },

    /// DR := mem[BaseR + offset]
    Ldr { dr: Reg, base: Reg, offset: i16 },

    /// DR := PC + offset
    Lea { dr: Reg, offset: i16 },

    /// mem[PC + offset] := SR
    St { sr: Reg, offset: i16 },

    /// mem[mem[PC + offset]] := SR
    Sti { sr: Reg, offset: i16 },

    /// mem[BaseR + offset] := SR
    Str { sr: Reg, base: Reg, offset: i16 },

    // ==================== Control ====================

    /// If `nzp & COND != 0`, PC := PC + offset
    Br { nzp: u16, offset: i16 },

    /// PC := BaseR (RET is JMP R7)
    Jmp { base: Reg },

    /// R7 := PC, PC := PC + offset
    Jsr { offset: i16 },

    /// R7 := PC, PC := BaseR
    Jsrr { base: Reg },

    /// R7 := PC, then run the service routine for `vector`
    Trap { vector: u8 },
}

impl Instruction {
    /// Opcode this instruction encodes to.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Add { .. } => Opcode::Add,
            Instruction::And { .. } => Opcode::And,
            Instruction::Not { .. } => Opcode::Not,
            Instruction::Ld { .. } => Opcode::Ld,
            Instruction::Ldi { .. } => Opcode::Ldi,
            Instruction::Ldr { .. } => Opcode::Ldr,
            Instruction::Lea { .. } => Opcode::Lea,
            Instruction::St { .. } => Opcode::St,
            Instruction::Sti { .. } => Opcode::Sti,
            Instruction::Str { .. } => Opcode::Str,
            Instruction::Br { .. } => Opcode::Br,
            Instruction::Jmp { .. } => Opcode::Jmp,
            Instruction::Jsr { .. } | Instruction::Jsrr { .. } => Opcode::Jsr,
            Instruction::Trap { .. } => Opcode::Trap,
        }
    }
}

/// Decode a 16-bit instruction word.
pub fn decode(word: u16) -> Result<Instruction, DecodeError> {
    let dr = Reg::from_bits(field(word, 9, 3));
    let sr1 = Reg::from_bits(field(word, 6, 3));

    let operand = || {
        if field(word, 5, 1) == 1 {
            Operand::Imm(signed_field(word, 5))
        } else {
            Operand::Reg(Reg::from_bits(field(word, 0, 3)))
        }
    };

    let instruction = match Opcode::of(word) {
        Opcode::Add => Instruction::Add { dr, sr1, operand: operand() },
        Opcode::And => Instruction::And { dr, sr1, operand: operand() },
        Opcode::Not => Instruction::Not { dr, sr: sr1 },
        Opcode::Ld => Instruction::Ld { dr, offset: signed_field(word, 9) },
        Opcode::Ldi => Instruction::Ldi { dr, offset: signed_field(word, 9) },
        Opcode::Ldr => Instruction::Ldr { dr, base: sr1, offset: signed_field(word, 6) },
        Opcode::Lea => Instruction::Lea { dr, offset: signed_field(word, 9) },
        Opcode::St => Instruction::St { sr: dr, offset: signed_field(word, 9) },
        Opcode::Sti => Instruction::Sti { sr: dr, offset: signed_field(word, 9) },
        Opcode::Str => Instruction::Str { sr: dr, base: sr1, offset: signed_field(word, 6) },
        Opcode::Br => Instruction::Br { nzp: field(word, 9, 3), offset: signed_field(word, 9) },
        Opcode::Jmp => Instruction::Jmp { base: sr1 },
        Opcode::Jsr if field(word, 11, 1) == 1 => Instruction::Jsr { offset: signed_field(word, 11) },
        Opcode::Jsr => Instruction::Jsrr { base: sr1 },
        Opcode::Trap => Instruction::Trap { vector: field(word, 0, 8) as u8 },
        op @ (Opcode::Rti | Opcode::Res) => return Err(DecodeError::UnknownOpcode(op)),
    };

    Ok(instruction)
}

/// Encode an instruction back to a word.
///
/// Offsets and immediates are truncated to their field width. Bits the
/// decoder ignores are zero, except NOT which sets bits 5-0 as the ISA
/// requires.
pub fn encode(instr: &Instruction) -> u16 {
    let op = instr.opcode().bits() << 12;
    let reg = |r: Reg, lo: u32| (r.index() as u16) << lo;
    let off = |v: i16, width: u32| (v as u16) & ((1u16 << width) - 1);
    let operand = |o: Operand| match o {
        Operand::Reg(r) => reg(r, 0),
        Operand::Imm(v) => 1 << 5 | off(v, 5),
    };

    let rest = match *instr {
        Instruction::Add { dr, sr1, operand: o }
        | Instruction::And { dr, sr1, operand: o } => reg(dr, 9) | reg(sr1, 6) | operand(o),
        Instruction::Not { dr, sr } => reg(dr, 9) | reg(sr, 6) | 0x3F,
        Instruction::Ld { dr, offset }
        | Instruction::Ldi { dr, offset }
        | Instruction::Lea { dr, offset } => reg(dr, 9) | off(offset, 9),
        Instruction::St { sr, offset }
        | Instruction::Sti { sr, offset } => reg(sr, 9) | off(offset, 9),
        Instruction::Ldr { dr, base, offset } => reg(dr, 9) | reg(base, 6) | off(offset, 6),
        Instruction::Str { sr, base, offset } => reg(sr, 9) | reg(base, 6) | off(offset, 6),
        Instruction::Br { nzp, offset } => (nzp & 0x7) << 9 | off(offset, 9),
        Instruction::Jmp { base } => reg(base, 6),
        Instruction::Jsr { offset } => 1 << 11 | off(offset, 11),
        Instruction::Jsrr { base } => reg(base, 6),
        Instruction::Trap { vector } => vector as u16,
    };

    op | rest
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {0:?}")]
    UnknownOpcode(Opcode),
}
