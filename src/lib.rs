//! # MOS 6502 CPU Execution Core
//!
//! An instruction-accurate implementation of the MOS 6502 8-bit
//! microprocessor in Rust. The crate provides the decode-and-execute engine
//! of the CPU as used in classic computers like the Apple II, Commodore 64,
//! and NES: opcode fetch, addressing-mode resolution, instruction semantics,
//! flag handling, stack discipline, and interrupt servicing.
//!
//! ## Features
//!
//! - All 56 documented instructions across their 151 opcodes
//! - Table-driven decode (256-entry descriptor table built once at startup)
//! - Accurate flag handling for all arithmetic and logic operations,
//!   including NMOS decimal-mode ADC/SBC
//! - Cycle accounting with page-crossing and branch penalties
//! - RESET/NMI/IRQ lines, sampled only at instruction boundaries
//! - Historic 6502 bugs for authenticity (JMP indirect page boundary bug)
//! - Undocumented opcodes fail with [`StepError::UnimplementedOpcode`]
//!   instead of guessing; memory lives behind the [`Bus`] trait
//! - Comprehensive test suite
//!
//! ## Example
//!
//! ```rust
//! use mos6502_core::cpu::CPU;
//! use mos6502_core::memory::Memory;
//!
//! let mut cpu = CPU::new();
//! let mut memory = Memory::new();
//!
//! // Load a simple program: LDA #$42, NOP
//! memory.write(0x8000, 0xA9); // LDA #$42
//! memory.write(0x8001, 0x42);
//! memory.write(0x8002, 0xEA); // NOP
//!
//! // Set reset vector
//! memory.write(0xFFFC, 0x00);
//! memory.write(0xFFFD, 0x80);
//!
//! cpu.reset(&mut memory);
//! cpu.step(&mut memory).unwrap(); // Execute LDA
//!
//! assert_eq!(cpu.get_register_a(), 0x42);
//! ```

use thiserror::Error;

pub mod cpu;
pub mod memory;
pub mod metrics;
pub mod opcodes;
pub mod snapshots;

pub use cpu::CPU;
pub use memory::{Bus, Memory};
pub use opcodes::{AddressingMode, Mnemonic, OpcodeInfo, OPCODE_TABLE};
pub use snapshots::{CpuSnapshot, MachineSnapshot};

/// Errors surfaced by a single call to [`CPU::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// The opcode byte has no descriptor in the table. The core halts and PC
    /// is left pointing at the offending byte; the host decides whether to
    /// report, or to skip the byte and resume.
    #[error("unimplemented opcode ${opcode:02X} at ${address:04X}")]
    UnimplementedOpcode { opcode: u8, address: u16 },

    /// An instruction was dispatched with an addressing mode it cannot use.
    /// Only reachable through a defect in the opcode table itself.
    #[error("addressing mode {mode:?} is not valid for {mnemonic}")]
    InvalidAddressingMode {
        mnemonic: Mnemonic,
        mode: AddressingMode,
    },
}
