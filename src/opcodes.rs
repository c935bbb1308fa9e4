use std::fmt;

use lazy_static::lazy_static;

/// The 56 documented 6502 instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Mnemonic {
    // Load/store
    LDA, LDX, LDY, STA, STX, STY,
    // Arithmetic
    ADC, SBC,
    // Compare
    CMP, CPX, CPY,
    // Logical
    AND, ORA, EOR, BIT,
    // Shifts and rotates
    ASL, LSR, ROL, ROR,
    // Increment/decrement
    INC, DEC, INX, INY, DEX, DEY,
    // Transfers
    TAX, TAY, TXA, TYA, TSX, TXS,
    // Stack
    PHA, PHP, PLA, PLP,
    // Jumps and calls
    JMP, JSR, RTS,
    // Interrupts
    BRK, RTI,
    // Flag manipulation
    CLC, SEC, CLI, SEI, CLD, SED, CLV,
    // Branches
    BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS,
    // No operation
    NOP,
}

impl Mnemonic {
    /// Instruction name as it appears in assembly listings and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Mnemonic::LDA => "LDA",
            Mnemonic::LDX => "LDX",
            Mnemonic::LDY => "LDY",
            Mnemonic::STA => "STA",
            Mnemonic::STX => "STX",
            Mnemonic::STY => "STY",
            Mnemonic::ADC => "ADC",
            Mnemonic::SBC => "SBC",
            Mnemonic::CMP => "CMP",
            Mnemonic::CPX => "CPX",
            Mnemonic::CPY => "CPY",
            Mnemonic::AND => "AND",
            Mnemonic::ORA => "ORA",
            Mnemonic::EOR => "EOR",
            Mnemonic::BIT => "BIT",
            Mnemonic::ASL => "ASL",
            Mnemonic::LSR => "LSR",
            Mnemonic::ROL => "ROL",
            Mnemonic::ROR => "ROR",
            Mnemonic::INC => "INC",
            Mnemonic::DEC => "DEC",
            Mnemonic::INX => "INX",
            Mnemonic::INY => "INY",
            Mnemonic::DEX => "DEX",
            Mnemonic::DEY => "DEY",
            Mnemonic::TAX => "TAX",
            Mnemonic::TAY => "TAY",
            Mnemonic::TXA => "TXA",
            Mnemonic::TYA => "TYA",
            Mnemonic::TSX => "TSX",
            Mnemonic::TXS => "TXS",
            Mnemonic::PHA => "PHA",
            Mnemonic::PHP => "PHP",
            Mnemonic::PLA => "PLA",
            Mnemonic::PLP => "PLP",
            Mnemonic::JMP => "JMP",
            Mnemonic::JSR => "JSR",
            Mnemonic::RTS => "RTS",
            Mnemonic::BRK => "BRK",
            Mnemonic::RTI => "RTI",
            Mnemonic::CLC => "CLC",
            Mnemonic::SEC => "SEC",
            Mnemonic::CLI => "CLI",
            Mnemonic::SEI => "SEI",
            Mnemonic::CLD => "CLD",
            Mnemonic::SED => "SED",
            Mnemonic::CLV => "CLV",
            Mnemonic::BCC => "BCC",
            Mnemonic::BCS => "BCS",
            Mnemonic::BEQ => "BEQ",
            Mnemonic::BNE => "BNE",
            Mnemonic::BMI => "BMI",
            Mnemonic::BPL => "BPL",
            Mnemonic::BVC => "BVC",
            Mnemonic::BVS => "BVS",
            Mnemonic::NOP => "NOP",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode byte.
    pub fn operand_bytes(&self) -> u16 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Total instruction length in bytes including the opcode.
    pub fn instruction_len(&self) -> u16 {
        1 + self.operand_bytes()
    }
}

/// Static description of a single documented opcode.
///
/// `cycles` is the base cost. `extra_cycles` is 1 for instructions that pay a
/// page-crossing penalty and 2 for branches (one for taking the branch, one
/// more for landing on a different page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub extra_cycles: u8,
}

fn entry(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8, extra_cycles: u8) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        mode,
        cycles,
        extra_cycles,
    })
}

/// Decode a single opcode byte into its descriptor.
///
/// The 105 undocumented opcodes decode to `None`; executing one is an error,
/// never a guess.
fn decode(opcode: u8) -> Option<OpcodeInfo> {
    use AddressingMode::*;
    use Mnemonic::*;

    match opcode {
        // LDA - Load Accumulator
        0xA9 => entry(LDA, Immediate, 2, 0),
        0xA5 => entry(LDA, ZeroPage, 3, 0),
        0xB5 => entry(LDA, ZeroPageX, 4, 0),
        0xAD => entry(LDA, Absolute, 4, 0),
        0xBD => entry(LDA, AbsoluteX, 4, 1),
        0xB9 => entry(LDA, AbsoluteY, 4, 1),
        0xA1 => entry(LDA, IndexedIndirect, 6, 0),
        0xB1 => entry(LDA, IndirectIndexed, 5, 1),

        // LDX - Load X Register
        0xA2 => entry(LDX, Immediate, 2, 0),
        0xA6 => entry(LDX, ZeroPage, 3, 0),
        0xB6 => entry(LDX, ZeroPageY, 4, 0),
        0xAE => entry(LDX, Absolute, 4, 0),
        0xBE => entry(LDX, AbsoluteY, 4, 1),

        // LDY - Load Y Register
        0xA0 => entry(LDY, Immediate, 2, 0),
        0xA4 => entry(LDY, ZeroPage, 3, 0),
        0xB4 => entry(LDY, ZeroPageX, 4, 0),
        0xAC => entry(LDY, Absolute, 4, 0),
        0xBC => entry(LDY, AbsoluteX, 4, 1),

        // STA - Store Accumulator (indexed stores pay no page penalty)
        0x85 => entry(STA, ZeroPage, 3, 0),
        0x95 => entry(STA, ZeroPageX, 4, 0),
        0x8D => entry(STA, Absolute, 4, 0),
        0x9D => entry(STA, AbsoluteX, 5, 0),
        0x99 => entry(STA, AbsoluteY, 5, 0),
        0x81 => entry(STA, IndexedIndirect, 6, 0),
        0x91 => entry(STA, IndirectIndexed, 6, 0),

        // STX - Store X Register
        0x86 => entry(STX, ZeroPage, 3, 0),
        0x96 => entry(STX, ZeroPageY, 4, 0),
        0x8E => entry(STX, Absolute, 4, 0),

        // STY - Store Y Register
        0x84 => entry(STY, ZeroPage, 3, 0),
        0x94 => entry(STY, ZeroPageX, 4, 0),
        0x8C => entry(STY, Absolute, 4, 0),

        // ADC - Add with Carry
        0x69 => entry(ADC, Immediate, 2, 0),
        0x65 => entry(ADC, ZeroPage, 3, 0),
        0x75 => entry(ADC, ZeroPageX, 4, 0),
        0x6D => entry(ADC, Absolute, 4, 0),
        0x7D => entry(ADC, AbsoluteX, 4, 1),
        0x79 => entry(ADC, AbsoluteY, 4, 1),
        0x61 => entry(ADC, IndexedIndirect, 6, 0),
        0x71 => entry(ADC, IndirectIndexed, 5, 1),

        // SBC - Subtract with Carry
        0xE9 => entry(SBC, Immediate, 2, 0),
        0xE5 => entry(SBC, ZeroPage, 3, 0),
        0xF5 => entry(SBC, ZeroPageX, 4, 0),
        0xED => entry(SBC, Absolute, 4, 0),
        0xFD => entry(SBC, AbsoluteX, 4, 1),
        0xF9 => entry(SBC, AbsoluteY, 4, 1),
        0xE1 => entry(SBC, IndexedIndirect, 6, 0),
        0xF1 => entry(SBC, IndirectIndexed, 5, 1),

        // CMP - Compare
        0xC9 => entry(CMP, Immediate, 2, 0),
        0xC5 => entry(CMP, ZeroPage, 3, 0),
        0xD5 => entry(CMP, ZeroPageX, 4, 0),
        0xCD => entry(CMP, Absolute, 4, 0),
        0xDD => entry(CMP, AbsoluteX, 4, 1),
        0xD9 => entry(CMP, AbsoluteY, 4, 1),
        0xC1 => entry(CMP, IndexedIndirect, 6, 0),
        0xD1 => entry(CMP, IndirectIndexed, 5, 1),

        // CPX - Compare X Register
        0xE0 => entry(CPX, Immediate, 2, 0),
        0xE4 => entry(CPX, ZeroPage, 3, 0),
        0xEC => entry(CPX, Absolute, 4, 0),

        // CPY - Compare Y Register
        0xC0 => entry(CPY, Immediate, 2, 0),
        0xC4 => entry(CPY, ZeroPage, 3, 0),
        0xCC => entry(CPY, Absolute, 4, 0),

        // AND - Logical AND
        0x29 => entry(AND, Immediate, 2, 0),
        0x25 => entry(AND, ZeroPage, 3, 0),
        0x35 => entry(AND, ZeroPageX, 4, 0),
        0x2D => entry(AND, Absolute, 4, 0),
        0x3D => entry(AND, AbsoluteX, 4, 1),
        0x39 => entry(AND, AbsoluteY, 4, 1),
        0x21 => entry(AND, IndexedIndirect, 6, 0),
        0x31 => entry(AND, IndirectIndexed, 5, 1),

        // ORA - Logical OR
        0x09 => entry(ORA, Immediate, 2, 0),
        0x05 => entry(ORA, ZeroPage, 3, 0),
        0x15 => entry(ORA, ZeroPageX, 4, 0),
        0x0D => entry(ORA, Absolute, 4, 0),
        0x1D => entry(ORA, AbsoluteX, 4, 1),
        0x19 => entry(ORA, AbsoluteY, 4, 1),
        0x01 => entry(ORA, IndexedIndirect, 6, 0),
        0x11 => entry(ORA, IndirectIndexed, 5, 1),

        // EOR - Exclusive OR
        0x49 => entry(EOR, Immediate, 2, 0),
        0x45 => entry(EOR, ZeroPage, 3, 0),
        0x55 => entry(EOR, ZeroPageX, 4, 0),
        0x4D => entry(EOR, Absolute, 4, 0),
        0x5D => entry(EOR, AbsoluteX, 4, 1),
        0x59 => entry(EOR, AbsoluteY, 4, 1),
        0x41 => entry(EOR, IndexedIndirect, 6, 0),
        0x51 => entry(EOR, IndirectIndexed, 5, 1),

        // BIT - Bit Test
        0x24 => entry(BIT, ZeroPage, 3, 0),
        0x2C => entry(BIT, Absolute, 4, 0),

        // ASL - Arithmetic Shift Left
        0x0A => entry(ASL, Accumulator, 2, 0),
        0x06 => entry(ASL, ZeroPage, 5, 0),
        0x16 => entry(ASL, ZeroPageX, 6, 0),
        0x0E => entry(ASL, Absolute, 6, 0),
        0x1E => entry(ASL, AbsoluteX, 7, 0),

        // LSR - Logical Shift Right
        0x4A => entry(LSR, Accumulator, 2, 0),
        0x46 => entry(LSR, ZeroPage, 5, 0),
        0x56 => entry(LSR, ZeroPageX, 6, 0),
        0x4E => entry(LSR, Absolute, 6, 0),
        0x5E => entry(LSR, AbsoluteX, 7, 0),

        // ROL - Rotate Left
        0x2A => entry(ROL, Accumulator, 2, 0),
        0x26 => entry(ROL, ZeroPage, 5, 0),
        0x36 => entry(ROL, ZeroPageX, 6, 0),
        0x2E => entry(ROL, Absolute, 6, 0),
        0x3E => entry(ROL, AbsoluteX, 7, 0),

        // ROR - Rotate Right
        0x6A => entry(ROR, Accumulator, 2, 0),
        0x66 => entry(ROR, ZeroPage, 5, 0),
        0x76 => entry(ROR, ZeroPageX, 6, 0),
        0x6E => entry(ROR, Absolute, 6, 0),
        0x7E => entry(ROR, AbsoluteX, 7, 0),

        // INC - Increment Memory
        0xE6 => entry(INC, ZeroPage, 5, 0),
        0xF6 => entry(INC, ZeroPageX, 6, 0),
        0xEE => entry(INC, Absolute, 6, 0),
        0xFE => entry(INC, AbsoluteX, 7, 0),

        // DEC - Decrement Memory
        0xC6 => entry(DEC, ZeroPage, 5, 0),
        0xD6 => entry(DEC, ZeroPageX, 6, 0),
        0xCE => entry(DEC, Absolute, 6, 0),
        0xDE => entry(DEC, AbsoluteX, 7, 0),

        // Register increment/decrement
        0xE8 => entry(INX, Implicit, 2, 0),
        0xC8 => entry(INY, Implicit, 2, 0),
        0xCA => entry(DEX, Implicit, 2, 0),
        0x88 => entry(DEY, Implicit, 2, 0),

        // Transfers
        0xAA => entry(TAX, Implicit, 2, 0),
        0xA8 => entry(TAY, Implicit, 2, 0),
        0x8A => entry(TXA, Implicit, 2, 0),
        0x98 => entry(TYA, Implicit, 2, 0),
        0xBA => entry(TSX, Implicit, 2, 0),
        0x9A => entry(TXS, Implicit, 2, 0),

        // Stack operations
        0x48 => entry(PHA, Implicit, 3, 0),
        0x08 => entry(PHP, Implicit, 3, 0),
        0x68 => entry(PLA, Implicit, 4, 0),
        0x28 => entry(PLP, Implicit, 4, 0),

        // Jump/Call
        0x4C => entry(JMP, Absolute, 3, 0),
        0x6C => entry(JMP, Indirect, 5, 0),
        0x20 => entry(JSR, Absolute, 6, 0),
        0x60 => entry(RTS, Implicit, 6, 0),

        // Interrupts
        0x00 => entry(BRK, Implicit, 7, 0),
        0x40 => entry(RTI, Implicit, 6, 0),

        // Flag manipulation
        0x18 => entry(CLC, Implicit, 2, 0),
        0x38 => entry(SEC, Implicit, 2, 0),
        0x58 => entry(CLI, Implicit, 2, 0),
        0x78 => entry(SEI, Implicit, 2, 0),
        0xD8 => entry(CLD, Implicit, 2, 0),
        0xF8 => entry(SED, Implicit, 2, 0),
        0xB8 => entry(CLV, Implicit, 2, 0),

        // Branches (base 2, +1 taken, +1 more across a page)
        0x90 => entry(BCC, Relative, 2, 2),
        0xB0 => entry(BCS, Relative, 2, 2),
        0xF0 => entry(BEQ, Relative, 2, 2),
        0xD0 => entry(BNE, Relative, 2, 2),
        0x30 => entry(BMI, Relative, 2, 2),
        0x10 => entry(BPL, Relative, 2, 2),
        0x50 => entry(BVC, Relative, 2, 2),
        0x70 => entry(BVS, Relative, 2, 2),

        // NOP - No Operation
        0xEA => entry(NOP, Implicit, 2, 0),

        // Undocumented opcode
        _ => None,
    }
}

lazy_static! {
    /// Opcode descriptor table, indexed by opcode byte. Built once at startup;
    /// undocumented opcodes hold `None`.
    pub static ref OPCODE_TABLE: [Option<OpcodeInfo>; 256] = {
        let mut table = [None; 256];
        for opcode in 0..=255u8 {
            table[opcode as usize] = decode(opcode);
        }
        table
    };
}
