use log::{debug, trace, warn};

use crate::memory::Bus;
use crate::metrics::{
    record_instruction, record_interrupt, record_reset, record_unimplemented_opcode, Timer,
};
use crate::opcodes::{AddressingMode, Mnemonic, OpcodeInfo, OPCODE_TABLE};
use crate::StepError;

#[derive(Debug)]
pub struct CPU {
    // Registers (made public for snapshot support)
    pub a: u8,      // Accumulator
    pub x: u8,      // X Index Register
    pub y: u8,      // Y Index Register
    pub pc: u16,    // Program Counter
    pub sp: u8,     // Stack Pointer
    pub status: u8, // Status Register

    // Internal state
    pub cycles: u64,
    pub halted: bool,

    // Interrupt lines, sampled once per instruction boundary
    pending_reset: bool,
    pending_nmi: bool,
    pending_irq: bool,
}

// Status register flags
pub const CARRY_FLAG: u8 = 0x01;
pub const ZERO_FLAG: u8 = 0x02;
pub const INTERRUPT_DISABLE: u8 = 0x04;
pub const DECIMAL_MODE: u8 = 0x08;
pub const BREAK_COMMAND: u8 = 0x10;
pub const UNUSED_FLAG: u8 = 0x20;
pub const OVERFLOW_FLAG: u8 = 0x40;
pub const NEGATIVE_FLAG: u8 = 0x80;

// Fixed vectors
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_BASE: u16 = 0x0100;
const INTERRUPT_CYCLES: u8 = 7;

/// Result of resolving an addressing mode: the effective address, if the mode
/// has a memory operand, and whether indexing crossed a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub address: Option<u16>,
    pub page_crossed: bool,
}

impl CPU {
    pub fn new() -> Self {
        CPU {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            status: UNUSED_FLAG | INTERRUPT_DISABLE,
            cycles: 0,
            halted: false,
            pending_reset: false,
            pending_nmi: false,
            pending_irq: false,
        }
    }

    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.pc = self.read_word(bus, RESET_VECTOR);

        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = UNUSED_FLAG | INTERRUPT_DISABLE;
        self.cycles = 0;
        self.halted = false;
        self.pending_reset = false;
        self.pending_nmi = false;
        self.pending_irq = false;

        record_reset();
        debug!("reset, PC <- ${:04X}", self.pc);
    }

    /// Assert the maskable interrupt line. Serviced at the next instruction
    /// boundary once the interrupt-disable flag is clear; the request stays
    /// pending until then.
    pub fn request_irq(&mut self) {
        self.pending_irq = true;
    }

    /// Assert the non-maskable interrupt line.
    pub fn request_nmi(&mut self) {
        self.pending_nmi = true;
    }

    /// Assert the reset line. Takes precedence over NMI and IRQ, and clears
    /// a halted core.
    pub fn request_reset(&mut self) {
        self.pending_reset = true;
    }

    /// Execute one instruction (or service one pending interrupt) and return
    /// the number of cycles consumed.
    ///
    /// Interrupt lines are sampled here and only here, in RESET > NMI > IRQ
    /// priority order - never mid-instruction. A halted CPU does nothing
    /// until the host clears the halt or asserts reset.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u8, StepError> {
        if self.pending_reset {
            self.reset(bus);
            return Ok(0);
        }

        if self.halted {
            return Ok(0);
        }

        if self.pending_nmi {
            self.pending_nmi = false;
            self.interrupt(bus, NMI_VECTOR);
            record_interrupt("nmi");
            debug!("NMI serviced, PC <- ${:04X}", self.pc);
            return Ok(INTERRUPT_CYCLES);
        }

        if self.pending_irq && !self.get_flag(INTERRUPT_DISABLE) {
            self.pending_irq = false;
            self.interrupt(bus, IRQ_VECTOR);
            record_interrupt("irq");
            debug!("IRQ serviced, PC <- ${:04X}", self.pc);
            return Ok(INTERRUPT_CYCLES);
        }

        let instruction_addr = self.pc;
        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let info = match OPCODE_TABLE[opcode as usize] {
            Some(info) => info,
            None => {
                // Default policy is halt: executing garbage semantics would
                // silently diverge from hardware. PC is restored so the host
                // can inspect the byte, or skip it and resume.
                self.pc = instruction_addr;
                self.halted = true;
                record_unimplemented_opcode(opcode);
                warn!(
                    "unimplemented opcode ${:02X} at ${:04X}, halting",
                    opcode, instruction_addr
                );
                return Err(StepError::UnimplementedOpcode {
                    opcode,
                    address: instruction_addr,
                });
            }
        };

        trace!("${:04X}  {} {:?}", instruction_addr, info.mnemonic, info.mode);

        let timer = Timer::new();
        let used = self.execute(bus, info)?;
        self.cycles += used as u64;

        record_instruction(opcode, info.mnemonic.name(), used, timer.elapsed());
        Ok(used)
    }

    fn execute<B: Bus>(&mut self, bus: &mut B, info: OpcodeInfo) -> Result<u8, StepError> {
        let mut extra: u8 = 0;

        match info.mnemonic {
            // Load operations
            Mnemonic::LDA => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.a = value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::LDX => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.x = value;
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::LDY => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.y = value;
                self.update_zero_and_negative_flags(self.y);
            }

            // Store operations (no flag effects)
            Mnemonic::STA => self.write_operand(bus, info, self.a)?,
            Mnemonic::STX => self.write_operand(bus, info, self.x)?,
            Mnemonic::STY => self.write_operand(bus, info, self.y)?,

            // Arithmetic operations
            Mnemonic::ADC => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.adc(value);
            }
            Mnemonic::SBC => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.sbc(value);
            }

            // Compare operations
            Mnemonic::CMP => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.compare(self.a, value);
            }
            Mnemonic::CPX => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.compare(self.x, value);
            }
            Mnemonic::CPY => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.compare(self.y, value);
            }

            // Logical operations
            Mnemonic::AND => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::ORA => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.a |= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::EOR => {
                let value = self.read_operand(bus, info, &mut extra)?;
                self.a ^= value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::BIT => {
                // Z from A & M; N and V copied straight from bits 7 and 6 of M
                let value = self.read_operand(bus, info, &mut extra)?;
                self.set_flag(ZERO_FLAG, self.a & value == 0);
                self.set_flag(NEGATIVE_FLAG, value & 0x80 != 0);
                self.set_flag(OVERFLOW_FLAG, value & 0x40 != 0);
            }

            // Shifts and rotates
            Mnemonic::ASL => self.read_modify_write(bus, info, Self::asl_value)?,
            Mnemonic::LSR => self.read_modify_write(bus, info, Self::lsr_value)?,
            Mnemonic::ROL => self.read_modify_write(bus, info, Self::rol_value)?,
            Mnemonic::ROR => self.read_modify_write(bus, info, Self::ror_value)?,

            // Increment/Decrement operations
            Mnemonic::INC => self.read_modify_write(bus, info, Self::inc_value)?,
            Mnemonic::DEC => self.read_modify_write(bus, info, Self::dec_value)?,
            Mnemonic::INX => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::INY => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative_flags(self.y);
            }
            Mnemonic::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.y);
            }

            // Transfer operations
            Mnemonic::TAX => {
                self.x = self.a;
                self.update_zero_and_negative_flags(self.x);
            }
            Mnemonic::TAY => {
                self.y = self.a;
                self.update_zero_and_negative_flags(self.y);
            }
            Mnemonic::TXA => {
                self.a = self.x;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::TYA => {
                self.a = self.y;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::TSX => {
                self.x = self.sp;
                self.update_zero_and_negative_flags(self.x);
            }
            // SP has no N/Z semantics
            Mnemonic::TXS => self.sp = self.x,

            // Stack operations
            Mnemonic::PHA => self.push(bus, self.a),
            Mnemonic::PHP => {
                // Software pushes carry the B and unused bits set
                let status = self.status | BREAK_COMMAND | UNUSED_FLAG;
                self.push(bus, status);
            }
            Mnemonic::PLA => {
                let value = self.pop(bus);
                self.a = value;
                self.update_zero_and_negative_flags(self.a);
            }
            Mnemonic::PLP => {
                let value = self.pop(bus);
                self.status = (value | UNUSED_FLAG) & !BREAK_COMMAND;
            }

            // Jump operations
            Mnemonic::JMP => {
                let operand = self.operand_address(bus, info.mode);
                match operand.address {
                    Some(address) => self.pc = address,
                    None => {
                        return Err(StepError::InvalidAddressingMode {
                            mnemonic: info.mnemonic,
                            mode: info.mode,
                        })
                    }
                }
            }
            Mnemonic::JSR => {
                let target = self.fetch_word(bus);
                let return_addr = self.pc.wrapping_sub(1);
                self.push_u16(bus, return_addr);
                self.pc = target;
            }
            Mnemonic::RTS => {
                self.pc = self.pop_u16(bus).wrapping_add(1);
            }

            // Interrupt operations
            Mnemonic::BRK => {
                // PC is already past the opcode; the byte after BRK is
                // padding, so the pushed return address is opcode + 2
                let return_addr = self.pc.wrapping_add(1);
                self.push_u16(bus, return_addr);
                let status = self.status | BREAK_COMMAND | UNUSED_FLAG;
                self.push(bus, status);
                self.set_flag(INTERRUPT_DISABLE, true);
                self.pc = self.read_word(bus, IRQ_VECTOR);
                debug!("BRK, PC <- ${:04X}", self.pc);
            }
            Mnemonic::RTI => {
                // Status first (it was pushed last), then PC low, high
                let status = self.pop(bus);
                self.status = (status | UNUSED_FLAG) & !BREAK_COMMAND;
                self.pc = self.pop_u16(bus);
            }

            // Flag manipulation instructions
            Mnemonic::CLC => self.set_flag(CARRY_FLAG, false),
            Mnemonic::SEC => self.set_flag(CARRY_FLAG, true),
            Mnemonic::CLI => self.set_flag(INTERRUPT_DISABLE, false),
            Mnemonic::SEI => self.set_flag(INTERRUPT_DISABLE, true),
            Mnemonic::CLD => self.set_flag(DECIMAL_MODE, false),
            Mnemonic::SED => self.set_flag(DECIMAL_MODE, true),
            Mnemonic::CLV => self.set_flag(OVERFLOW_FLAG, false),

            // Branch instructions
            Mnemonic::BCC => extra = self.branch_if(bus, !self.get_flag(CARRY_FLAG)),
            Mnemonic::BCS => extra = self.branch_if(bus, self.get_flag(CARRY_FLAG)),
            Mnemonic::BEQ => extra = self.branch_if(bus, self.get_flag(ZERO_FLAG)),
            Mnemonic::BNE => extra = self.branch_if(bus, !self.get_flag(ZERO_FLAG)),
            Mnemonic::BMI => extra = self.branch_if(bus, self.get_flag(NEGATIVE_FLAG)),
            Mnemonic::BPL => extra = self.branch_if(bus, !self.get_flag(NEGATIVE_FLAG)),
            Mnemonic::BVC => extra = self.branch_if(bus, !self.get_flag(OVERFLOW_FLAG)),
            Mnemonic::BVS => extra = self.branch_if(bus, self.get_flag(OVERFLOW_FLAG)),

            // NOP - No Operation
            Mnemonic::NOP => {}
        }

        Ok(info.cycles + extra)
    }

    // Getters
    pub fn get_register_a(&self) -> u8 { self.a }
    pub fn get_register_x(&self) -> u8 { self.x }
    pub fn get_register_y(&self) -> u8 { self.y }
    pub fn get_pc(&self) -> u16 { self.pc }
    pub fn get_sp(&self) -> u8 { self.sp }
    pub fn get_cycles(&self) -> u64 { self.cycles }
    pub fn is_halted(&self) -> bool { self.halted }

    /// Packed status byte. The unused bit always reads back as set.
    pub fn get_status(&self) -> u8 {
        self.status | UNUSED_FLAG
    }

    // Flag operations
    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.status |= flag;
        } else {
            self.status &= !flag;
        }
    }

    pub fn get_flag(&self, flag: u8) -> bool {
        (self.status & flag) != 0
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.set_flag(ZERO_FLAG, value == 0);
        self.set_flag(NEGATIVE_FLAG, (value & 0x80) != 0);
    }

    // Operand fetch helpers
    fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.fetch_byte(bus) as u16;
        let high = self.fetch_byte(bus) as u16;
        (high << 8) | low
    }

    fn read_word<B: Bus>(&mut self, bus: &mut B, address: u16) -> u16 {
        let low = bus.read(address) as u16;
        let high = bus.read(address.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    /// Resolve an addressing mode to its effective address, consuming exactly
    /// the operand bytes the mode declares.
    fn operand_address<B: Bus>(&mut self, bus: &mut B, mode: AddressingMode) -> Operand {
        match mode {
            AddressingMode::Implicit | AddressingMode::Accumulator => Operand {
                address: None,
                page_crossed: false,
            },
            // The operand byte itself is the value; its address is simply PC
            AddressingMode::Immediate | AddressingMode::Relative => {
                let address = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Operand {
                    address: Some(address),
                    page_crossed: false,
                }
            }
            AddressingMode::ZeroPage => {
                let address = self.fetch_byte(bus) as u16;
                Operand {
                    address: Some(address),
                    page_crossed: false,
                }
            }
            // Zero-page indexing wraps within the zero page, no page cross
            AddressingMode::ZeroPageX => {
                let address = self.fetch_byte(bus).wrapping_add(self.x) as u16;
                Operand {
                    address: Some(address),
                    page_crossed: false,
                }
            }
            AddressingMode::ZeroPageY => {
                let address = self.fetch_byte(bus).wrapping_add(self.y) as u16;
                Operand {
                    address: Some(address),
                    page_crossed: false,
                }
            }
            AddressingMode::Absolute => {
                let address = self.fetch_word(bus);
                Operand {
                    address: Some(address),
                    page_crossed: false,
                }
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                let address = base.wrapping_add(self.x as u16);
                Operand {
                    address: Some(address),
                    page_crossed: (base & 0xFF00) != (address & 0xFF00),
                }
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                let address = base.wrapping_add(self.y as u16);
                Operand {
                    address: Some(address),
                    page_crossed: (base & 0xFF00) != (address & 0xFF00),
                }
            }
            AddressingMode::Indirect => {
                // 6502 bug: if the pointer sits at $xxFF, the high byte is
                // fetched from the start of the same page, not the next one
                let pointer = self.fetch_word(bus);
                let low = bus.read(pointer) as u16;
                let high = if pointer & 0x00FF == 0x00FF {
                    bus.read(pointer & 0xFF00) as u16
                } else {
                    bus.read(pointer.wrapping_add(1)) as u16
                };
                Operand {
                    address: Some((high << 8) | low),
                    page_crossed: false,
                }
            }
            AddressingMode::IndexedIndirect => {
                // Pointer arithmetic wraps within the zero page, including
                // the high byte read when the pointer lands on $FF
                let pointer = self.fetch_byte(bus).wrapping_add(self.x);
                let low = bus.read(pointer as u16) as u16;
                let high = bus.read(pointer.wrapping_add(1) as u16) as u16;
                Operand {
                    address: Some((high << 8) | low),
                    page_crossed: false,
                }
            }
            AddressingMode::IndirectIndexed => {
                let pointer = self.fetch_byte(bus);
                let low = bus.read(pointer as u16) as u16;
                let high = bus.read(pointer.wrapping_add(1) as u16) as u16;
                let base = (high << 8) | low;
                let address = base.wrapping_add(self.y as u16);
                Operand {
                    address: Some(address),
                    page_crossed: (base & 0xFF00) != (address & 0xFF00),
                }
            }
        }
    }

    fn read_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        info: OpcodeInfo,
        extra: &mut u8,
    ) -> Result<u8, StepError> {
        let operand = self.operand_address(bus, info.mode);
        match operand.address {
            Some(address) => {
                if operand.page_crossed {
                    *extra += info.extra_cycles;
                }
                Ok(bus.read(address))
            }
            None => Err(StepError::InvalidAddressingMode {
                mnemonic: info.mnemonic,
                mode: info.mode,
            }),
        }
    }

    fn write_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        info: OpcodeInfo,
        value: u8,
    ) -> Result<(), StepError> {
        let operand = self.operand_address(bus, info.mode);
        match operand.address {
            Some(address) => {
                bus.write(address, value);
                Ok(())
            }
            None => Err(StepError::InvalidAddressingMode {
                mnemonic: info.mnemonic,
                mode: info.mode,
            }),
        }
    }

    /// Shared read-modify-write path for shifts, rotates, INC, and DEC.
    ///
    /// The write-back is issued even when the value is unchanged; memory-
    /// mapped hardware depends on seeing the read and the write in order.
    fn read_modify_write<B: Bus>(
        &mut self,
        bus: &mut B,
        info: OpcodeInfo,
        op: fn(&mut Self, u8) -> u8,
    ) -> Result<(), StepError> {
        if info.mode == AddressingMode::Accumulator {
            let value = self.a;
            self.a = op(self, value);
            return Ok(());
        }

        let operand = self.operand_address(bus, info.mode);
        match operand.address {
            Some(address) => {
                let value = bus.read(address);
                let result = op(self, value);
                bus.write(address, result);
                Ok(())
            }
            None => Err(StepError::InvalidAddressingMode {
                mnemonic: info.mnemonic,
                mode: info.mode,
            }),
        }
    }

    // Arithmetic helpers
    fn adc(&mut self, value: u8) {
        if self.get_flag(DECIMAL_MODE) {
            self.adc_decimal(value);
            return;
        }

        let carry = if self.get_flag(CARRY_FLAG) { 1 } else { 0 };
        let result = self.a as u16 + value as u16 + carry as u16;

        let overflow = (self.a ^ result as u8) & (value ^ result as u8) & 0x80 != 0;

        self.set_flag(CARRY_FLAG, result > 255);
        self.set_flag(OVERFLOW_FLAG, overflow);

        self.a = result as u8;
        self.update_zero_and_negative_flags(self.a);
    }

    /// NMOS BCD addition. Z reflects the binary sum, N and V the intermediate
    /// sum before the high-nibble fixup, C the decimal carry.
    fn adc_decimal(&mut self, value: u8) {
        let carry = if self.get_flag(CARRY_FLAG) { 1u16 } else { 0 };
        let binary = self.a as u16 + value as u16 + carry;
        self.set_flag(ZERO_FLAG, binary as u8 == 0);

        let mut low = (self.a & 0x0F) as u16 + (value & 0x0F) as u16 + carry;
        if low >= 0x0A {
            low = ((low + 0x06) & 0x0F) + 0x10;
        }
        let mut sum = (self.a & 0xF0) as u16 + (value & 0xF0) as u16 + low;

        self.set_flag(NEGATIVE_FLAG, sum & 0x80 != 0);
        let overflow = (self.a ^ sum as u8) & (value ^ sum as u8) & 0x80 != 0;
        self.set_flag(OVERFLOW_FLAG, overflow);

        if sum >= 0xA0 {
            sum += 0x60;
        }
        self.set_flag(CARRY_FLAG, sum >= 0x100);
        self.a = sum as u8;
    }

    fn sbc(&mut self, value: u8) {
        let borrow = if self.get_flag(CARRY_FLAG) { 0 } else { 1 };
        let result = (self.a as i16) - (value as i16) - (borrow as i16);

        let overflow = ((self.a as i16) ^ result) & ((self.a as i16) ^ (value as i16)) & 0x80 != 0;

        if self.get_flag(DECIMAL_MODE) {
            // NMOS BCD subtraction: all four flags come from the binary
            // difference, only the accumulator is decimal-adjusted
            let mut low = (self.a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow as i16;
            if low < 0 {
                low = ((low - 0x06) & 0x0F) - 0x10;
            }
            let mut adjusted = (self.a & 0xF0) as i16 - (value & 0xF0) as i16 + low;
            if adjusted < 0 {
                adjusted -= 0x60;
            }

            self.set_flag(CARRY_FLAG, result >= 0);
            self.set_flag(OVERFLOW_FLAG, overflow);
            self.update_zero_and_negative_flags(result as u8);
            self.a = adjusted as u8;
        } else {
            self.set_flag(CARRY_FLAG, result >= 0);
            self.set_flag(OVERFLOW_FLAG, overflow);
            self.a = result as u8;
            self.update_zero_and_negative_flags(self.a);
        }
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.set_flag(CARRY_FLAG, register >= value);
        self.update_zero_and_negative_flags(result);
    }

    // Shift and rotate helpers
    fn asl_value(&mut self, value: u8) -> u8 {
        self.set_flag(CARRY_FLAG, value & 0x80 != 0);
        let result = value << 1;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.set_flag(CARRY_FLAG, value & 0x01 != 0);
        let result = value >> 1;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = if self.get_flag(CARRY_FLAG) { 1 } else { 0 };
        self.set_flag(CARRY_FLAG, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = if self.get_flag(CARRY_FLAG) { 0x80 } else { 0 };
        self.set_flag(CARRY_FLAG, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn inc_value(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.update_zero_and_negative_flags(result);
        result
    }

    fn dec_value(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.update_zero_and_negative_flags(result);
        result
    }

    // Branch instructions
    fn branch_if<B: Bus>(&mut self, bus: &mut B, condition: bool) -> u8 {
        let offset = self.fetch_byte(bus) as i8;
        if !condition {
            return 0;
        }

        let base = self.pc;
        let target = base.wrapping_add(offset as u16);
        self.pc = target;

        // One extra cycle for taking the branch, one more for landing on a
        // different page than the next sequential instruction
        if (base & 0xFF00) != (target & 0xFF00) {
            2
        } else {
            1
        }
    }

    // Stack operations
    pub fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_BASE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub fn pop<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE + self.sp as u16)
    }

    fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let low = self.pop(bus) as u16;
        let high = self.pop(bus) as u16;
        (high << 8) | low
    }

    // Interrupt entry shared by NMI and IRQ: push PC and status (B clear),
    // mask further IRQs, load the vector
    fn interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        self.push_u16(bus, self.pc);
        let status = (self.status | UNUSED_FLAG) & !BREAK_COMMAND;
        self.push(bus, status);
        self.set_flag(INTERRUPT_DISABLE, true);
        self.pc = self.read_word(bus, vector);
        self.cycles += INTERRUPT_CYCLES as u64;
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
