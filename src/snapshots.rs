use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cpu::{BREAK_COMMAND, UNUSED_FLAG, CPU};
use crate::memory::Memory;

/// Post-step view of the register file and flags, the read-only state a
/// debugger or disassembler observes between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub pc: u16,
    pub sp: u8,
    pub status: u8,
    pub cycles: u64,
    pub halted: bool,
}

impl CpuSnapshot {
    pub fn capture(cpu: &CPU) -> Self {
        CpuSnapshot {
            a: cpu.get_register_a(),
            x: cpu.get_register_x(),
            y: cpu.get_register_y(),
            pc: cpu.get_pc(),
            sp: cpu.get_sp(),
            status: cpu.get_status(),
            cycles: cpu.get_cycles(),
            halted: cpu.is_halted(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cpu_state: CpuSnapshot,
    pub memory_dump: Vec<u8>,
    pub metadata: SnapshotMetadata,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub checkpoint_reason: CheckpointReason,
    pub compression_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointReason {
    Manual,
    Automatic,
    Scheduled, // Periodic backup
    Breakpoint,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("memory dump is corrupt: {0}")]
    CorruptDump(&'static str),
    #[error("decompressed size {0} does not match the 64KB address space")]
    WrongSize(usize),
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MachineSnapshot {
    pub fn create_from_machine(
        name: String,
        description: String,
        cpu: &CPU,
        memory: &Memory,
        reason: CheckpointReason,
        tags: Vec<String>,
    ) -> Self {
        let cpu_state = CpuSnapshot::capture(cpu);

        // Create memory dump
        let mut memory_dump = Vec::with_capacity(65536);
        for addr in 0..65536 {
            memory_dump.push(memory.read(addr as u16));
        }

        // Compress memory if mostly zeros (common case)
        let original_size = memory_dump.len();
        let compressed_dump = compress_memory(&memory_dump);
        let compression_ratio = compressed_dump.len() as f32 / original_size as f32;

        let metadata = SnapshotMetadata {
            checkpoint_reason: reason,
            compression_ratio,
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            cpu_state,
            size_bytes: compressed_dump.len() as u64,
            memory_dump: compressed_dump,
            metadata,
            created_at: Utc::now(),
            tags,
        }
    }

    pub fn restore_to(&self, cpu: &mut CPU, memory: &mut Memory) -> Result<(), SnapshotError> {
        // Restore memory first so a partially-applied CPU state never runs
        // against the old contents
        let decompressed_memory = decompress_memory(&self.memory_dump)?;
        for (addr, &value) in decompressed_memory.iter().enumerate() {
            memory.write(addr as u16, value);
        }

        // Restore CPU state
        cpu.set_register_a(self.cpu_state.a);
        cpu.set_register_x(self.cpu_state.x);
        cpu.set_register_y(self.cpu_state.y);
        cpu.set_pc(self.cpu_state.pc);
        cpu.set_sp(self.cpu_state.sp);
        cpu.set_status(self.cpu_state.status);
        cpu.set_cycles(self.cpu_state.cycles);

        if self.cpu_state.halted {
            cpu.halt();
        } else {
            cpu.resume();
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

// Simple run-length encoding for memory compression
fn compress_memory(memory: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    let mut i = 0;

    while i < memory.len() {
        let current_byte = memory[i];
        let mut count = 1;

        // Count consecutive identical bytes (max 255)
        while i + count < memory.len() &&
              memory[i + count] == current_byte &&
              count < 255 {
            count += 1;
        }

        if count > 3 || current_byte == 0 {
            // Use RLE for runs of 4+ or any zeros
            compressed.push(0xFF); // RLE marker
            compressed.push(count as u8);
            compressed.push(current_byte);
        } else {
            // Store literal bytes
            for j in 0..count {
                if memory[i + j] == 0xFF {
                    // Escape literal 0xFF
                    compressed.push(0xFF);
                    compressed.push(0x00);
                } else {
                    compressed.push(memory[i + j]);
                }
            }
        }

        i += count;
    }

    compressed
}

fn decompress_memory(compressed: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    let mut decompressed = Vec::with_capacity(65536);
    let mut i = 0;

    while i < compressed.len() {
        if compressed[i] == 0xFF {
            if i + 1 >= compressed.len() {
                return Err(SnapshotError::CorruptDump("truncated RLE data"));
            }

            if compressed[i + 1] == 0x00 {
                // Escaped literal 0xFF
                decompressed.push(0xFF);
                i += 2;
            } else {
                // RLE sequence
                if i + 2 >= compressed.len() {
                    return Err(SnapshotError::CorruptDump("truncated RLE sequence"));
                }

                let count = compressed[i + 1];
                let value = compressed[i + 2];

                for _ in 0..count {
                    decompressed.push(value);
                }

                i += 3;
            }
        } else {
            // Literal byte
            decompressed.push(compressed[i]);
            i += 1;
        }
    }

    if decompressed.len() != 65536 {
        return Err(SnapshotError::WrongSize(decompressed.len()));
    }

    Ok(decompressed)
}

// Extensions to CPU for snapshot support
impl CPU {
    pub fn set_register_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_register_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_register_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// The unused bit is forced set and the B bit discarded, matching the
    /// pull-side flag discipline.
    pub fn set_status(&mut self, value: u8) {
        self.status = (value | UNUSED_FLAG) & !BREAK_COMMAND;
    }

    pub fn set_cycles(&mut self, value: u64) {
        self.cycles = value;
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn resume(&mut self) {
        self.halted = false;
    }
}
