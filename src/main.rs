use log::{error, info};

use mos6502_core::metrics::init_metrics;
use mos6502_core::snapshots::CpuSnapshot;
use mos6502_core::{Memory, CPU};

fn main() {
    env_logger::init();
    init_metrics();

    let mut memory = Memory::new();
    let mut cpu = CPU::new();

    // Example: sum the integers 1..=5 with a countdown loop
    let program = [
        0xA9, 0x00, // LDA #$00
        0xA2, 0x05, // LDX #$05
        0x85, 0x10, // loop: STA $10
        0x8A,       // TXA
        0x18,       // CLC
        0x65, 0x10, // ADC $10
        0xCA,       // DEX
        0xD0, 0xF7, // BNE loop
        0x85, 0x20, // STA $20
        0x00,       // BRK
    ];
    memory.load_rom(&program, 0x8000);

    // Set reset vector to 0x8000
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);

    // The break handler is a single undocumented byte; hitting it halts the
    // core and ends the demo
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    memory.write(0x9000, 0x02);

    cpu.reset(&mut memory);

    for _ in 0..200 {
        match cpu.step(&mut memory) {
            Ok(_) => {
                if cpu.is_halted() {
                    break;
                }
            }
            Err(e) => {
                error!("{}", e);
                break;
            }
        }
    }

    let snapshot = CpuSnapshot::capture(&cpu);
    info!("executed {} cycles", snapshot.cycles);

    println!("CPU State:");
    println!("A: ${:02X}", snapshot.a);
    println!("X: ${:02X}", snapshot.x);
    println!("Y: ${:02X}", snapshot.y);
    println!("PC: ${:04X}", snapshot.pc);
    println!("SP: ${:02X}", snapshot.sp);
    println!("Status: ${:02X}", snapshot.status);
    println!("1+2+3+4+5 = {}", memory.read(0x20));
}
