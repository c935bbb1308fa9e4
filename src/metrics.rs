use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::time::{Duration, Instant};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Counter for total CPU instructions executed by opcode
    pub static ref CPU_INSTRUCTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("cpu_instructions_total", "Total number of CPU instructions executed by opcode"),
        &["opcode", "instruction"]
    ).expect("Failed to create CPU instructions counter");

    /// Counter for CPU cycles executed
    pub static ref CPU_CYCLES_TOTAL: Counter = Counter::new(
        "cpu_cycles_total", "Total number of CPU cycles executed"
    ).expect("Failed to create CPU cycles counter");

    /// Histogram for instruction execution time
    pub static ref INSTRUCTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("instruction_duration_seconds", "Time spent executing instructions")
            .buckets(vec![0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001]),
        &["instruction"]
    ).expect("Failed to create instruction duration histogram");

    /// Counter for interrupts serviced by line (nmi, irq)
    pub static ref INTERRUPTS_SERVICED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("interrupts_serviced_total", "Total number of interrupts serviced by line"),
        &["line"]
    ).expect("Failed to create interrupts counter");

    /// Counter for CPU resets
    pub static ref CPU_RESETS_TOTAL: Counter = Counter::new(
        "cpu_resets_total", "Total number of CPU resets"
    ).expect("Failed to create CPU resets counter");

    /// Counter for unimplemented opcodes encountered
    pub static ref UNIMPLEMENTED_OPCODES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("unimplemented_opcodes_total", "Total number of unimplemented opcode fetches"),
        &["opcode"]
    ).expect("Failed to create unimplemented opcodes counter");
}

/// Initialize Prometheus metrics by registering them with the global registry
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(CPU_INSTRUCTIONS_TOTAL.clone()))
        .expect("Failed to register CPU instructions counter");

    REGISTRY
        .register(Box::new(CPU_CYCLES_TOTAL.clone()))
        .expect("Failed to register CPU cycles counter");

    REGISTRY
        .register(Box::new(INSTRUCTION_DURATION.clone()))
        .expect("Failed to register instruction duration histogram");

    REGISTRY
        .register(Box::new(INTERRUPTS_SERVICED_TOTAL.clone()))
        .expect("Failed to register interrupts counter");

    REGISTRY
        .register(Box::new(CPU_RESETS_TOTAL.clone()))
        .expect("Failed to register CPU resets counter");

    REGISTRY
        .register(Box::new(UNIMPLEMENTED_OPCODES_TOTAL.clone()))
        .expect("Failed to register unimplemented opcodes counter");
}

/// Record a CPU instruction execution
pub fn record_instruction(opcode: u8, instruction_name: &str, cycles: u8, duration: Duration) {
    CPU_INSTRUCTIONS_TOTAL
        .with_label_values(&[&format!("0x{:02X}", opcode), instruction_name])
        .inc();

    CPU_CYCLES_TOTAL.inc_by(cycles as f64);

    INSTRUCTION_DURATION
        .with_label_values(&[instruction_name])
        .observe(duration.as_secs_f64());
}

/// Record a serviced interrupt (line is "nmi" or "irq")
pub fn record_interrupt(line: &str) {
    INTERRUPTS_SERVICED_TOTAL.with_label_values(&[line]).inc();
}

/// Record a CPU reset
pub fn record_reset() {
    CPU_RESETS_TOTAL.inc();
}

/// Record an unimplemented opcode fetch
pub fn record_unimplemented_opcode(opcode: u8) {
    UNIMPLEMENTED_OPCODES_TOTAL
        .with_label_values(&[&format!("0x{:02X}", opcode)])
        .inc();
}

/// Helper struct for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
