//! MIPS32 instructional simulator CLI.
//!
//! This binary runs a raw big-endian program image on the simulated machine. It performs:
//! 1. **Configuration:** Reads an optional JSON configuration and applies command-line overrides.
//! 2. **Loading:** Copies the image to the load address (the reset PC by default).
//! 3. **Execution:** Runs until an exception configured to stop is dispatched or the cycle
//!    budget is exhausted, then prints statistics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mipsim_core::common::SimError;
use mipsim_core::config::{Config, HazardUnit};
use mipsim_core::{Machine, RunOutcome};

/// Hazard-unit mode as spelled on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum HazardArg {
    /// No hazard detection
    None,
    /// Stall until operands are written back
    Stall,
    /// Forward where possible, stall otherwise
    Forward,
}

impl From<HazardArg> for HazardUnit {
    fn from(arg: HazardArg) -> Self {
        match arg {
            HazardArg::None => Self::None,
            HazardArg::Stall => Self::Stall,
            HazardArg::Forward => Self::StallForward,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Instructional MIPS32 simulator",
    long_about = "Run a raw big-endian MIPS32 image on a single-cycle or pipelined core.\n\nExamples:\n  sim program.bin\n  sim program.bin --pipelined --hazard-unit stall\n  sim program.bin --config machine.json --max-cycles 100000 --dump-regs"
)]
struct Cli {
    /// Raw program image.
    image: PathBuf,

    /// JSON machine configuration; omitted fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the image is loaded at (defaults to the reset PC).
    #[arg(long, value_parser = parse_address)]
    load_addr: Option<u64>,

    /// Cycle budget.
    #[arg(long, default_value_t = 1_000_000)]
    max_cycles: u64,

    /// Use the five-stage pipelined core.
    #[arg(long)]
    pipelined: bool,

    /// Hazard unit of the pipelined core.
    #[arg(long, value_enum)]
    hazard_unit: Option<HazardArg>,

    /// Model the delay slot on the single-cycle core.
    #[arg(long)]
    delay_slot: Option<bool>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the register file after the run.
    #[arg(long)]
    dump_regs: bool,
}

/// Accepts decimal or `0x`-prefixed hexadecimal addresses.
fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config, SimError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.pipelined {
        config.core.pipelined = true;
    }
    if let Some(hazard) = cli.hazard_unit {
        config.core.hazard_unit = hazard.into();
    }
    if let Some(delay_slot) = cli.delay_slot {
        config.core.delay_slot = delay_slot;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = build_config(cli)?;
    let mut machine = Machine::new(&config)?;
    let load_addr = cli.load_addr.unwrap_or(config.core.pc);
    machine.load_file(&cli.image, load_addr)?;

    match machine.run(cli.max_cycles)? {
        RunOutcome::Stopped { cause, pc } => {
            let cause = cause.map_or_else(|| "-".to_owned(), |c| c.to_string());
            println!("stopped: {cause} at pc {pc:#010x}");
        }
        RunOutcome::CycleLimit => {
            println!("cycle limit of {} reached", cli.max_cycles);
        }
    }

    if cli.dump_regs {
        machine.regs().dump();
    }
    machine.stats().print();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(&cli) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}
