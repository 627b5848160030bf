use clap::{ArgAction, Parser};
use sim_emulator::{FlagState, RegisterFile, Runner, Step, Trace};
use sim_instruction::RegisterAccess;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "sim-emu", version, about = "Execute a raw 8086 binary, printing every step")]
struct Opt {
    /// The binary file to execute (at most 64 KiB)
    binary: PathBuf,

    /// More log output on stderr (warn, info, debug, trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Stop after executing this many instructions
    #[arg(long)]
    max_steps: Option<usize>,

    /// Write the data memory to this file after the run
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Hex bytes, padded to the longest instruction so the mnemonics line up.
fn format_bytes(bytes: &[u8]) -> String {
    let b: String = bytes.iter().map(|b| format!("{:02x} ", b)).collect();
    format!("{:<18}", b)
}

fn format_trace(trace: &Trace) -> String {
    let mut changes: Vec<String> = trace
        .register_change
        .iter()
        .map(ToString::to_string)
        .collect();

    changes.push(format!("ip:{:#06x}->{:#06x}", trace.ip_before, trace.ip_after));

    for (name, before, after) in trace.changed_flags() {
        changes.push(format!("{}:{}->{}", name, before as u8, after as u8));
    }

    format!(
        "{:04x}  {}{} ; {}",
        trace.instruction.address,
        format_bytes(&trace.instruction.bytes),
        trace.instruction,
        changes.join(" ")
    )
}

fn format_registers(registers: &RegisterFile, ip: u16, flags: &FlagState) -> Vec<String> {
    let mut lines: Vec<String> = registers
        .iter()
        .map(|(register, value)| {
            format!("{}: {:#06x} ({})", RegisterAccess::word(register), value, value)
        })
        .collect();

    lines.push(format!("ip: {:#06x} ({})", ip, ip));
    lines.push(format!("flags: {}", flags));

    lines
}

fn main() -> ExitCode {
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(opt.verbose);

    let program = match std::fs::read(&opt.binary) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("Could not read {}: {}", opt.binary.display(), err);
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} bytes from {}", program.len(), opt.binary.display());

    let mut runner = match Runner::new(&program) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut steps = 0;
    let stop = loop {
        if opt.max_steps.map_or(false, |max_steps| steps >= max_steps) {
            break format!("stopped after {} steps", steps);
        }

        match runner.step() {
            Ok(Step::Executed(trace)) => {
                println!("{}", format_trace(&trace));
                steps += 1;
            }
            Ok(Step::Halted(halt)) => break format!("halted: {}", halt),
            Err(err) => break format!("fault at {:04x}: {}", runner.ip(), err),
        }
    };

    println!();
    println!("; {}", stop);
    println!();
    println!("Final registers:");
    for line in format_registers(runner.registers(), runner.ip(), runner.flags()) {
        println!("    {}", line);
    }

    if let Some(path) = &opt.dump {
        if let Err(err) = std::fs::write(path, runner.memory().as_slice()) {
            error!("Could not write memory dump to {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
        info!("Wrote memory dump to {}", path.display());
    }

    ExitCode::SUCCESS
}
