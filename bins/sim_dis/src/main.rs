use clap::{ArgAction, Parser};
use sim_decoder::decode_instruction;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "sim-dis", version, about = "Disassemble a raw 8086 binary")]
struct Opt {
    /// The binary file to disassemble
    binary: PathBuf,

    /// More log output on stderr (warn, info, debug, trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
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

fn format_line(address: usize, bytes: &[u8], text: &str) -> String {
    let b: String = bytes.iter().map(|b| format!("{:02x} ", b)).collect();
    format!("{:04x}  {:<18}{}", address, b, text)
}

/// One line per instruction. Bytes that do not decode are printed as data and skipped one at a
/// time.
fn disassemble(data: &[u8]) -> Vec<String> {
    let mut lines = vec![];
    let mut address = 0;

    while address < data.len() {
        match decode_instruction(data, address) {
            Ok(instruction) => {
                lines.push(format_line(
                    address,
                    &instruction.bytes,
                    &instruction.to_string(),
                ));
                address = instruction.next_address();
            }
            Err(err) => {
                debug!("{}", err);
                let byte = data[address];
                lines.push(format_line(address, &[byte], &format!("db {:#04x}", byte)));
                address += 1;
            }
        }
    }

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

    let data = match std::fs::read(&opt.binary) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Could not read {}: {}", opt.binary.display(), err);
            return ExitCode::FAILURE;
        }
    };

    for line in disassemble(&data) {
        println!("{}", line);
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_bytes_are_skipped() {
        let lines = disassemble(&[0xB9, 0x0C, 0x00, 0xF1, 0x89, 0xD9, 0xB8]);

        assert_eq!(
            lines,
            vec![
                "0000  b9 0c 00          mov cx, 12",
                "0003  f1                db 0xf1",
                "0004  89 d9             mov cx, bx",
                "0006  b8                db 0xb8",
            ]
        );
    }

    #[test]
    fn empty_image() {
        assert!(disassemble(&[]).is_empty());
    }
}
