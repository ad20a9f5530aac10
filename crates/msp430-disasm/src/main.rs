use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::fmt::Write as _;
use std::path::Path;

use msp430_disasm::{load_raw_bin, slice_from, Image};
use msp430_rs::{DecodeError, Decoder, DecoderConfig, Instruction, Msp430Decoder};

#[derive(Parser, Debug)]
#[command(author, version, about = "MSP430 disassembler CLI", long_about=None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value_t = 0u32)]
    base: u32,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Report underlying forms instead of emulated mnemonics (br, ret, dint)
    #[arg(long)]
    raw: bool,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments (simple single-segment for raw .bin)
    Sections,
    /// Disassemble a range [start, end) in bytes
    Range {
        /// Start address (hex or dec)
        start: String,
        /// End address (hex or dec, exclusive)
        end: String,
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, serde::Serialize)]
struct ErrorOut { address: u32, error: String }

#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
enum LineOut { Insn(Instruction), Error(ErrorOut) }

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

/// Decode `[start, end)` with a linear sweep. Bytes past `end` are still
/// visible to the decoder so a trailing instruction can read its extension words.
fn sweep(img: &Image, dec: &Msp430Decoder, start: u32, end: u32) -> Vec<Result<Instruction, DecodeError>> {
    let Some(bytes) = slice_from(img, start) else { return Vec::new() };
    let span = (end - start) as usize;
    let mut out = Vec::new();
    for res in dec.decode_block(bytes, start) {
        let addr = match &res { Ok(i) => i.address, Err(e) => e.address() };
        if addr.wrapping_sub(start) as usize >= span { break; }
        out.push(res);
    }
    out
}

fn render_text(img: &Image, lines: &[Result<Instruction, DecodeError>], show_bytes: bool) -> String {
    let mut buf = String::new();
    for res in lines {
        match res {
            Ok(insn) => {
                let pc = insn.address;
                let _ = write!(buf, "{pc:#06x}: ");
                if show_bytes {
                    let bytes = slice_from(img, pc).unwrap_or(&[]);
                    for b in bytes.iter().take(usize::from(insn.length)) { let _ = write!(buf, "{:02x} ", b); }
                    for _ in insn.length..6 { buf.push_str("   "); }
                }
                let _ = write!(buf, "  {}", insn.mnemonic);
                if insn.emulated { buf.push_str("  ; emulated"); }
                buf.push('\n');
            }
            Err(DecodeError::InvalidOpcode { address, word }) => {
                let _ = writeln!(buf, "{address:#06x}: .word {word:#06x}");
            }
            Err(e @ DecodeError::Truncated { address, .. }) => {
                let _ = writeln!(buf, "{address:#06x}: <{e}>");
            }
        }
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let img = load_raw_bin(Path::new(&cli.input), cli.base, cli.skip, cli.len)?;

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<#12} {:<#12} {:<6} {:<6}", "name", "start", "end", "perms", "kind");
            for s in &img.segments {
                let start = s.base;
                let end = s.end();
                println!(
                    "{:<10} {start:#010x} {end:#010x} {:<6} {:<6}",
                    s.name, s.perms, s.kind
                );
            }
        }
        Command::Range { start, end, show_bytes, format, out } => {
            let start = parse_u32(&start)?;
            let end = parse_u32(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");

            let dec = Msp430Decoder::with_config(DecoderConfig { emulated: !cli.raw });
            let lines = sweep(&img, &dec, start, end);
            tracing::info!(start, end, decoded = lines.len(), "range decoded");

            let buf = match format {
                OutputFormat::Text => render_text(&img, &lines, show_bytes),
                OutputFormat::Json => {
                    let rows: Vec<LineOut> = lines
                        .into_iter()
                        .map(|r| match r {
                            Ok(i) => LineOut::Insn(i),
                            Err(e) => LineOut::Error(ErrorOut { address: e.address(), error: e.to_string() }),
                        })
                        .collect();
                    serde_json::to_string_pretty(&rows)?
                }
            };
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
        }
    }

    Ok(())
}
