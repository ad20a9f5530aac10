use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use msp430_rs::{Decoder, DecoderConfig, Msp430Decoder};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Decode a single MSP430 instruction from hex bytes"
)]
struct Opts {
    /// Address of the first byte (hex or dec)
    #[arg(short, long, default_value = "0")]
    address: String,
    /// Report underlying forms instead of emulated mnemonics
    #[arg(long)]
    raw: bool,
    /// Instruction bytes in memory order, e.g. `30 41` or `3041`
    #[arg(value_name = "HEX", required = true)]
    bytes: Vec<String>,
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn parse_hex_bytes(parts: &[String]) -> Result<Vec<u8>> {
    let digits: String = parts.concat().chars().filter(|c| !c.is_whitespace()).collect();
    anyhow::ensure!(digits.chars().all(|c| c.is_ascii_hexdigit()), "not a hex byte string");
    anyhow::ensure!(digits.len() % 2 == 0, "odd number of hex digits");
    (0..digits.len())
        .step_by(2)
        .map(|i| -> Result<u8> { Ok(u8::from_str_radix(&digits[i..i + 2], 16)?) })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let address = parse_u32(&opts.address)?;
    let bytes = parse_hex_bytes(&opts.bytes)?;

    let dec = Msp430Decoder::with_config(DecoderConfig { emulated: !opts.raw });
    let insn = dec.decode(&bytes, address)?;
    println!("{}", serde_json::to_string_pretty(&insn)?);

    Ok(())
}
