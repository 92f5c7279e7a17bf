use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codec::{FrameHeader, Protocol, VersionSelect};
use tera_tools::{coverage_report, dump_schemas, parse_hex};

#[derive(Parser)]
#[command(
    name = "tera-tools",
    version,
    about = "TERA protocol data inspection and decoding tools"
)]
struct Cli {
    /// Directory holding protocol.map and the *.def files.
    #[arg(long, global = true, default_value = ".")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a protocol directory and report schema/opcode coverage.
    Check,
    /// Print augmented schemas, implicit count/offset entries included.
    Dump {
        /// Restrict output to one message name.
        #[arg(long)]
        message: Option<String>,
    },
    /// Decode a frame and print the record.
    Decode {
        /// Path to the frame: raw bytes, or hex text with --hex.
        frame: PathBuf,
        /// Treat the input file as whitespace-separated hex text.
        #[arg(long)]
        hex: bool,
        /// Message name; defaults to resolving the header opcode.
        #[arg(long)]
        message: Option<String>,
        /// Schema version; defaults to the latest.
        #[arg(long)]
        version: Option<u32>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut protocol = Protocol::new();
    protocol
        .load(&cli.data)
        .with_context(|| format!("load protocol data from {}", cli.data.display()))?;

    match cli.command {
        Command::Check => {
            print!("{}", coverage_report(&protocol));
        }
        Command::Dump { message } => {
            print!("{}", dump_schemas(&protocol, message.as_deref())?);
        }
        Command::Decode {
            frame,
            hex,
            message,
            version,
        } => {
            let bytes = if hex {
                let text = fs::read_to_string(&frame)
                    .with_context(|| format!("read hex text {}", frame.display()))?;
                parse_hex(&text)?
            } else {
                fs::read(&frame).with_context(|| format!("read frame {}", frame.display()))?
            };

            let select = version.map_or(VersionSelect::Latest, VersionSelect::Exact);
            let record = match message {
                Some(name) => protocol.parse(name.as_str(), select, &bytes)?,
                None => {
                    let header = FrameHeader::parse(&bytes)?;
                    protocol.parse(header.opcode, select, &bytes)?
                }
            };
            println!("{record}");
        }
    }
    Ok(())
}
