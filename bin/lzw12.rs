#![forbid(unsafe_code)]
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lzw12::{file, Format};

fn main() -> CodingResult {
    CodingResult::catch_panic(|| {
        let flags = Flags::parse();
        init_logging();
        run_coding(flags)
    })
}

/// Compress or decompress a file with fixed 12-bit LZW.
#[derive(Parser, Debug)]
#[command(name = "lzw12", version, about)]
struct Flags {
    /// `c` to compress, `d` to decompress.
    #[arg(value_enum)]
    operation: Operation,
    /// The file to read.
    input: PathBuf,
    /// The file to write, replaced only on success.
    output: PathBuf,
    /// The framing of the packed file.
    #[arg(short, long, value_enum, default_value_t = Style::Counted)]
    format: Style,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Operation {
    #[value(name = "c", alias = "compress")]
    Compress,
    #[value(name = "d", alias = "decompress")]
    Decompress,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Style {
    /// Prefixed with the number of codes.
    Counted,
    /// Headerless, may gain a trailing zero byte on decompression.
    Legacy,
}

impl From<Style> for Format {
    fn from(style: Style) -> Format {
        match style {
            Style::Counted => Format::Counted,
            Style::Legacy => Format::Legacy,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lzw12=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_coding(flags: Flags) -> anyhow::Result<()> {
    let Flags {
        operation,
        input,
        output,
        format,
    } = flags;
    let format = Format::from(format);

    let start = Instant::now();
    let stats = match operation {
        Operation::Compress => file::compress_file(&input, &output, format)
            .with_context(|| format!("failed to compress {}", input.display()))?,
        Operation::Decompress => file::decompress_file(&input, &output, format)
            .with_context(|| format!("failed to decompress {}", input.display()))?,
    };

    tracing::info!(
        operation = ?operation,
        bytes_read = stats.bytes_read,
        bytes_written = stats.bytes_written,
        millis = start.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}

enum CodingResult {
    Ok,
    Err(anyhow::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> anyhow::Result<()>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("{:#}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                eprintln!("If you know what this means, please report it to the maintainers.");
                std::process::ExitCode::from(128)
            }
        }
    }
}
