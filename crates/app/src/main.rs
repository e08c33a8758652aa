//! huffpuff: compress files with a per-file Huffman code.

mod config;
mod input_gen;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use huffpuff_core::format::{parse_encoded, serialize_encoded};
use huffpuff_core::stats::CompressionStats;
use huffpuff_core::{compress, decompress, FrequencyTable, Result};
use log::info;

use config::{Action, Cli, CodesSource, Config};

fn main() -> ExitCode {
    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .parse_default_env()
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    if config.print_stats {
        config.print();
    }

    match &config.action {
        Action::Compress { input, output } => {
            let data = fs::read(input)?;
            let mut stats = CompressionStats::new();

            let result = compress(&data);
            let container = serialize_encoded(&result)?;
            fs::write(output, &container)?;

            stats.record(&data, &result);
            stats.container_bytes = Some(container.len() as u64);
            stats.complete();
            info!("compressed {} -> {}", input.display(), output.display());

            println!(
                "{} -> {}: {} bytes -> {} bytes",
                input.display(),
                output.display(),
                data.len(),
                container.len()
            );
            if config.print_stats {
                stats.print_summary();
            }
        }
        Action::Decompress { input, output } => {
            let container = fs::read(input)?;
            let result = parse_encoded(&container)?;
            let data = decompress(&result)?;
            fs::write(output, &data)?;
            info!("decompressed {} -> {}", input.display(), output.display());

            println!(
                "{} -> {}: {} bytes -> {} bytes",
                input.display(),
                output.display(),
                container.len(),
                data.len()
            );
        }
        Action::Codes { source } => {
            let data = match source {
                CodesSource::Text(text) => text.clone().into_bytes(),
                CodesSource::File(path) => fs::read(path)?,
            };
            print_codes(&data);
        }
        Action::Sample {
            out,
            seed,
            size,
            profile,
        } => {
            input_gen::write_sample_file(out, *seed, *size, *profile)?;
            println!(
                "wrote {} bytes of {:?} data to {} (seed {})",
                size,
                profile,
                out.display(),
                seed
            );
        }
    }

    Ok(())
}

/// Print every present symbol with its count and code.
fn print_codes(data: &[u8]) {
    let freqs = FrequencyTable::from_bytes(data);
    let result = compress(data);
    let Some(tree) = result.tree() else {
        println!("(empty input: no symbols, no tree)");
        return;
    };
    let table = tree.code_table();

    println!("=== Code Table ===");
    println!("{:>6}  {:>10}  code", "symbol", "count");
    for (symbol, code) in table.iter() {
        let label = if symbol.is_ascii_graphic() {
            format!("'{}'", symbol as char)
        } else {
            format!("{symbol:#04x}")
        };
        println!("{:>6}  {:>10}  {}", label, freqs.count(symbol), code);
    }
    println!();
    println!(
        "{} leaves, {} internal nodes, depth {}",
        tree.leaf_count(),
        tree.internal_count(),
        tree.depth()
    );
    println!(
        "{} symbols -> {} bits ({:.3} bits/symbol)",
        data.len(),
        result.bit_len(),
        result.bit_len() as f64 / data.len() as f64
    );
}
