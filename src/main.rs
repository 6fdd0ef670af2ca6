use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, debug};
use sslc::Token;

/// Compiles a tiny scripting language to NASM x86-64 assembly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file; the program is read from stdin when omitted.
    input: Option<PathBuf>,
    /// Write the listing here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print the program's tokens, one per line, instead of compiling it.
    #[arg(long)]
    tokens: bool,
    /// Log more (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to initialise logging")?;

    let source = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            source
        }
    };

    let result = if args.tokens {
        sslc::tokenize(&source)
            .map(|tokens| tokens.iter().map(Token::to_string).collect::<Vec<_>>())
    } else {
        sslc::compile(&source)
    };
    let lines: Vec<String> = match result {
        Ok(lines) => lines,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };
    debug!("writing {} lines", lines.len());

    let mut listing = String::new();
    for line in &lines {
        listing.push_str(line);
        listing.push('\n');
    }
    match &args.output {
        Some(path) => fs::write(path, listing)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(listing.as_bytes())
            .context("failed to write stdout")?,
    }
    Ok(())
}
