use crate::collector;
use crate::config::{Config, DEFAULT_QUORUM_KEY};
use crate::error;
use crate::field::Modulus;
use crate::io::{self, BatchSource};
use crate::radix;
use crate::sss;
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::{info, info_span, warn};
use zeroize::Zeroizing;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recover the secret from one or more share batches (one line of output per batch)
    Recover(RecoverArgs),
    /// Decode a digit string in base 2..36 into a field element
    Decode(DecodeArgs),
}

// ---------------------------------------------------------------------------
// Shared arg groups
// ---------------------------------------------------------------------------

/// Args selecting the working field.
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Prime modulus of the field
    #[arg(long, value_name = "PRIME", default_value_t = Modulus::DEFAULT, value_parser = parse_modulus)]
    pub modulus: Modulus,
}

// ---------------------------------------------------------------------------
// Per-command args
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Batch files to process, in order (stdin if no files and no --dir)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory of *.json batches, processed after FILEs in name order
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Top-level key of the quorum record
    #[arg(long, default_value = DEFAULT_QUORUM_KEY)]
    pub quorum_key: String,

    #[command(flatten)]
    pub field: FieldArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Digit string (0-9, a-z, case-insensitive)
    pub value: String,

    /// Base of VALUE, 2..36
    #[arg(short, long)]
    pub base: u32,

    #[command(flatten)]
    pub field: FieldArgs,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Recover(args) => recover(args),
        Command::Decode(args) => decode(args),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn recover(args: RecoverArgs) -> Result<()> {
    let sources = resolve_sources(&args)?;
    let config = Config::new(args.field.modulus, args.quorum_key);

    let mut failed = 0usize;
    for source in &sources {
        match recover_batch(source, &config) {
            Ok(secret) => println!("Secret from {source}: {}", *secret),
            Err(e) => {
                failed += 1;
                eprintln!("error: {source}: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} batch(es) failed", sources.len());
    }
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<()> {
    let value = radix::decode(&args.value, args.base, args.field.modulus)
        .with_context(|| format!("decode {:?} in base {}", args.value, args.base))?;
    println!("{value}");
    Ok(())
}

/// Read, ingest and combine one batch. Failures stay with the batch.
pub fn recover_batch(source: &BatchSource, config: &Config) -> error::Result<Zeroizing<u64>> {
    let _span = info_span!("batch", %source).entered();
    let raw = io::read_batch(source)?;
    let batch = collector::ingest(&raw, config)?;
    info!(
        k = batch.k,
        available = batch.shares.len(),
        skipped = batch.rejected.len(),
        "combining first k shares"
    );
    sss::combine(&batch.shares, batch.k, config.modulus)
}

fn resolve_sources(args: &RecoverArgs) -> Result<Vec<BatchSource>> {
    let mut sources: Vec<BatchSource> = args.files.iter().cloned().map(BatchSource::File).collect();
    if let Some(dir) = &args.dir {
        let found = io::discover_batches(dir)?;
        if found.is_empty() {
            if sources.is_empty() {
                bail!("no *.json batches in {:?}", dir);
            }
            warn!(dir = %dir.display(), "no *.json batches in directory");
        }
        sources.extend(found.into_iter().map(BatchSource::File));
    } else if sources.is_empty() {
        sources.push(BatchSource::Stdin);
    }
    Ok(sources)
}

fn parse_modulus(text: &str) -> Result<Modulus> {
    let p: u64 = text
        .trim()
        .replace('_', "")
        .parse()
        .with_context(|| format!("{text:?} is not an unsigned 64-bit integer"))?;
    Ok(Modulus::new(p)?)
}
