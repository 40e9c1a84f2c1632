mod cmd;
mod collector;
mod config;
mod error;
mod field;
mod io;
mod radix;
mod share;
mod sss;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

/// shamir-recover — Recover a Shamir secret from base-N encoded shares.
///
/// Each batch is a JSON document holding a quorum `k` and labelled shares
/// whose values are digit strings in bases 2..36. Any k valid shares
/// recover the secret by Lagrange interpolation at x = 0 over GF(p),
/// p = 10^9 + 7 unless --modulus says otherwise.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: cmd::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cmd::run(cli.command)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recover() {
        let cli = Cli::parse_from([
            "shamir-recover",
            "-vv",
            "recover",
            "input1.json",
            "input2.json",
            "--modulus",
            "97",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            cmd::Command::Recover(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.field.modulus.get(), 97);
                assert_eq!(args.quorum_key, "keys");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn default_modulus() {
        let cli = Cli::parse_from(["shamir-recover", "decode", "ff", "--base", "16"]);
        match cli.command {
            cmd::Command::Decode(args) => {
                assert_eq!(args.field.modulus, field::Modulus::DEFAULT);
                assert_eq!(args.base, 16);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_composite_modulus() {
        let res = Cli::try_parse_from(["shamir-recover", "recover", "--modulus", "1000000006"]);
        assert!(res.is_err());
    }
}
