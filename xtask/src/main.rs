use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for pentahex")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and the solid smoke run
    Check,
    Fmt,
    Clippy,
    Test,
    /// Run the tiling benchmarks in release mode
    Bench,
    /// Grow the folded solid through the CLI and fail unless it closes
    Solid,
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];
const TEST: &[&str] = &["test", "--workspace"];
const BENCH: &[&str] = &["bench", "-p", "pentahex-tiling"];
const SOLID: &[&str] = &[
    "run", "-q", "-p", "pentahex-cli", "--", "tile", "--rule", "solid", "--max-faces", "60",
    "--strict",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for args in [FMT, CLIPPY, TEST, SOLID] {
                cargo(args)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Bench => cargo(BENCH)?,
        Commands::Solid => cargo(SOLID)?,
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        bail!("cargo {} failed ({status})", args[0]);
    }
    Ok(())
}
