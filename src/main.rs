//! Rotolog demo entry point.

use clap::Parser;

use rotolog::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(&cli)
}
