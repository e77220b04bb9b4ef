//! `copy_local_sdk` entry point.

use clap::Parser;

use sdksync_cli::{Cli, init_tracing, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    run(&cli, &mut handle)?;
    Ok(())
}
