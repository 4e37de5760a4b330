use anyhow::Result;
use clap::Parser;

mod cli_bin;

use cli_bin::args::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    cli_bin::commands::run(cli.command)
}
