use clap::Parser;
use stegano_av_core::BitsPerUnit;

mod cli;
mod commands;

use cli::{CliArgs, Commands};

pub type CliResult<T> = stegano_av_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let bits_per_unit = BitsPerUnit::try_from(args.bits_per_unit)?;

    match args.command {
        Commands::Hide(hide) => hide.run(bits_per_unit),
        Commands::Unveil(unveil) => unveil.run(bits_per_unit),
        Commands::UnveilRaw(unveil_raw) => unveil_raw.run(bits_per_unit),
        Commands::Capacity(capacity) => capacity.run(bits_per_unit),
    }
}
