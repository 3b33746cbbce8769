use clap::{Parser, Subcommand};
use dialoguer::Password;

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Low order bits of every sample or color channel that carry data, 1 or 2.
    /// Unveil must use the value that was used to hide.
    #[arg(
        short = 'b',
        long = "bits-per-unit",
        global = true,
        default_value = "1",
        value_parser = clap::value_parser!(u8).range(1..=2)
    )]
    pub bits_per_unit: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    UnveilRaw(unveil_raw::UnveilRawArgs),
    Capacity(capacity::CapacityArgs),
}

/// Prompts for a password on the terminal, `None` if nothing was entered.
pub fn ask_for_password(confirm: bool) -> Option<String> {
    let prompt = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true);
    let prompt = if confirm {
        prompt.with_confirmation("Repeat password", "Error: the passwords don't match.")
    } else {
        prompt
    };

    prompt.interact().ok().filter(|p| !p.is_empty())
}
