use std::path::PathBuf;

use clap::{Args, ValueEnum};
use stegano_av_core::{BitsPerUnit, DigestPolicy};

use crate::CliResult;

/// What to do when the digest of an unveiled video payload does not match
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum DigestCheck {
    /// fail and write nothing
    #[default]
    Verify,
    /// log a warning and write the payload anyway
    Warn,
    /// do not check at all
    Ignore,
}

impl From<DigestCheck> for DigestPolicy {
    fn from(check: DigestCheck) -> Self {
        match check {
            DigestCheck::Verify => DigestPolicy::Verify,
            DigestCheck::Warn => DigestPolicy::Warn,
            DigestCheck::Ignore => DigestPolicy::Ignore,
        }
    }
}

/// Unveils data from WAV audio or lossless video
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Password used to obfuscate the data, audio only
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Prompt for the password instead of passing it as argument
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,

    /// Source media that contains secret data
    #[arg(short = 'i', long = "in", value_name = "media source file", required = true)]
    pub media: PathBuf,

    /// Final data will be stored in that folder, or as that file
    #[arg(short = 'o', long = "out", value_name = "output folder or file", required = true)]
    pub destination: PathBuf,

    /// Digest check for video payloads
    #[arg(long, value_enum, default_value_t = DigestCheck::Verify)]
    pub digest: DigestCheck,
}

impl UnveilArgs {
    pub fn run(self, bits_per_unit: BitsPerUnit) -> CliResult<()> {
        let password = if self.ask_password {
            crate::cli::ask_for_password(false)
        } else {
            self.password
        };

        let target = stegano_av_core::commands::unveil(
            &self.media,
            &self.destination,
            password,
            bits_per_unit,
            self.digest.into(),
        )?;
        println!("{}", target.display());

        Ok(())
    }
}
