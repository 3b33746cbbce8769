use std::path::PathBuf;

use clap::Args;
use stegano_av_core::BitsPerUnit;

/// Unveils the raw low bits of WAV audio or lossless video, without any interpretation
#[derive(Args, Debug)]
pub struct UnveilRawArgs {
    /// Source media that contains secret data
    #[arg(short = 'i', long = "in", value_name = "media source file", required = true)]
    pub media: PathBuf,

    /// Raw data will be stored as binary file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub output_file: PathBuf,
}

impl UnveilRawArgs {
    pub fn run(self, bits_per_unit: BitsPerUnit) -> crate::CliResult<()> {
        stegano_av_core::commands::unveil_raw(&self.media, &self.output_file, bits_per_unit)
    }
}
