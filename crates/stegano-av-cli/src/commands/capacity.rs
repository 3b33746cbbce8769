use std::path::PathBuf;

use clap::Args;
use stegano_av_core::BitsPerUnit;

use crate::CliResult;

/// Shows how much data a WAV audio or video can hold
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Media to inspect
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Name the payload would be hidden under, changes the video header size
    #[arg(short = 'n', long = "name", value_name = "file name")]
    pub file_name: Option<String>,
}

impl CapacityArgs {
    pub fn run(self, bits_per_unit: BitsPerUnit) -> CliResult<()> {
        let report =
            stegano_av_core::commands::capacity(&self.media, bits_per_unit, self.file_name.as_deref())?;

        println!("media:             {:?}", report.kind);
        println!("capacity:          {} bits", report.capacity_bits);
        println!("max payload:       {} bytes", report.max_payload_bytes);

        Ok(())
    }
}
