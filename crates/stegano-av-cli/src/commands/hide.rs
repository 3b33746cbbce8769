use std::path::PathBuf;

use clap::Args;
use stegano_av_core::BitsPerUnit;

use crate::CliResult;

/// Hides a message or a file in WAV audio or lossless video
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Password used to obfuscate the data, audio only
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Prompt for the password instead of passing it as argument
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,

    /// WAV audio, a video file or a directory of PNG frames, used readonly.
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Final media will be stored as file: wav for audio, mkv, avi or nut for video,
    /// a path without extension becomes a directory of PNG frames
    #[arg(short = 'o', long = "out", value_name = "output media file", required = true)]
    pub write_to_file: PathBuf,

    /// File to hide in the media
    #[arg(
        short = 'd',
        long = "data",
        value_name = "data file",
        required_unless_present = "message",
        conflicts_with = "message"
    )]
    pub data_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message", required_unless_present = "data_file")]
    pub message: Option<String>,
}

impl HideArgs {
    pub fn run(self, bits_per_unit: BitsPerUnit) -> CliResult<()> {
        let password = if self.ask_password {
            crate::cli::ask_for_password(true)
        } else {
            self.password
        };

        stegano_av_core::commands::hide(
            &self.media,
            &self.write_to_file,
            self.data_file,
            self.message,
            password,
            bits_per_unit,
        )
    }
}
