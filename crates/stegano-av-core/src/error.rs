use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteganoError {
    /// Represents a carrier path that does not exist
    #[error("Carrier media not found: {0}")]
    CarrierNotFound(PathBuf),

    /// Represents a media file that is not audio or video, judged by its extension
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents a carrier that can be read but not used, for example 24bit samples
    /// or a `bits per unit` value other than 1 or 2
    #[error("Unsupported carrier format: {0}")]
    UnsupportedCarrierFormat(String),

    /// Represents a payload that does not fit into the carrier
    #[error(
        "Capacity Error: the payload needs {required_bytes} bytes, but the carrier can hold at most {available_bytes} bytes"
    )]
    CapacityExceeded {
        required_bytes: u64,
        available_bytes: u64,
    },

    /// Represents a truncated bit stream, an unparsable header or inconsistent length fields
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    /// Represents an unveil of no secret data. For example when a media did not contain any secrets
    #[error("No secret data found")]
    NoHiddenData,

    /// Represents an unveiled payload whose digest does not match the one stored in its header
    #[error("Payload digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    /// Represents an error caused by an invalid filename, for example not unsupported charset or empty filename
    #[error("A file with an invalid file name was provided")]
    InvalidFileName,

    /// Represents a failure of the external video pipeline (ffmpeg / ffprobe)
    #[error("Video pipeline error: {0}")]
    VideoPipeline(String),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents a failure when encoding an audio file.
    #[error("Audio encoding error")]
    AudioEncodingError,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Represents an option that the chosen carrier kind cannot honour
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// Represents an operation that was stopped through its cancel flag
    #[error("Operation cancelled")]
    Cancelled,

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing payload")]
    MissingPayload,
}

impl From<hound::Error> for SteganoError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(source) => SteganoError::ReadError { source },
            hound::Error::Unsupported => {
                SteganoError::UnsupportedCarrierFormat("unsupported WAV layout".to_string())
            }
            other => SteganoError::UnsupportedCarrierFormat(other.to_string()),
        }
    }
}

impl From<image::ImageError> for SteganoError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(source) => SteganoError::ReadError { source },
            other => SteganoError::UnsupportedCarrierFormat(other.to_string()),
        }
    }
}
