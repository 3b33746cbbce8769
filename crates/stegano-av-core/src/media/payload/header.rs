use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::result::Result;
use crate::SteganoError;

/// Self description of a payload hidden in a video, stored as UTF-8 JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichHeader {
    pub filename: String,
    /// exact payload length in bytes
    pub size: u64,
    /// hex encoded SHA-256 of the payload
    pub digest: String,
}

impl RichHeader {
    pub fn describe<S: Into<String>>(filename: S, payload: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            size: payload.len() as u64,
            digest: digest_of(payload),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| SteganoError::IoError(e.into()))
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        serde_json::from_slice(buf)
            .map_err(|e| SteganoError::CorruptContainer(format!("unparsable header: {e}")))
    }
}

pub fn digest_of(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}
