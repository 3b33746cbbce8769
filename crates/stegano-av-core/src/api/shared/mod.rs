mod password;

pub use password::*;

use std::path::Path;

use crate::result::Result;
use crate::SteganoError;

/// name under which a text message is hidden in a video
pub const MESSAGE_FILE_NAME: &str = "secret-message.txt";

/// fails with `CarrierNotFound` before any media specific code gets to see `path`
pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(SteganoError::CarrierNotFound(path.to_path_buf()))
    }
}
