use crate::result::Result;

/// A reversible transformation applied to the payload before it is framed.
///
/// The framing only ever sees the sealed bytes, so an implementation can be
/// swapped without touching the wire format.
pub trait PayloadCipher {
    fn seal(&self, data: &[u8]) -> Vec<u8>;

    fn open(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Repeating key XOR with the password bytes.
///
/// Note: this is obfuscation, not encryption. It has no integrity protection
/// and a known plaintext reveals the key.
#[derive(Clone, PartialEq, Eq)]
pub struct XorCipher {
    key: Vec<u8>,
}

impl XorCipher {
    /// `None` for an empty password, XOR with an empty key is undefined.
    pub fn new(password: &str) -> Option<Self> {
        if password.is_empty() {
            None
        } else {
            Some(Self {
                key: password.as_bytes().to_vec(),
            })
        }
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

impl PayloadCipher for XorCipher {
    fn seal(&self, data: &[u8]) -> Vec<u8> {
        self.apply(data)
    }

    fn open(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.apply(data))
    }
}
