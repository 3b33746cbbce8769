//! Bit framing of hidden payloads.
//!
//! Both layouts start with a 32bit big endian length:
//!
//! - `Simple`: `[payload length][payload]`
//! - `Rich`: `[header length][JSON header][payload]`, the header's `size` field
//!   gives the payload length
//!
//! Bytes are turned into carrier bits most significant bit first, see
//! [`crate::universal_encoder`].

use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::header::RichHeader;
use crate::result::Result;
use crate::SteganoError;

/// bits of the leading length field, shared by both layouts
pub const LENGTH_PREFIX_BITS: u64 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    Simple,
    Rich,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Simple { payload: Vec<u8> },
    Rich { header: RichHeader, payload: Vec<u8> },
}

impl Frame {
    pub fn simple(payload: Vec<u8>) -> Self {
        Frame::Simple { payload }
    }

    /// Builds a rich frame, the header is derived from `payload`.
    pub fn rich<S: Into<String>>(filename: S, payload: Vec<u8>) -> Self {
        let header = RichHeader::describe(filename, &payload);
        Frame::Rich { header, payload }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Simple { payload } | Frame::Rich { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> Vec<u8> {
        match self {
            Frame::Simple { payload } | Frame::Rich { payload, .. } => payload,
        }
    }

    pub fn header(&self) -> Option<&RichHeader> {
        match self {
            Frame::Simple { .. } => None,
            Frame::Rich { header, .. } => Some(header),
        }
    }

    /// number of bits the frame adds on top of the payload itself
    pub fn overhead_bits(&self) -> Result<u64> {
        Ok(match self {
            Frame::Simple { .. } => LENGTH_PREFIX_BITS,
            Frame::Rich { header, .. } => LENGTH_PREFIX_BITS + header.to_bytes()?.len() as u64 * 8,
        })
    }

    pub fn required_bits(&self) -> Result<u64> {
        Ok(self.overhead_bits()? + self.payload().len() as u64 * 8)
    }

    /// serializes the frame into the byte sequence that gets hidden
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.payload().len() + 4);
        match self {
            Frame::Simple { payload } => {
                buf.write_u32::<BigEndian>(length_field(payload.len())?)?;
            }
            Frame::Rich { header, .. } => {
                let header = header.to_bytes()?;
                buf.write_u32::<BigEndian>(length_field(header.len())?)?;
                buf.extend_from_slice(&header);
            }
        }
        buf.extend_from_slice(self.payload());

        Ok(buf)
    }

    /// Parses a frame from the unveiled byte stream of a carrier holding `capacity_bits`.
    ///
    /// Every length field is checked against the capacity before anything is read,
    /// so a bogus length is reported as [`SteganoError::CorruptContainer`].
    pub fn read_from<R: Read + ?Sized>(
        reader: &mut R,
        layout: FrameLayout,
        capacity_bits: u64,
    ) -> Result<Self> {
        if capacity_bits < LENGTH_PREFIX_BITS {
            return Err(SteganoError::NoHiddenData);
        }
        let len = reader.read_u32::<BigEndian>().map_err(map_read_error)? as u64;
        if len == 0 {
            return Err(SteganoError::NoHiddenData);
        }
        let available_bytes = (capacity_bits - LENGTH_PREFIX_BITS) / 8;

        match layout {
            FrameLayout::Simple => {
                if len > available_bytes {
                    return Err(SteganoError::CorruptContainer(format!(
                        "length field announces {len} bytes, but the carrier holds at most {available_bytes}"
                    )));
                }
                let payload = read_vec(reader, len)?;

                Ok(Frame::Simple { payload })
            }
            FrameLayout::Rich => {
                if len > available_bytes {
                    return Err(SteganoError::CorruptContainer(format!(
                        "header length field announces {len} bytes, but the carrier holds at most {available_bytes}"
                    )));
                }
                let header = RichHeader::from_bytes(&read_vec(reader, len)?)?;
                if header.size > available_bytes - len {
                    return Err(SteganoError::CorruptContainer(format!(
                        "header announces a payload of {} bytes, but only {} bytes are left",
                        header.size,
                        available_bytes - len
                    )));
                }
                let payload = read_vec(reader, header.size)?;

                Ok(Frame::Rich { header, payload })
            }
        }
    }
}

fn length_field(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| SteganoError::CapacityExceeded {
        required_bytes: len as u64,
        available_bytes: u32::MAX as u64,
    })
}

fn read_vec<R: Read + ?Sized>(reader: &mut R, len: u64) -> Result<Vec<u8>> {
    let mut buf = vec![0; len as usize];
    reader.read_exact(&mut buf).map_err(map_read_error)?;

    Ok(buf)
}

fn map_read_error(e: io::Error) -> SteganoError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            SteganoError::CorruptContainer("bit stream ended before the frame was complete".into())
        }
        _ => SteganoError::ReadError { source: e },
    }
}
