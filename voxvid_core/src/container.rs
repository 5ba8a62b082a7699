use crate::error::{Error, Result};
use crate::params::{ParameterSet, PARAMETER_FIELDS};

/// Container format version written by this implementation.
pub const FORMAT_VERSION: u32 = 2;

/// Fixed header preceding the parameter block: metadata_size + format_version.
pub const HEADER_SIZE: usize = 8;

/// Serialized parameter block size: 11 consecutive `u32` fields.
pub const METADATA_SIZE: usize = PARAMETER_FIELDS * 4;

/// Chunk container layout, all integers little-endian:
///
/// ```text
/// [0..4)                metadata_size   u32
/// [4..8)                format_version  u32
/// [8..8+metadata_size)  ParameterSet    11 × u32, declaration order
/// [..+8)                payload_size    u64
/// [..]                  payload         opaque codec engine bytes
/// ```
///
/// `metadata_size` is always 44 in the current scheme but is read
/// dynamically so a later version can grow the field count.
pub fn encode(params: &ParameterSet, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + METADATA_SIZE + 8 + payload.len());
    out.extend_from_slice(&(METADATA_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    for word in params.to_words() {
        out.extend_from_slice(&word.to_le_bytes());
    }
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse a chunk container, returning the stored parameters and a borrowed
/// payload slice.
///
/// An unknown `format_version` fails before any metadata is touched; a
/// truncated or undersized buffer fails without returning partial data.
pub fn decode(buf: &[u8]) -> Result<(ParameterSet, &[u8])> {
    if buf.len() < HEADER_SIZE {
        return Err(Error::InvalidContainer(format!(
            "{} bytes is too short for the container header",
            buf.len()
        )));
    }

    let metadata_size = read_u32(buf, 0) as usize;
    let version = read_u32(buf, 4);
    if version != FORMAT_VERSION {
        return Err(Error::VersionMismatch {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    if metadata_size < METADATA_SIZE {
        return Err(Error::InvalidContainer(format!(
            "parameter block is {metadata_size} bytes, expected at least {METADATA_SIZE}"
        )));
    }
    if (buf.len() as u64) < HEADER_SIZE as u64 + metadata_size as u64 + 8 {
        return Err(Error::InvalidContainer(format!(
            "truncated before payload size: {} bytes total, parameter block claims {metadata_size}",
            buf.len()
        )));
    }

    let mut words = [0u32; PARAMETER_FIELDS];
    for (i, word) in words.iter_mut().enumerate() {
        *word = read_u32(buf, HEADER_SIZE + i * 4);
    }
    let params = ParameterSet::from_words(&words);

    // Fields beyond the 11 we know are skipped, not rejected.
    let size_at = HEADER_SIZE + metadata_size;
    let payload_size = read_u64(buf, size_at);
    let payload_at = size_at + 8;

    if ((buf.len() - payload_at) as u64) < payload_size {
        return Err(Error::InvalidContainer(format!(
            "payload truncated: header claims {payload_size} bytes, {} available",
            buf.len() - payload_at
        )));
    }

    let payload = &buf[payload_at..payload_at + payload_size as usize];
    Ok((params, payload))
}

// Callers check bounds before reading; slices here are always in range.

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(word)
}

fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(word)
}
