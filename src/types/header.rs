//! File header for .qnah snapshot files.

use std::io::{Read, Write};

use crate::types::error::{QnaError, QnaResult};
use crate::types::{FORMAT_VERSION, QNAH_MAGIC};

/// Header of a .qnah file. Fixed size: 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileHeader {
    /// Magic bytes: [0x51, 0x4E, 0x41, 0x48] ("QNAH").
    pub magic: [u8; 4],
    /// Format version (currently 1).
    pub version: u32,
    /// Number of question records in the payload.
    pub question_count: u64,
    /// Number of viewer records in the payload.
    pub viewer_count: u64,
    /// Length in bytes of the compressed payload following the header.
    pub payload_len: u64,
}

/// The fixed size of a FileHeader on disk: 32 bytes.
pub const HEADER_SIZE: u64 = 32;

impl FileHeader {
    /// Create a new header with default magic and version.
    pub fn new(question_count: u64, viewer_count: u64, payload_len: u64) -> Self {
        Self {
            magic: QNAH_MAGIC,
            version: FORMAT_VERSION,
            question_count,
            viewer_count,
            payload_len,
        }
    }

    /// Write this header to the given writer. Writes exactly 32 bytes.
    ///
    /// Layout (all little-endian):
    /// - 0x00..0x04: magic (4 bytes)
    /// - 0x04..0x08: version (u32, 4 bytes)
    /// - 0x08..0x10: question_count (u64, 8 bytes)
    /// - 0x10..0x18: viewer_count (u64, 8 bytes)
    /// - 0x18..0x20: payload_len (u64, 8 bytes)
    pub fn write_to(&self, writer: &mut impl Write) -> QnaResult<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.question_count.to_le_bytes())?;
        writer.write_all(&self.viewer_count.to_le_bytes())?;
        writer.write_all(&self.payload_len.to_le_bytes())?;
        Ok(())
    }

    /// Read a header from the given reader. Reads exactly 32 bytes.
    pub fn read_from(reader: &mut impl Read) -> QnaResult<Self> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                QnaError::Truncated
            } else {
                QnaError::Io(e)
            }
        })?;

        let magic = [buf[0], buf[1], buf[2], buf[3]];
        if magic != QNAH_MAGIC {
            return Err(QnaError::InvalidMagic);
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != FORMAT_VERSION {
            return Err(QnaError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic,
            version,
            question_count: read_u64(&buf[8..16]),
            viewer_count: read_u64(&buf[16..24]),
            payload_len: read_u64(&buf[24..32]),
        })
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    u64::from_le_bytes(raw)
}
