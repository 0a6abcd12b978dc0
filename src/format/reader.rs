//! Reads .qnah files into a store.

use std::io::Read;
use std::path::Path;

use crate::store::{MemoryStore, Snapshot};
use crate::types::error::{QnaError, QnaResult};
use crate::types::header::{FileHeader, HEADER_SIZE};

use super::compression::decompress_payload;

/// Reader for .qnah snapshot files.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read a .qnah file into a new MemoryStore.
    pub fn read_store(path: &Path) -> QnaResult<MemoryStore> {
        let snapshot = Self::read_from_file(path)?;
        log::info!(
            "Loaded {} questions and {} viewers from {}",
            snapshot.questions.len(),
            snapshot.viewers.len(),
            path.display()
        );
        MemoryStore::from_snapshot(snapshot)
    }

    /// Read a .qnah file into a Snapshot.
    pub fn read_from_file(path: &Path) -> QnaResult<Snapshot> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Read from any reader into a Snapshot.
    pub fn read_from(reader: &mut impl Read) -> QnaResult<Snapshot> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        if data.len() < HEADER_SIZE as usize {
            return Err(QnaError::Truncated);
        }
        let mut header_bytes = &data[..HEADER_SIZE as usize];
        let header = FileHeader::read_from(&mut header_bytes)?;

        let payload = &data[HEADER_SIZE as usize..];
        if (payload.len() as u64) < header.payload_len {
            return Err(QnaError::Truncated);
        }
        let json = decompress_payload(&payload[..header.payload_len as usize])?;
        let snapshot: Snapshot = serde_json::from_slice(&json)?;

        if snapshot.questions.len() as u64 != header.question_count
            || snapshot.viewers.len() as u64 != header.viewer_count
        {
            return Err(QnaError::Corrupt(format!(
                "record counts do not match header: {} questions / {} viewers, header says {} / {}",
                snapshot.questions.len(),
                snapshot.viewers.len(),
                header.question_count,
                header.viewer_count
            )));
        }

        Ok(snapshot)
    }
}
