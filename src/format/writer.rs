//! Writes .qnah files from a store snapshot.

use std::io::Write;
use std::path::Path;

use crate::store::{MemoryStore, Snapshot};
use crate::types::error::QnaResult;
use crate::types::header::FileHeader;

use super::compression::compress_payload;

/// Writer for .qnah snapshot files.
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Write the contents of a store to a .qnah file.
    ///
    /// The file is written next to the target and renamed into place, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub fn write_store(store: &MemoryStore, path: &Path) -> QnaResult<()> {
        let snapshot = store.snapshot()?;
        Self::write_to_file(&snapshot, path)
    }

    /// Write a snapshot to a .qnah file.
    pub fn write_to_file(snapshot: &Snapshot, path: &Path) -> QnaResult<()> {
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = std::path::PathBuf::from(tmp_name);

        {
            let file = std::fs::File::create(&tmp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            Self::write_to(snapshot, &mut writer)?;
        }
        std::fs::rename(&tmp_path, path)?;

        log::info!(
            "Saved {} questions and {} viewers to {}",
            snapshot.questions.len(),
            snapshot.viewers.len(),
            path.display()
        );
        Ok(())
    }

    /// Write a snapshot to any writer.
    pub fn write_to(snapshot: &Snapshot, writer: &mut impl Write) -> QnaResult<()> {
        let json = serde_json::to_vec(snapshot)?;
        let payload = compress_payload(&json);

        let header = FileHeader::new(
            snapshot.questions.len() as u64,
            snapshot.viewers.len() as u64,
            payload.len() as u64,
        );
        header.write_to(writer)?;
        writer.write_all(&payload)?;
        writer.flush()?;
        Ok(())
    }
}
