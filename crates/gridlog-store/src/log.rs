use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::chain::ChainFile;
use crate::config::SyncMode;
use crate::error::{StoreError, StoreResult};

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Append-only log of chain entries.
///
/// One framed entry per appended link, oldest first:
///
/// ```text
/// [4 bytes: entry length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized ChainFile)]
/// ```
///
/// Recovery reads the file front-to-back and stops at the first torn or
/// corrupt entry, keeping the valid prefix. The store is single-writer by
/// design, so the writer takes `&mut self` and holds no lock.
pub struct ChainLog {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Current write offset in the log file.
    offset: u64,
    sync_mode: SyncMode,
}

impl ChainLog {
    /// Open (or create) the log file at the given path.
    pub fn open(path: &Path, sync_mode: SyncMode) -> StoreResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let offset = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            offset,
            sync_mode,
        })
    }

    /// Append a single entry. Returns the byte offset of the entry.
    pub fn append(&mut self, entry: &ChainFile) -> StoreResult<u64> {
        let payload =
            bincode::serialize(entry).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        let entry_offset = self.offset;
        self.writer.write_all(&length.to_le_bytes())?;
        self.writer.write_all(&crc.to_le_bytes())?;
        self.writer.write_all(&payload)?;
        self.writer.flush()?;
        if self.sync_mode == SyncMode::EveryWrite {
            self.writer.get_ref().sync_all()?;
        }

        self.offset += (HEADER_SIZE + payload.len()) as u64;
        debug!(offset = entry_offset, len = payload.len(), "chain log append");
        Ok(entry_offset)
    }

    /// Read all recoverable entries from a log file, oldest first.
    ///
    /// A missing log is an empty chain. Soft corruption (a torn tail, a
    /// CRC mismatch, an undecodable entry, an unreadable file) ends
    /// recovery at the last valid entry and is reported through a `warn`
    /// diagnostic, never an error.
    pub fn recover(path: &Path) -> Vec<ChainFile> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chain log unreadable; starting empty");
                return Vec::new();
            }
        };

        let file_len = match file.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chain log unreadable; starting empty");
                return Vec::new();
            }
        };

        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut offset: u64 = 0;

        while offset + HEADER_SIZE as u64 <= file_len {
            if let Err(e) = reader.seek(SeekFrom::Start(offset)) {
                warn!(offset, error = %e, "chain log seek failed; stopping recovery");
                break;
            }

            let mut header = [0u8; HEADER_SIZE];
            match reader.read_exact(&mut header) {
                Ok(()) => {}
                Err(e) => {
                    warn!(offset, error = %e, "torn chain log header; stopping recovery");
                    break;
                }
            }

            let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            if length == 0 || offset + (HEADER_SIZE as u64) + (length as u64) > file_len {
                warn!(offset, length, file_len, "invalid entry length; stopping recovery");
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match reader.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) => {
                    warn!(offset, error = %e, "torn chain log entry; stopping recovery");
                    break;
                }
            }

            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                warn!(
                    offset,
                    expected = expected_crc,
                    actual = actual_crc,
                    "CRC mismatch; stopping recovery"
                );
                break;
            }

            match bincode::deserialize::<ChainFile>(&payload) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(offset, error = %e, "undecodable entry; stopping recovery");
                    break;
                }
            }

            offset += (HEADER_SIZE + length as usize) as u64;
        }

        debug!(recovered = entries.len(), "chain log recovery complete");
        entries
    }

    /// Truncate the log to empty.
    pub fn truncate(&mut self) -> StoreResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        if self.sync_mode == SyncMode::EveryWrite {
            file.sync_all()?;
        }

        // Reopen in append mode so subsequent writes go through cleanly.
        let file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        self.offset = 0;
        debug!("chain log truncated");
        Ok(())
    }

    /// Current write offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
