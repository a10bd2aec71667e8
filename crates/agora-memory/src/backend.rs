use std::collections::HashSet;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use agora_core::{AgoraError, AgoraResult};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::record::Record;

/// Durable storage for full record snapshots.
///
/// A backend only ever sees whole snapshots: `save` replaces whatever was
/// stored before, and `load` returns records in the order they were saved.
pub trait RecordBackend: Send {
    /// Load the last saved snapshot, or `None` if nothing was ever saved.
    fn load(&mut self) -> AgoraResult<Option<Vec<Record>>>;

    /// Replace the stored snapshot with `records`.
    fn save(&mut self, records: &[Record]) -> AgoraResult<()>;

    /// Where the snapshot lives on disk, if anywhere.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Backend that keeps the snapshot in process memory only.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    snapshot: Option<Vec<Record>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordBackend for InMemoryBackend {
    fn load(&mut self) -> AgoraResult<Option<Vec<Record>>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, records: &[Record]) -> AgoraResult<()> {
        self.snapshot = Some(records.to_vec());
        Ok(())
    }
}

/// Backend that stores the snapshot as one pretty-printed JSON document
/// mapping each record id to the record.
///
/// Saves write a sibling `.tmp` file and rename it over the snapshot, so an
/// interrupted save leaves the previous snapshot readable.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for `path`, creating its parent directory if needed.
    pub fn new(path: impl Into<PathBuf>) -> AgoraResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AgoraError::Storage(format!(
                        "Failed to create data dir {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        Ok(Self { path })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl RecordBackend for JsonFileBackend {
    fn load(&mut self) -> AgoraResult<Option<Vec<Record>>> {
        let exists = self.path.try_exists().map_err(|e| {
            AgoraError::Storage(format!("Failed to stat {}: {e}", self.path.display()))
        })?;
        if !exists {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path).map_err(|e| {
            AgoraError::Storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        decode_snapshot(&data).map(Some)
    }

    fn save(&mut self, records: &[Record]) -> AgoraResult<()> {
        let data = encode_snapshot(records)?;
        let tmp_path = self.tmp_path();

        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        if let Err(e) = write() {
            // Best effort.
            let _ = fs::remove_file(&tmp_path);
            return Err(AgoraError::Storage(format!(
                "Failed to write {}: {e}",
                self.path.display()
            )));
        }

        debug!(
            path = %self.path.display(),
            records = records.len(),
            bytes = data.len(),
            "Snapshot persisted"
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Serialize records as a JSON object keyed by id, in slice order.
pub fn encode_snapshot(records: &[Record]) -> AgoraResult<String> {
    Ok(serde_json::to_string_pretty(&SnapshotRef(records))?)
}

/// Parse a snapshot document back into records, preserving document order.
///
/// A document that is not a JSON object is a storage failure. An entry that
/// is not a complete record, whose `id` differs from its key, or whose key
/// repeats is a malformed record. Either fails the whole load.
pub fn decode_snapshot(data: &str) -> AgoraResult<Vec<Record>> {
    let raw: RawSnapshot = serde_json::from_str(data)
        .map_err(|e| AgoraError::Storage(format!("Corrupt snapshot: {e}")))?;

    let mut seen = HashSet::with_capacity(raw.0.len());
    let mut records = Vec::with_capacity(raw.0.len());
    for (key, value) in raw.0 {
        let record: Record =
            serde_json::from_value(value).map_err(|e| AgoraError::MalformedRecord {
                id: key.clone(),
                reason: e.to_string(),
            })?;
        if record.id != key {
            return Err(AgoraError::MalformedRecord {
                reason: format!("stored under a different id '{}'", record.id),
                id: key,
            });
        }
        if !seen.insert(key.clone()) {
            return Err(AgoraError::MalformedRecord {
                id: key,
                reason: "duplicate id".to_string(),
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// Borrowed view serializing as an id -> record map.
struct SnapshotRef<'a>(&'a [Record]);

impl Serialize for SnapshotRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|r| (&r.id, r)))
    }
}

/// Top-level snapshot entries in document order, values not yet validated.
struct RawSnapshot(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of record id to record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawSnapshot, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawSnapshot(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
