use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use agora_core::{now_ts, AgoraResult};
use tracing::{error, info};

use crate::backend::{InMemoryBackend, JsonFileBackend, RecordBackend};
use crate::index::VectorIndex;
use crate::record::{Metadata, NewRecord, Record};

/// Result limit used when callers have no preference.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Append-only record store with hybrid keyword + vector search.
///
/// Every record is indexed the moment it is inserted, and the full snapshot
/// is written through the backend before `add` returns. Records cannot be
/// updated or removed; the store only hands out shared references.
///
/// There is no locking of any kind: one store instance per snapshot file.
pub struct RecordStore {
    /// Records in insertion order.
    records: Vec<Record>,
    /// id -> position in `records`
    positions: HashMap<String, usize>,
    index: VectorIndex,
    /// Last sequence number handed out. Global across kinds.
    sequence: usize,
    backend: Box<dyn RecordBackend>,
}

impl RecordStore {
    /// Open the JSON snapshot at `path`, creating an empty one if absent.
    pub fn open(path: impl Into<PathBuf>) -> AgoraResult<Self> {
        Self::with_backend(Box::new(JsonFileBackend::new(path)?))
    }

    /// A store with no durable storage behind it.
    pub fn in_memory() -> Self {
        Self::empty(Box::new(InMemoryBackend::new()))
    }

    /// Load state from `backend`, rebuilding the index by replaying every
    /// record in stored order.
    ///
    /// If the backend holds no snapshot yet, an empty one is saved right away.
    pub fn with_backend(mut backend: Box<dyn RecordBackend>) -> AgoraResult<Self> {
        let loaded = backend.load()?;
        let mut store = Self::empty(backend);

        match loaded {
            Some(records) => {
                for record in records {
                    store.insert(record);
                }
                store.sequence = store.records.len();
            }
            None => store.backend.save(&store.records)?,
        }

        info!(
            records = store.records.len(),
            path = ?store.backend.location(),
            "Record store opened"
        );
        Ok(store)
    }

    fn empty(backend: Box<dyn RecordBackend>) -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
            index: VectorIndex::new(),
            sequence: 0,
            backend,
        }
    }

    /// Append a record and persist the full snapshot.
    ///
    /// The id is `"{kind}:{seq:06}"` where `seq` counts every record in the
    /// store, whatever its kind. If persisting fails the error is returned
    /// but the record stays in memory and in the index.
    pub fn add(&mut self, draft: NewRecord) -> AgoraResult<Record> {
        let id = self.next_id(&draft.kind);
        let metadata = match draft.metadata {
            Some(metadata) if !metadata.is_empty() => metadata,
            _ => default_metadata(),
        };

        let record = Record {
            id,
            kind: draft.kind,
            topic: draft.topic,
            content: draft.content,
            source: draft.source,
            agent: draft.agent,
            confidence: draft.confidence,
            metadata,
        };
        self.insert(record.clone());

        if let Err(e) = self.backend.save(&self.records) {
            error!(id = %record.id, error = %e, "Failed to persist record store");
            return Err(e);
        }
        Ok(record)
    }

    /// Hybrid search: vector-ranked matches first, then keyword matches in
    /// insertion order, deduplicated by id and cut to `limit`.
    ///
    /// A record is a keyword match when every whitespace-separated word of
    /// the lowercased query occurs as a substring of its lowercased
    /// `"{topic} {content}"`. Words are not tokenized, so `"an"` matches
    /// inside `"and"`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Record> {
        let ranked = self
            .index
            .search(query, limit)
            .into_iter()
            .filter_map(|(id, _score)| self.get(&id));

        let mut seen = HashSet::new();
        ranked
            .chain(self.keyword_matches(query))
            .filter(|&record| seen.insert(record.id.as_str()))
            .take(limit)
            .collect()
    }

    fn keyword_matches(&self, query: &str) -> Vec<&Record> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();
        self.records
            .iter()
            .filter(|record| {
                let blob = record.searchable_text().to_lowercase();
                words.iter().all(|word| blob.contains(word))
            })
            .collect()
    }

    /// Every record, in insertion order.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the index.
    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Snapshot location, if the backend is file-based.
    pub fn path(&self) -> Option<&Path> {
        self.backend.location()
    }

    /// Store `record` and index it. Records and index always move together.
    fn insert(&mut self, record: Record) {
        self.index.add(&record.id, &record.searchable_text());
        self.positions.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    fn next_id(&mut self, kind: &str) -> String {
        loop {
            self.sequence += 1;
            let id = format!("{kind}:{:06}", self.sequence);
            // Only reachable with a hand-edited snapshot.
            if !self.positions.contains_key(&id) {
                return id;
            }
        }
    }
}

fn default_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("ts".to_string(), serde_json::Value::String(now_ts()));
    metadata
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::record::{KIND_AGENT_STATE, KIND_CONVERSATION, KIND_KNOWLEDGE};
    use agora_core::AgoraError;

    fn knowledge(topic: &str, content: &str) -> NewRecord {
        NewRecord::new(KIND_KNOWLEDGE, topic, content)
            .with_source("mock_kb")
            .with_agent("research")
    }

    /// Backend whose saves can be switched to fail.
    struct FlakyBackend {
        fail: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl RecordBackend for FlakyBackend {
        fn load(&mut self) -> AgoraResult<Option<Vec<Record>>> {
            Ok(None)
        }

        fn save(&mut self, _records: &[Record]) -> AgoraResult<()> {
            if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
                Err(AgoraError::Storage("disk full".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_ids_use_global_sequence() {
        let mut store = RecordStore::in_memory();
        let a = store.add(knowledge("a", "one")).unwrap();
        let b = store
            .add(NewRecord::new(KIND_CONVERSATION, "b", "two"))
            .unwrap();
        let c = store
            .add(NewRecord::new(KIND_AGENT_STATE, "c", "three"))
            .unwrap();
        assert_eq!(a.id, "knowledge:000001");
        assert_eq!(b.id, "conversation:000002");
        assert_eq!(c.id, "agent_state:000003");
    }

    #[test]
    fn test_unknown_kind_and_odd_values_accepted() {
        let mut store = RecordStore::in_memory();
        let record = store
            .add(NewRecord::new("scratchpad", "", "").with_confidence(7.5))
            .unwrap();
        assert_eq!(record.id, "scratchpad:000001");
        assert_eq!(record.confidence, 7.5);
    }

    #[test]
    fn test_default_metadata_has_timestamp() {
        let mut store = RecordStore::in_memory();
        let record = store.add(knowledge("t", "c")).unwrap();
        assert_eq!(record.metadata.len(), 1);
        assert!(record.metadata["ts"].as_str().unwrap().ends_with('Z'));

        let empty = store
            .add(knowledge("t", "c").with_metadata(Metadata::new()))
            .unwrap();
        assert!(empty.metadata.contains_key("ts"));

        let mut custom = Metadata::new();
        custom.insert("facts_count".to_string(), serde_json::json!(5));
        let kept = store.add(knowledge("t", "c").with_metadata(custom.clone())).unwrap();
        assert_eq!(kept.metadata, custom);
    }

    #[test]
    fn test_records_and_index_stay_in_lockstep() {
        let mut store = RecordStore::in_memory();
        for i in 0..4 {
            store.add(knowledge(&format!("topic {i}"), "body")).unwrap();
        }
        assert_eq!(store.index().document_count(), store.len());
        for record in store.all() {
            assert!(store.index().contains(&record.id));
        }
    }

    #[test]
    fn test_search_empty_store() {
        let store = RecordStore::in_memory();
        assert!(store.search("anything", 5).is_empty());
    }

    #[test]
    fn test_keyword_match_is_substring_based() {
        let mut store = RecordStore::in_memory();
        store.add(knowledge("cats", "cats and dogs")).unwrap();
        store.add(knowledge("birds", "sparrows")).unwrap();

        let hits = store.keyword_matches("AN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic, "cats");

        // Conjunctive: both words must appear.
        assert!(store.keyword_matches("cats sparrows").is_empty());
    }

    #[test]
    fn test_search_ranks_matches_before_zero_scores() {
        let mut store = RecordStore::in_memory();
        store.add(knowledge("cooking", "a cake recipe")).unwrap();
        store
            .add(knowledge("transformers", "Transformers use self-attention."))
            .unwrap();
        store.add(knowledge("attentive", "attentiveness matters")).unwrap();

        let results = store.search("attention", 3);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["knowledge:000002", "knowledge:000001", "knowledge:000003"]
        );
    }

    #[test]
    fn test_search_deduplicates_keeping_vector_rank() {
        let mut store = RecordStore::in_memory();
        store.add(knowledge("optimizers", "adam converges fast")).unwrap();
        store.add(knowledge("networks", "cnn rnn")).unwrap();

        let results = store.search("adam", 5);
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["knowledge:000001", "knowledge:000002"]);
    }

    #[test]
    fn test_search_never_exceeds_limit() {
        let mut store = RecordStore::in_memory();
        store.add(knowledge("one", "shared")).unwrap();
        store.add(knowledge("two", "shared")).unwrap();
        store.add(knowledge("three", "shared")).unwrap();

        assert_eq!(store.search("shared", 2).len(), 2);
        assert_eq!(store.search("shared", 10).len(), 3);
        assert!(store.search("shared", 0).is_empty());
    }

    #[test]
    fn test_get_and_all() {
        let mut store = RecordStore::in_memory();
        assert!(store.is_empty());
        let record = store.add(knowledge("t", "c")).unwrap();
        assert_eq!(store.get(&record.id), Some(&record));
        assert!(store.get("knowledge:999999").is_none());
        assert_eq!(store.all(), std::slice::from_ref(&record));
        assert!(store.path().is_none());
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_record() {
        let fail = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let backend = FlakyBackend { fail: fail.clone() };
        let mut store = RecordStore::with_backend(Box::new(backend)).unwrap();

        store.add(knowledge("first", "ok")).unwrap();
        fail.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = store.add(knowledge("second", "lost on disk")).unwrap_err();
        assert!(err.is_io_failure());

        assert_eq!(store.len(), 2);
        assert!(store.index().contains("knowledge:000002"));
        assert_eq!(store.search("second", 1)[0].id, "knowledge:000002");

        // The sequence is not reused after a failed save.
        fail.store(false, std::sync::atomic::Ordering::SeqCst);
        let third = store.add(knowledge("third", "ok")).unwrap();
        assert_eq!(third.id, "knowledge:000003");
    }

    #[test]
    fn test_next_id_skips_taken_ids() {
        let mut backend = InMemoryBackend::new();
        let mut stray = knowledge_record("knowledge:000002");
        stray.topic = "hand edited".to_string();
        backend.save(&[stray]).unwrap();

        let mut store = RecordStore::with_backend(Box::new(backend)).unwrap();
        let added = store.add(knowledge("t", "c")).unwrap();
        assert_eq!(added.id, "knowledge:000003");
    }

    fn knowledge_record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            kind: KIND_KNOWLEDGE.to_string(),
            topic: String::new(),
            content: String::new(),
            source: String::new(),
            agent: String::new(),
            confidence: 0.8,
            metadata: Metadata::new(),
        }
    }
}
