//! Persistent structured memory with hybrid keyword + TF-IDF search.
//!
//! Records are appended to a [`RecordStore`], which keeps a [`VectorIndex`]
//! in lockstep with its contents and rewrites a full snapshot through a
//! [`RecordBackend`] after every insert. The index itself is never
//! persisted; it is rebuilt by replaying records on load.
//!
//! # Main types
//!
//! - [`RecordStore`] — Append-only record store with hybrid search.
//! - [`VectorIndex`] — Incremental term-frequency index with live IDF weighting.
//! - [`Record`] / [`NewRecord`] — A stored fact and the input used to create one.
//! - [`RecordBackend`] — Durable snapshot storage ([`JsonFileBackend`], [`InMemoryBackend`]).
//! - [`tokenize`] — Lowercase alphanumeric tokenizer shared by the index.

/// Snapshot storage backends and the snapshot document codec.
pub mod backend;
/// Incremental TF-IDF vector index.
pub mod index;
/// Record model.
pub mod record;
/// Append-only record store with hybrid search.
pub mod store;
/// Text tokenizer.
pub mod tokenizer;

pub use backend::{InMemoryBackend, JsonFileBackend, RecordBackend};
pub use index::VectorIndex;
pub use record::{
    Metadata, NewRecord, Record, KIND_AGENT_STATE, KIND_CONVERSATION, KIND_KNOWLEDGE,
};
pub use store::{RecordStore, DEFAULT_SEARCH_LIMIT};
pub use tokenizer::tokenize;
