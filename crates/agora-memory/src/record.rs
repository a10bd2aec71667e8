use serde::{Deserialize, Serialize};

/// Open key-value metadata attached to a record.
///
/// Values are a tagged union (string, number, bool, null, array or nested
/// map), so callers may attach any JSON-shaped data.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Kind used for coordinator conversation logs.
pub const KIND_CONVERSATION: &str = "conversation";
/// Kind used for facts gathered by research.
pub const KIND_KNOWLEDGE: &str = "knowledge";
/// Kind used for agent working state such as analysis results.
pub const KIND_AGENT_STATE: &str = "agent_state";

/// A persisted fact or event.
///
/// `kind` is an open string: the well-known kinds are the `KIND_*`
/// constants, but any value is stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// `"<kind>:<zero-padded sequence>"`, assigned by the store.
    pub id: String,
    pub kind: String,
    pub topic: String,
    pub content: String,
    pub source: String,
    pub agent: String,
    /// Caller-supplied, conventionally in `[0, 1]` but not validated.
    #[serde(with = "confidence_repr")]
    pub confidence: f64,
    pub metadata: Metadata,
}

impl Record {
    /// The text fed to the index and matched by keyword search.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.topic, self.content)
    }
}

/// Input for [`RecordStore::add`](crate::RecordStore::add).
///
/// Everything except `kind`, `topic` and `content` has a default:
/// empty `source`/`agent`, confidence 0.8 and a timestamp-only metadata map.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub kind: String,
    pub topic: String,
    pub content: String,
    pub source: String,
    pub agent: String,
    pub confidence: f64,
    /// `None` (or an empty map) is replaced by `{"ts": <now>}`.
    pub metadata: Option<Metadata>,
}

impl NewRecord {
    /// Start a record of the given kind.
    pub fn new(
        kind: impl Into<String>,
        topic: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            topic: topic.into(),
            content: content.into(),
            source: String::new(),
            agent: String::new(),
            confidence: 0.8,
            metadata: None,
        }
    }

    /// Set the provenance source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the authoring agent label.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    /// Set the confidence. Not range-checked.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Confidence as a JSON number, or as `"NaN"`, `"Infinity"` or
/// `"-Infinity"` when it is not finite. JSON has no literal for those, and
/// writing `null` would make the snapshot unloadable.
mod confidence_repr {
    use std::fmt;

    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(ConfidenceVisitor)
    }

    struct ConfidenceVisitor;

    impl Visitor<'_> for ConfidenceVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(E::invalid_value(Unexpected::Str(other), &self)),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let draft = NewRecord::new(KIND_KNOWLEDGE, "topic", "content");
        assert_eq!(draft.kind, "knowledge");
        assert!(draft.source.is_empty());
        assert!(draft.agent.is_empty());
        assert_eq!(draft.confidence, 0.8);
        assert!(draft.metadata.is_none());
    }

    #[test]
    fn test_record_deserialize_requires_every_field() {
        let json = serde_json::json!({
            "id": "knowledge:000001",
            "kind": "knowledge",
            "topic": "t",
            "content": "c",
            "source": "s",
            "agent": "a",
            "metadata": {}
        });
        let err = serde_json::from_value::<Record>(json).unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn test_record_accepts_integer_confidence() {
        let json = serde_json::json!({
            "id": "custom:000001",
            "kind": "custom",
            "topic": "t",
            "content": "c",
            "source": "s",
            "agent": "a",
            "confidence": 1,
            "metadata": {"nested": {"k": [1, true, null]}}
        });
        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.kind, "custom");
        assert_eq!(record.searchable_text(), "t c");
    }

    fn with_confidence(confidence: f64) -> Record {
        Record {
            id: "knowledge:000001".to_string(),
            kind: KIND_KNOWLEDGE.to_string(),
            topic: "t".to_string(),
            content: "c".to_string(),
            source: String::new(),
            agent: String::new(),
            confidence,
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_non_finite_confidence_is_written_as_string() {
        for (value, text) in [
            (f64::NAN, "NaN"),
            (f64::INFINITY, "Infinity"),
            (f64::NEG_INFINITY, "-Infinity"),
        ] {
            let json = serde_json::to_value(with_confidence(value)).unwrap();
            assert_eq!(json["confidence"], serde_json::json!(text));
        }
        let json = serde_json::to_value(with_confidence(0.75)).unwrap();
        assert_eq!(json["confidence"], serde_json::json!(0.75));
    }

    #[test]
    fn test_confidence_rejects_null_and_unknown_strings() {
        let mut json = serde_json::to_value(with_confidence(0.5)).unwrap();
        json["confidence"] = serde_json::Value::Null;
        assert!(serde_json::from_value::<Record>(json.clone()).is_err());

        json["confidence"] = serde_json::json!("high");
        let err = serde_json::from_value::<Record>(json).unwrap_err();
        assert!(err.to_string().contains("high"), "{err}");
    }
}
