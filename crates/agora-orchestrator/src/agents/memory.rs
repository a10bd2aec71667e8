use agora_core::AgoraResult;
use agora_memory::{Record, RecordStore};
use serde_json::json;

use super::Agent;
use crate::types::{AgentContext, AgentKind, AgentResult, Meta};

const SEARCH_LIMIT: usize = 5;
const PREVIEW_CHARS: usize = 120;

/// Recall from the record store. Read-only.
#[derive(Debug, Default)]
pub struct MemoryAgent;

impl MemoryAgent {
    pub fn new() -> Self {
        Self
    }
}

/// `[kind] topic :: <content preview>... (by agent, conf=x.xx)`
pub fn describe_hit(record: &Record) -> String {
    let preview: String = record.content.chars().take(PREVIEW_CHARS).collect();
    format!(
        "[{}] {} :: {}... (by {}, conf={:.2})",
        record.kind,
        record.topic,
        preview.trim(),
        record.agent,
        record.confidence
    )
}

impl Agent for MemoryAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Memory
    }

    fn run(
        &self,
        task: &str,
        _context: &mut AgentContext,
        memory: &mut RecordStore,
    ) -> AgoraResult<AgentResult> {
        let hits = memory.search(task, SEARCH_LIMIT);
        let (content, confidence) = if hits.is_empty() {
            ("No relevant memory found.".to_string(), 0.3)
        } else {
            let lines: Vec<String> = hits.iter().map(|r| describe_hit(r)).collect();
            (lines.join("\n"), 0.7)
        };

        let mut trace = Meta::new();
        trace.insert("query".to_string(), json!(task));
        trace.insert("results".to_string(), json!(hits.len()));

        Ok(AgentResult {
            content,
            confidence,
            trace,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use agora_memory::{NewRecord, KIND_KNOWLEDGE};

    #[test]
    fn test_empty_memory() {
        let mut memory = RecordStore::in_memory();
        let result = MemoryAgent::new()
            .run("anything", &mut AgentContext::default(), &mut memory)
            .unwrap();
        assert_eq!(result.content, "No relevant memory found.");
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.trace["results"], json!(0));
        assert_eq!(result.trace["query"], json!("anything"));
    }

    #[test]
    fn test_hits_are_described_and_nothing_is_written() {
        let mut memory = RecordStore::in_memory();
        memory
            .add(
                NewRecord::new(KIND_KNOWLEDGE, "transformers", "  Self-attention everywhere.  ")
                    .with_agent("research")
                    .with_confidence(0.75),
            )
            .unwrap();

        let result = MemoryAgent::new()
            .run("transformers", &mut AgentContext::default(), &mut memory)
            .unwrap();
        assert_eq!(
            result.content,
            "[knowledge] transformers :: Self-attention everywhere.... (by research, conf=0.75)"
        );
        assert_eq!(result.confidence, 0.7);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let record = Record {
            id: "knowledge:000001".to_string(),
            kind: "knowledge".to_string(),
            topic: "t".to_string(),
            content: "é".repeat(200),
            source: String::new(),
            agent: "a".to_string(),
            confidence: 0.5,
            metadata: Default::default(),
        };
        let line = describe_hit(&record);
        assert!(line.contains(&format!("{}...", "é".repeat(120))));
    }
}
