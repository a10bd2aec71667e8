use agora_core::AgoraResult;
use agora_memory::{NewRecord, RecordStore, KIND_KNOWLEDGE};
use serde_json::json;
use tracing::debug;

use super::Agent;
use crate::knowledge_base::KnowledgeBase;
use crate::types::{AgentContext, AgentKind, AgentResult, Meta};

const NO_FACTS: &str = "No direct facts found; consider broadening the query.";

/// Simulated web search over a [`KnowledgeBase`].
///
/// A topic matches when any whitespace-separated word of the task occurs
/// inside the topic name or inside its facts (case-insensitive substring).
/// All facts of every matching topic are returned and logged as knowledge.
pub struct ResearchAgent {
    knowledge_base: KnowledgeBase,
}

impl ResearchAgent {
    pub fn new(knowledge_base: KnowledgeBase) -> Self {
        Self { knowledge_base }
    }

    fn lookup(&self, task: &str) -> Vec<String> {
        let query = task.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();

        let mut hits = Vec::new();
        for (topic, facts) in self.knowledge_base.iter() {
            let topic = topic.to_lowercase();
            let body = facts.join(" ").to_lowercase();
            let matched = words.iter().any(|w| topic.contains(w))
                || words.iter().any(|w| body.contains(w));
            if matched {
                hits.extend(facts.iter().cloned());
            }
        }
        hits
    }
}

impl Agent for ResearchAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Research
    }

    fn run(
        &self,
        task: &str,
        _context: &mut AgentContext,
        memory: &mut RecordStore,
    ) -> AgoraResult<AgentResult> {
        let mut hits = self.lookup(task);
        let confidence = if hits.is_empty() {
            hits.push(NO_FACTS.to_string());
            0.4
        } else if hits.len() <= 5 {
            0.75
        } else {
            0.65
        };
        debug!(task = %task, hits = hits.len(), "Research: lookup done");

        let content = hits
            .iter()
            .map(|h| format!("- {h}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut metadata = Meta::new();
        metadata.insert("facts_count".to_string(), json!(hits.len()));
        memory.add(
            NewRecord::new(KIND_KNOWLEDGE, task, content.clone())
                .with_source("mock_kb")
                .with_agent(AgentKind::Research.to_string())
                .with_confidence(confidence)
                .with_metadata(metadata),
        )?;

        let mut trace = Meta::new();
        trace.insert("task".to_string(), json!(task));
        trace.insert("hits".to_string(), json!(hits.len()));

        Ok(AgentResult {
            content,
            confidence,
            trace,
        })
    }
}
