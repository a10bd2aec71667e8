use agora_core::AgoraResult;
use agora_memory::{NewRecord, RecordStore, KIND_AGENT_STATE};
use serde_json::json;
use tracing::debug;

use super::Agent;
use crate::types::{AgentContext, AgentKind, AgentResult, Meta};

/// Keyword -> bonus, matched as case-insensitive substrings.
const KEYWORD_WEIGHTS: &[(&str, f64)] = &[
    ("efficient", 2.0),
    ("converge", 2.0),
    ("robust", 2.0),
    ("scalable", 2.0),
    ("memory", 1.0),
    ("compute", 1.0),
    ("simple", 1.0),
    ("state-of-the-art", 3.0),
];

const TOP_FINDINGS: usize = 5;
const NO_RECOMMENDATION: &str = "Insufficient data for recommendation.";

/// Heuristic ranking of the latest research output.
///
/// Each non-blank research line is a finding scored by keyword bonuses plus
/// a small length term. The best five are listed and the top one becomes
/// the recommendation.
#[derive(Debug, Default)]
pub struct AnalysisAgent;

impl AnalysisAgent {
    pub fn new() -> Self {
        Self
    }

    /// `(finding, score)` in descending score order; ties keep input order.
    pub fn rank(research_output: &str) -> Vec<(String, f64)> {
        let mut scored: Vec<(String, f64)> = Vec::new();
        for line in research_output.lines().filter(|l| !l.trim().is_empty()) {
            let finding = line
                .trim_matches(|c| c == '-' || c == ' ')
                .trim()
                .to_string();
            let score = score_finding(&finding);
            match scored.iter_mut().find(|entry| entry.0 == finding) {
                Some(entry) => entry.1 = score,
                None => scored.push((finding, score)),
            }
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}

fn score_finding(finding: &str) -> f64 {
    let lowered = finding.to_lowercase();
    let bonus: f64 = KEYWORD_WEIGHTS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, weight)| weight)
        .sum();
    1.0 + bonus + finding.split_whitespace().count() as f64 / 20.0
}

impl Agent for AnalysisAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Analysis
    }

    fn run(
        &self,
        task: &str,
        context: &mut AgentContext,
        memory: &mut RecordStore,
    ) -> AgoraResult<AgentResult> {
        let ranked = Self::rank(context.research_output.as_deref().unwrap_or(""));

        let summary: Vec<String> = ranked
            .iter()
            .take(TOP_FINDINGS)
            .enumerate()
            .map(|(i, (finding, score))| format!("{}. {finding} (score={score:.2})", i + 1))
            .collect();
        let recommendation = ranked
            .first()
            .map(|(finding, _)| finding.as_str())
            .unwrap_or(NO_RECOMMENDATION);
        let confidence = 0.6 + f64::min(0.3, ranked.len() as f64 / 20.0);
        let content = format!(
            "Top findings:\n{}\n\nRecommendation: {recommendation}",
            summary.join("\n")
        );
        debug!(scored = ranked.len(), confidence, "Analysis: findings ranked");

        let mut metadata = Meta::new();
        metadata.insert("based_on".to_string(), json!(task));
        memory.add(
            NewRecord::new(KIND_AGENT_STATE, "analysis_result", content.clone())
                .with_source("analysis")
                .with_agent(AgentKind::Analysis.to_string())
                .with_confidence(confidence)
                .with_metadata(metadata),
        )?;

        let mut trace = Meta::new();
        trace.insert("scored_items".to_string(), json!(ranked.len()));

        Ok(AgentResult {
            content,
            confidence,
            trace,
        })
    }
}
