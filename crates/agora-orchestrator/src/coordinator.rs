use std::collections::HashMap;

use agora_core::{AgoraResult, Message};
use agora_memory::{NewRecord, RecordStore, KIND_CONVERSATION};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::agents::{Agent, AnalysisAgent, MemoryAgent, ResearchAgent};
use crate::knowledge_base::KnowledgeBase;
use crate::types::{AgentContext, AgentKind, AskOutcome, Meta, PlanStep, QueryMode, TraceEntry};

const COMPLEX_MARKERS: &[&str] = &[
    "analyze",
    "compare",
    "trade-off",
    "tradeoffs",
    "identify",
    "recommend",
];
const MEMORY_MARKERS: &[&str] = &["memory", "earlier", "previous", "what did we"];

/// Number of store hits probed when deciding whether to consult memory first.
const MEMORY_PROBE_LIMIT: usize = 2;
const ANALYSIS_TASK: &str = "analyze findings";
const UNKNOWN_AGENT: &str = "Unknown agent.";

/// Routes queries through the agents and records the outcome in memory.
///
/// The coordinator owns the record store. Conversation turns and the
/// execution trace accumulate for the coordinator's whole lifetime.
pub struct Coordinator {
    memory: RecordStore,
    agents: HashMap<AgentKind, Box<dyn Agent>>,
    conversation: Vec<Message>,
    trace: Vec<TraceEntry>,
}

impl Coordinator {
    /// A coordinator with the three built-in agents, research backed by `kb`.
    pub fn new(memory: RecordStore, kb: KnowledgeBase) -> Self {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(ResearchAgent::new(kb)),
            Box::new(AnalysisAgent::new()),
            Box::new(MemoryAgent::new()),
        ];
        Self::with_agents(memory, agents)
    }

    /// A coordinator with an explicit agent set. Later agents of the same
    /// kind replace earlier ones.
    pub fn with_agents(memory: RecordStore, agents: Vec<Box<dyn Agent>>) -> Self {
        let agents = agents.into_iter().map(|a| (a.kind(), a)).collect();
        Self {
            memory,
            agents,
            conversation: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Decide how to handle `query`.
    ///
    /// Complex markers (or any comma) win over memory markers.
    pub fn classify(query: &str) -> QueryMode {
        let lowered = query.to_lowercase();
        if COMPLEX_MARKERS.iter().any(|m| lowered.contains(m)) || query.contains(',') {
            QueryMode::Complex
        } else if MEMORY_MARKERS.iter().any(|m| lowered.contains(m)) {
            QueryMode::Memory
        } else {
            QueryMode::Simple
        }
    }

    /// Build the step list for `query` in `mode`.
    ///
    /// A memory step is prepended whenever the store already returns
    /// anything for the query.
    pub fn plan(&self, query: &str, mode: QueryMode) -> Vec<PlanStep> {
        let mut plan = Vec::new();
        if !self.memory.search(query, MEMORY_PROBE_LIMIT).is_empty() {
            plan.push(PlanStep::new(AgentKind::Memory, query));
        }
        match mode {
            QueryMode::Simple => plan.push(PlanStep::new(AgentKind::Research, query)),
            QueryMode::Complex => {
                plan.push(PlanStep::new(AgentKind::Research, query));
                plan.push(PlanStep::new(AgentKind::Analysis, ANALYSIS_TASK));
            }
            QueryMode::Memory => plan.push(PlanStep::new(AgentKind::Memory, query)),
        }
        plan
    }

    /// Answer `query`: classify, plan, run every step and log the answer.
    ///
    /// The answer is the content of the last executed step. Any persistence
    /// failure aborts the query with the steps run so far left in the trace.
    pub fn ask(&mut self, query: &str) -> AgoraResult<AskOutcome> {
        self.conversation.push(Message::user(query));

        let mode = Self::classify(query);
        let plan = self.plan(query, mode);
        info!(mode = %mode, steps = plan.len(), "Query planned");

        let mut context = AgentContext::default();
        let mut answer = String::new();
        for step in &plan {
            let Some(agent) = self.agents.get(&step.agent) else {
                warn!(agent = %step.agent, "No agent registered for plan step");
                answer = UNKNOWN_AGENT.to_string();
                continue;
            };

            let result = agent.run(&step.task, &mut context, &mut self.memory)?;
            debug!(
                agent = %step.agent,
                confidence = result.confidence,
                "Plan step finished"
            );
            if step.agent == AgentKind::Research {
                context.research_output = Some(result.content.clone());
            }
            self.trace.push(TraceEntry {
                agent: step.agent,
                input: step.task.clone(),
                output: result.content.clone(),
                confidence: result.confidence,
                meta: result.trace,
            });
            answer = result.content;
        }

        let mut metadata = Meta::new();
        metadata.insert(
            "plan".to_string(),
            json!(plan.iter().map(PlanStep::to_json).collect::<Vec<_>>()),
        );
        self.memory.add(
            NewRecord::new(KIND_CONVERSATION, query, answer.clone())
                .with_source("conversation")
                .with_agent("coordinator")
                .with_confidence(0.8)
                .with_metadata(metadata.clone()),
        )?;

        metadata.insert("mode".to_string(), json!(mode.to_string()));
        self.conversation
            .push(Message::system(answer.clone()).with_meta(metadata));

        Ok(AskOutcome {
            answer,
            mode,
            plan,
            trace: self.trace.clone(),
        })
    }

    /// User and system turns in order.
    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    /// Every executed step since the coordinator was created.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn memory(&self) -> &RecordStore {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut RecordStore {
        &mut self.memory
    }
}
