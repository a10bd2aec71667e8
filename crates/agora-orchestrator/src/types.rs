use serde::{Deserialize, Serialize};

/// Trace or metadata payload: an open JSON object.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// The agents a plan can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Looks facts up in the knowledge base.
    Research,
    /// Scores and ranks research findings.
    Analysis,
    /// Searches the record store.
    Memory,
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::Research => write!(f, "research"),
            AgentKind::Analysis => write!(f, "analysis"),
            AgentKind::Memory => write!(f, "memory"),
        }
    }
}

/// How the coordinator decided to handle a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// A plain lookup.
    Simple,
    /// Research followed by analysis.
    Complex,
    /// An explicit question about earlier conversation.
    Memory,
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::Simple => write!(f, "simple"),
            QueryMode::Complex => write!(f, "complex"),
            QueryMode::Memory => write!(f, "memory"),
        }
    }
}

/// One step of a plan: which agent runs, and on what task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub agent: AgentKind,
    pub task: String,
}

impl PlanStep {
    pub fn new(agent: AgentKind, task: impl Into<String>) -> Self {
        Self {
            agent,
            task: task.into(),
        }
    }

    /// `[agent, task]`, the shape stored in conversation metadata.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!([self.agent.to_string(), self.task])
    }
}

impl std::fmt::Display for PlanStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {:?})", self.agent, self.task)
    }
}

/// Working state passed from step to step within one query.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    /// Output of the most recent research step.
    pub research_output: Option<String>,
}

/// What an agent hands back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub content: String,
    pub confidence: f64,
    pub trace: Meta,
}

/// A record of one executed plan step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub agent: AgentKind,
    pub input: String,
    pub output: String,
    pub confidence: f64,
    pub meta: Meta,
}

/// Everything the coordinator produced for one query.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    pub answer: String,
    pub mode: QueryMode,
    pub plan: Vec<PlanStep>,
    /// The coordinator's trace so far, including earlier queries.
    pub trace: Vec<TraceEntry>,
}
