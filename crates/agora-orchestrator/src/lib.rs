//! Query coordinator and mock agents backed by the Agora record store.
//!
//! The [`Coordinator`] classifies a query, plans a short sequence of agent
//! steps, runs them against a shared [`RecordStore`](agora_memory::RecordStore)
//! and logs the final answer back into memory.
//!
//! # Main types
//!
//! - [`Coordinator`] — Routes a query through research, analysis and memory agents.
//! - [`Agent`] — Trait implemented by every agent.
//! - [`ResearchAgent`], [`AnalysisAgent`], [`MemoryAgent`] — The built-in agents.
//! - [`KnowledgeBase`] — Curated topic → facts table consulted by research.
//! - [`AskOutcome`] — Answer, mode, plan and trace of one query.

/// Agent trait and the built-in agents.
pub mod agents;
/// Query classification, planning and execution.
pub mod coordinator;
/// Curated fact table.
pub mod knowledge_base;
/// Canonical demo scenarios and their reports.
pub mod scenarios;
/// Shared orchestration types (AgentKind, PlanStep, TraceEntry, etc.).
pub mod types;

pub use agents::{Agent, AnalysisAgent, MemoryAgent, ResearchAgent};
pub use coordinator::Coordinator;
pub use knowledge_base::KnowledgeBase;
pub use scenarios::{render_plan, render_report, render_trace_entry, run_scenarios, SCENARIOS};
pub use types::{AgentContext, AgentKind, AgentResult, AskOutcome, PlanStep, QueryMode, TraceEntry};
