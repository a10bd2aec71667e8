use agora_core::AgoraResult;
use agora_memory::RecordStore;

use crate::types::{AgentContext, AgentKind, AgentResult};

/// Scores and ranks research findings.
pub mod analysis;
/// Searches the record store.
pub mod memory;
/// Looks facts up in the knowledge base.
pub mod research;

pub use analysis::AnalysisAgent;
pub use memory::MemoryAgent;
pub use research::ResearchAgent;

/// A worker the coordinator can route a plan step to.
///
/// Agents are stateless between calls; whatever they learn goes into the
/// record store they are handed.
pub trait Agent: Send {
    /// Which plan steps this agent serves.
    fn kind(&self) -> AgentKind;

    /// Run one task, reading and extending `context` and `memory`.
    fn run(
        &self,
        task: &str,
        context: &mut AgentContext,
        memory: &mut RecordStore,
    ) -> AgoraResult<AgentResult>;
}
