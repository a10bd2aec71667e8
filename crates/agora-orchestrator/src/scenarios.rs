use std::fs;
use std::path::Path;

use agora_core::AgoraResult;
use tracing::info;

use crate::coordinator::Coordinator;
use crate::types::{AskOutcome, PlanStep, TraceEntry};

/// `(report file name, prompt)` for each canonical demo scenario, in run order.
pub const SCENARIOS: &[(&str, &str)] = &[
    (
        "simple_query.txt",
        "What are the main types of neural networks?",
    ),
    (
        "complex_query.txt",
        "Research transformer architectures, analyze their computational efficiency, and summarize key trade-offs.",
    ),
    (
        "memory_test.txt",
        "What did we discuss about neural networks earlier?",
    ),
    (
        "multi_step.txt",
        "Find recent papers on reinforcement learning, analyze their methodologies, and identify common challenges.",
    ),
    (
        "collaborative.txt",
        "Compare two machine-learning approaches and recommend which is better for our use case.",
    ),
];

/// `[(agent, "task"), ...]`
pub fn render_plan(plan: &[PlanStep]) -> String {
    let steps: Vec<String> = plan.iter().map(ToString::to_string).collect();
    format!("[{}]", steps.join(", "))
}

/// One trace line; `separator` sits between the confidence and the meta.
pub fn render_trace_entry(entry: &TraceEntry, separator: &str) -> String {
    format!(
        "- {} (conf={:.2}){separator}{}",
        entry.agent,
        entry.confidence,
        serde_json::Value::Object(entry.meta.clone())
    )
}

/// The text written to a scenario report file.
pub fn render_report(prompt: &str, outcome: &AskOutcome) -> String {
    let mut parts = vec![
        format!("PROMPT: {prompt}\n"),
        format!("ANSWER:\n{}\n", outcome.answer),
        format!("MODE: {}\n", outcome.mode),
        format!("PLAN: {}\n", render_plan(&outcome.plan)),
        "TRACE:\n".to_string(),
    ];
    parts.extend(
        outcome
            .trace
            .iter()
            .map(|entry| render_trace_entry(entry, " meta=")),
    );
    parts.join("\n")
}

/// Run every scenario through `coordinator` in order and write one report
/// per scenario into `out_dir`, creating it if needed.
///
/// Returns `(file name, trace length)` per report.
pub fn run_scenarios(
    coordinator: &mut Coordinator,
    out_dir: &Path,
) -> AgoraResult<Vec<(String, usize)>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(SCENARIOS.len());
    for (file_name, prompt) in SCENARIOS {
        let outcome = coordinator.ask(prompt)?;
        fs::write(out_dir.join(file_name), render_report(prompt, &outcome))?;
        info!(file = %file_name, trace = outcome.trace.len(), "Scenario report written");
        written.push((file_name.to_string(), outcome.trace.len()));
    }
    Ok(written)
}
