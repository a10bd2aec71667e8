use agora_memory::Record;
use agora_orchestrator::agents::memory::describe_hit;
use agora_orchestrator::{render_plan, render_trace_entry, AskOutcome};

/// Console rendering of one answered query.
pub fn render_outcome(outcome: &AskOutcome) -> String {
    let mut out = format!(
        "ANSWER:\n{}\n\nMODE: {}\nPLAN: {}\n\nTRACE:",
        outcome.answer,
        outcome.mode,
        render_plan(&outcome.plan)
    );
    for entry in &outcome.trace {
        out.push('\n');
        out.push_str(&render_trace_entry(entry, ": "));
    }
    out
}

/// `id  [kind] topic :: preview... (by agent, conf=x.xx)`
pub fn render_record(record: &Record) -> String {
    format!("{}  {}", record.id, describe_hit(record))
}

/// One line per record, or `empty` when there are none.
pub fn render_records<'a>(records: impl IntoIterator<Item = &'a Record>, empty: &str) -> String {
    let lines: Vec<String> = records.into_iter().map(render_record).collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}
