//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): numbered lists with study links
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use serde_json::json;
use studymatch_core::StudyMatchConfig;
use studymatch_search::{BuildOutcome, ClosestResponse, StudySearch, StudySearchResponse};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "error": format!("{:#}", err) })),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}

/// Format a corpus build summary.
pub fn format_build(outcome: &BuildOutcome, out: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({
            "out": out,
            "documents": outcome.documents,
            "sections": outcome.sections,
            "records": outcome.index.len(),
            "diagnostics": outcome.diagnostics.iter().map(|d| json!({
                "document_id": d.key.document_id,
                "section_id": d.key.section_id,
                "records_kept": d.records_kept,
                "error": d.failure.to_string(),
            })).collect::<Vec<_>>(),
        })),
        OutputMode::Human => {
            let mut lines = vec![format!(
                "Indexed {} positions from {} chapters in {} studies -> {}",
                outcome.index.len(),
                outcome.sections,
                outcome.documents,
                out
            )];
            if !outcome.diagnostics.is_empty() {
                lines.push(format!("{} chapters indexed partially:", outcome.diagnostics.len()));
                for d in &outcome.diagnostics {
                    lines.push(format!("  {} ({} kept): {}", d.key, d.records_kept, d.failure));
                }
            }
            lines.join("\n")
        }
    }
}

/// Format a closest-positions lookup.
pub fn format_closest(response: &ClosestResponse, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(response).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => {
            if response.matches.is_empty() {
                return "(empty)".to_string();
            }
            response
                .matches
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    format!(
                        "{}) distance {}  {} / {} (ply {})\n   {}",
                        i + 1,
                        m.distance,
                        m.record.document_id,
                        m.record.section_id,
                        m.record.ply,
                        m.record.raw_state
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Format ranked chapters, with study links.
pub fn format_ranking(response: &StudySearchResponse, search: &StudySearch, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({
            "results": response.entries.iter().map(|e| json!({
                "study_id": e.document_id,
                "chapter": e.section_id,
                "url": search.study_url(e),
                "distinct_ply_matches": e.distinct_ply_matches,
                "average_distance": e.average_distance,
                "total_close_references": e.total_close_references,
                "text": e.annotation_text.as_deref().unwrap_or_default(),
            })).collect::<Vec<_>>(),
            "total_sections": response.total_sections,
            "stats": response.stats,
        })),
        OutputMode::Human => {
            if response.entries.is_empty() {
                return "(no matching studies)".to_string();
            }
            let mut blocks = Vec::with_capacity(response.entries.len());
            for (i, e) in response.entries.iter().enumerate() {
                let mut block = format!(
                    "{}) {}\n   {}\n   matched plies: {}, average distance: {:.2}, references: {}",
                    i + 1,
                    e.section_id,
                    search.study_url(e),
                    e.distinct_ply_matches,
                    e.average_distance,
                    e.total_close_references
                );
                if let Some(text) = e.annotation_text.as_deref().filter(|t| !t.trim().is_empty()) {
                    for line in text.trim().lines() {
                        block.push_str("\n   | ");
                        block.push_str(line);
                    }
                }
                blocks.push(block);
            }
            blocks.join("\n\n")
        }
    }
}

/// Format the effective configuration.
pub fn format_config(config: &StudyMatchConfig, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(config).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => toml::to_string_pretty(config).unwrap_or_else(|e| format!("(error) {}", e)),
    }
}
