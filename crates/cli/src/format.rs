//! Report → table/JSON string formatting.
//!
//! Two modes:
//! - **Human** (default): a borderless table with one result row
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of the full report

use tpcb_engine::BenchReport;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

const HEADER: [&str; 3] = ["Name", "Latency(us)", "Throughput(rps)"];

/// Format a finished run.
pub fn format_report(report: &BenchReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_table(report),
        OutputMode::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
    }
}

fn format_table(report: &BenchReport) -> String {
    let row = [
        report.name.to_string(),
        report
            .latency_us
            .map(|l| format!("{:.3}", l))
            .unwrap_or_else(|| "n/a".to_string()),
        format!("{:.3}", report.throughput_rps),
    ];
    let widths: Vec<usize> = HEADER
        .iter()
        .zip(row.iter())
        .map(|(h, c)| h.len().max(c.len()))
        .collect();

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let row_refs: Vec<&str> = row.iter().map(String::as_str).collect();
    format!("{}\n{}", line(&HEADER[..]), line(&row_refs[..]))
}
