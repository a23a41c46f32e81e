//! Console rendering for live event lines and the final report.
//! Pure string building, separated for testability.

use proctor_core::{EventKind, IntegrityEvent, Report, Severity};

/// One live console line for a just-recorded event.
pub fn live_event_line(event: &IntegrityEvent) -> String {
    let marker = match event.severity {
        Severity::Danger => "!!",
        Severity::Warning => " !",
    };
    format!(
        "[{}] {} {}",
        event.timestamp.format("%H:%M:%S"),
        marker,
        event.message
    )
}

/// Final report as console text.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("=== Proctoring Report ===\n");
    out.push_str(&format!("Candidate: {}\n", report.candidate_name));
    out.push_str(&format!("Session:   {}\n", report.session_id));
    out.push_str(&format!("Duration:  {}\n", report.duration));
    out.push_str(&format!(
        "Date:      {}\n",
        report.generated_at.format("%Y-%m-%d")
    ));
    out.push('\n');
    out.push_str(&format!(
        "Integrity Score: {}/100 ({})\n",
        report.integrity_score, report.band
    ));
    out.push('\n');
    out.push_str("Detection Summary\n");
    for kind in EventKind::ALL {
        out.push_str(&format!(
            "  {:<16} {}\n",
            kind.label(),
            report.counts.for_kind(kind)
        ));
    }
    out.push('\n');
    out.push_str("Event Timeline\n");
    if report.events.is_empty() {
        out.push_str("  No suspicious events detected\n");
    } else {
        for event in &report.events {
            out.push_str(&format!(
                "  [{}] [{}] {}\n",
                event.timestamp.format("%H:%M:%S"),
                event.severity,
                event.message
            ));
        }
    }
    out
}

// ─── Tests ────────────────────────────────────────────────────────
