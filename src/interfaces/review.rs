use crate::domain::review::ReviewedApplication;
use std::fmt::Write;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in base-1024 units with at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{text} {}", UNITS[unit])
}

/// The summary shown on the review page.
pub fn render_review(app: &ReviewedApplication) -> String {
    let record = app.record();
    let mut out = String::new();
    let _ = writeln!(out, "Bank:           {}", app.bank().value);
    let _ = writeln!(out, "Branch:         {}", app.branch().value);
    let _ = writeln!(out, "Account name:   {}", record.account_name());
    let _ = writeln!(out, "Account number: {}", record.account_number());
    if let Some(doc) = app.document() {
        let _ = writeln!(
            out,
            "Document:       {} ({}, {})",
            doc.name,
            doc.mime_type,
            format_file_size(doc.size)
        );
    }
    out
}
