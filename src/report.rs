use std::cmp::Ordering;

use serde::Serialize;

use crate::data::aggregate::{AppEntry, ValueTable};
use crate::data::model::Dataset;
use crate::pipeline::{StoreAnalysis, StoreReport};

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Entries ordered by the `(value, key)` pair, largest first.
pub fn sorted_desc(table: &ValueTable) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = table.iter().collect();
    entries.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => b.0.cmp(a.0),
        other => other,
    });
    entries
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// `<key> : <value>` per line, largest value first.
pub fn render_table(title: &str, table: &ValueTable) -> String {
    let mut out = format!("{title}\n");
    if table.is_empty() {
        out.push_str("(none)\n");
    }
    for (key, value) in sorted_desc(table) {
        out.push_str(&format!("{key} : {value:?}\n"));
    }
    out
}

pub fn render_listing(title: &str, apps: &[AppEntry]) -> String {
    let mut out = format!("{title}\n");
    if apps.is_empty() {
        out.push_str("(none)\n");
    }
    for app in apps {
        out.push_str(&format!("{} : {}\n", app.name, app.value));
    }
    out
}

/// Header, the first `rows` records and the table's dimensions.
pub fn render_preview(label: &str, dataset: &Dataset, rows: usize) -> String {
    let mut lines = vec![
        format!("-- {} / {label} --", dataset.store),
        format!("{:?}", dataset.header),
    ];
    lines.extend(
        dataset
            .records
            .iter()
            .take(rows)
            .map(|record| format!("{:?}", record.fields())),
    );
    lines.push(format!("Number of rows: {}", dataset.len()));
    lines.push(format!("Number of columns: {}", dataset.header.len()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The whole human-readable report for one store.
pub fn render_text(analysis: &StoreAnalysis, report: &StoreReport, preview_rows: usize) -> String {
    let mut out = format!("===== {} =====\n\n", report.store);

    if preview_rows > 0 {
        for (label, dataset) in analysis.stages() {
            out.push_str(&render_preview(label, dataset, preview_rows));
            out.push('\n');
        }
    }

    for stage in &report.stages {
        out.push_str(&format!("{:>16}: {}\n", stage.stage, stage.rows));
    }
    out.push('\n');
    if let Some(dups) = &report.duplicates {
        out.push_str(&format!(
            "Number of duplicate apps: {}\nExamples of duplicate apps: {:?}\n\n",
            dups.count, dups.examples
        ));
    }

    for named in report.frequencies.iter().chain(&report.averages) {
        out.push_str(&render_table(&named.title, &named.table));
        out.push('\n');
    }
    for drill in &report.drilldowns {
        out.push_str(&render_listing(&drill.title, &drill.apps));
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    stores: &'a [StoreReport],
}

pub fn render_json(reports: &[StoreReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { stores: reports })
}
