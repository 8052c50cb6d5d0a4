//! Line-oriented `key=value` rendering of a run summary.

use crate::bootstrap::ProvisionSummary;
use crate::domain::{SeedCounts, Verification};

const UNAVAILABLE: &str = "unavailable";

/// Render `summary` as one `key=value` line per fact.
pub fn render_summary(summary: &ProvisionSummary) -> Vec<String> {
    let report = &summary.report;
    let mut lines = Vec::new();

    for collection in &report.collections {
        lines.push(format!(
            "collection.{}={}",
            collection.name,
            collection.outcome.as_str()
        ));
    }
    for index in &report.indexes {
        lines.push(format!(
            "index.{}.{}={}",
            index.collection,
            index.name,
            index.outcome.as_str()
        ));
    }
    match &report.account {
        Some(account) => lines.push(format!(
            "account.{}={}",
            account.email,
            account.status.as_str()
        )),
        None => lines.push(format!("account={UNAVAILABLE}")),
    }
    render_verification(&report.verification, &mut lines);
    for failure in &report.failures {
        lines.push(format!(
            "failure.{}.{}={}: {}",
            failure.step, failure.target, failure.kind, failure.message
        ));
    }
    lines.push(format!("failures={}", report.failures.len()));

    match &summary.seeding {
        Some(outcome) => {
            render_counts("users", outcome.users, &mut lines);
            render_counts("courses", outcome.courses, &mut lines);
            render_counts("enrollments", outcome.enrollments, &mut lines);
            for failure in &outcome.failures {
                lines.push(format!(
                    "seeding.failure.{}.{}={}",
                    failure.entity, failure.key, failure.cause
                ));
            }
            lines.push(format!("seeding.failures={}", outcome.failures.len()));
        }
        None => lines.push("seeding=skipped".to_owned()),
    }
    lines
}

fn render_verification(verification: &Verification, lines: &mut Vec<String>) {
    let collections = verification
        .collections
        .as_ref()
        .map_or_else(|| UNAVAILABLE.to_owned(), |names| names.join(","));
    lines.push(format!("verification.collections={collections}"));

    for summary in &verification.summaries {
        lines.push(format!(
            "verification.{}.documents={}",
            summary.name,
            display_or_unavailable(summary.document_count)
        ));
        lines.push(format!(
            "verification.{}.indexes={}",
            summary.name,
            display_or_unavailable(summary.index_count)
        ));
    }
}

fn render_counts(entity: &str, counts: SeedCounts, lines: &mut Vec<String>) {
    lines.push(format!("seeding.{entity}.inserted={}", counts.inserted));
    lines.push(format!(
        "seeding.{entity}.already_present={}",
        counts.already_present
    ));
}

fn display_or_unavailable<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_owned(), |value| value.to_string())
}
