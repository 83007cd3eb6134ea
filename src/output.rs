//! CLI output formatting for the build, check and inspect commands.
//!
//! # Information-First Display
//!
//! Every page is shown by its identity (section, positional index, title),
//! with the output path and validation results as indented context lines.
//! Errors and warnings appear directly under the page they belong to.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Blog
//! 001 Kako odabrati četkicu → blogovi/kako-odabrati-cetkicu/index.html
//! Rečnik
//! 001 Plomba → recnik/plomba/index.html
//!     Warning: FAQ #1 question not visible on page: "Šta je plomba?"
//! 002 (karijes) → recnik/karijes/index.html
//!     Minimal page: glossary record "t-2" is missing required field `term`
//!
//! Generated 3 pages (1 minimal, 0 skipped), sitemap with 6 URLs
//! ```
//!
//! ## Check
//!
//! ```text
//! Rečnik
//! 001 Plomba: ok
//! 002 Karijes: 1 warning
//!     Warning: FAQ #1 answer to "Boli li?" not visible on page (looked for "Ne boli.")
//!
//! Checked 2 pages: 0 with errors, 1 warning
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{BuildReport, PageOutcome, PageSummary};
use crate::types::ContentType;
use crate::validate::{Emission, InspectReport, StructuralMismatch};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index plus title; untitled pages show their slug in parens.
///
/// ```text
/// 001 Plomba
/// 002 (karijes)
/// ```
fn page_header(index: usize, page: &PageSummary) -> String {
    if page.title.is_empty() {
        format!("{} ({})", format_index(index), page.slug)
    } else {
        format!("{} {}", format_index(index), page.title)
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Pages grouped by section in `ContentType::ALL` order; empty sections omitted.
fn by_section(pages: &[PageSummary]) -> Vec<(ContentType, Vec<&PageSummary>)> {
    ContentType::ALL
        .iter()
        .map(|ct| (*ct, pages.iter().filter(|p| p.content_type == *ct).collect::<Vec<_>>()))
        .filter(|(_, list)| !list.is_empty())
        .collect()
}

fn mismatch_lines(mismatch: &StructuralMismatch, depth: usize) -> Vec<String> {
    mismatch
        .issues
        .iter()
        .map(|issue| format!("{}Error: {issue}", indent(depth)))
        .collect()
}

/// Context lines under a page: errors, suppression, sync warnings.
fn outcome_lines(page: &PageSummary) -> Vec<String> {
    let mut lines = Vec::new();
    match &page.outcome {
        PageOutcome::Rendered { report, emission } => {
            if let Err(mismatch) = &report.structure {
                lines.extend(mismatch_lines(mismatch, 1));
            }
            if *emission == Emission::Suppress {
                lines.push(format!("{}JSON-LD: suppressed", indent(1)));
            }
            for warning in &report.warnings {
                lines.push(format!("{}Warning: {warning}", indent(1)));
            }
        }
        PageOutcome::Minimal(error) => {
            lines.push(format!("{}Minimal page: {error}", indent(1)));
        }
        PageOutcome::Skipped(error) => {
            lines.push(format!("{}Skipped: {error}", indent(1)));
        }
    }
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (content_type, pages) in by_section(&report.pages) {
        lines.push(content_type.section_label().to_string());
        for (i, page) in pages.iter().enumerate() {
            let header = page_header(i + 1, page);
            if page.is_written() {
                lines.push(format!("{header} → {}", page.relative_path().display()));
            } else {
                lines.push(header);
            }
            lines.extend(outcome_lines(page));
        }
    }

    let minimal = report
        .pages
        .iter()
        .filter(|p| matches!(p.outcome, PageOutcome::Minimal(_)))
        .count();
    let skipped = report.pages.len() - report.written();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} ({minimal} minimal, {skipped} skipped), sitemap with {}",
        plural(report.written(), "page"),
        plural(report.sitemap_urls, "URL"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(pages: &[PageSummary]) -> Vec<String> {
    let mut lines = Vec::new();

    for (content_type, section) in by_section(pages) {
        lines.push(content_type.section_label().to_string());
        for (i, page) in section.iter().enumerate() {
            let header = page_header(i + 1, page);
            let context = outcome_lines(page);
            let status = if page.has_errors() {
                "error".to_string()
            } else if page.warning_count() > 0 {
                plural(page.warning_count(), "warning")
            } else {
                "ok".to_string()
            };
            lines.push(format!("{header}: {status}"));
            lines.extend(context);
        }
    }

    let errors = pages.iter().filter(|p| p.has_errors()).count();
    let warnings: usize = pages.iter().map(PageSummary::warning_count).sum();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked {}: {errors} with errors, {}",
        plural(pages.len(), "page"),
        plural(warnings, "warning"),
    ));
    lines
}

pub fn print_check_output(pages: &[PageSummary]) {
    for line in format_check_output(pages) {
        println!("{line}");
    }
}

// ============================================================================
// Inspect
// ============================================================================

pub fn format_inspect_output(path: &Path, report: &InspectReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} found",
        path.display(),
        plural(report.scripts, "JSON-LD script")
    )];
    for error in &report.parse_errors {
        lines.push(format!("{}Invalid JSON: {error}", indent(1)));
    }
    match &report.structure {
        Ok(()) => lines.push(format!("{}Structure: ok", indent(1))),
        Err(mismatch) => lines.extend(mismatch_lines(mismatch, 1)),
    }
    for warning in &report.warnings {
        lines.push(format!("{}Warning: {warning}", indent(1)));
    }
    lines
}

pub fn print_inspect_output(path: &Path, report: &InspectReport) {
    for line in format_inspect_output(path, report) {
        println!("{line}");
    }
}
