//! Introspection and export over the published dispatch table.
//!
//! Everything here is read-only: the table is enumerated, rendered, or
//! serialized, never mutated. A failed export is a diagnostic error the
//! caller reports and moves past; it does not invalidate the table.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::RoutemapError;
use crate::table::DispatchTable;

/// One row of the introspection listing, in serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub pattern: String,
    pub methods: Vec<String>,
    pub order: u32,
    pub handler: String,
    pub source_file: String,
    pub line_number: u32,
}

/// Enumerate the published table as report rows, in ascending
/// `(order, pattern)` order.
#[must_use]
pub fn report_entries(table: &DispatchTable) -> Vec<ReportEntry> {
    table
        .entries()
        .map(|entry| ReportEntry {
            pattern: entry.pattern().to_string(),
            methods: entry
                .methods()
                .iter()
                .map(|method| method.to_string())
                .collect(),
            order: entry.order(),
            handler: entry.qualified_name().to_string(),
            source_file: entry.site().file().to_string(),
            line_number: entry.site().line(),
        })
        .collect()
}

/// Render the plain-text route report.
#[must_use]
pub fn render_report(table: &DispatchTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Number of dispatch entries defined: {}\n",
        table.len()
    ));

    for entry in table.entries() {
        out.push('\n');
        out.push_str(&format!("Route pattern: {}\n", entry.pattern()));
        for method in entry.methods().iter() {
            out.push_str(&format!("- HTTP method: {method}\n"));
        }
        out.push_str(&format!("- Order: {}\n", entry.order()));
        out.push_str(&format!("- Mapped to handler: {}\n", entry.qualified_name()));
        out.push_str(&format!(
            "- Source file: {}, line number: {}\n",
            entry.site().file(),
            entry.site().line()
        ));
    }

    out
}

/// Write the route report to a file.
///
/// Failure is a [`RoutemapError::DiagnosticIo`] carrying the destination
/// path; it is up to the caller to surface it, and the table remains fully
/// usable either way.
pub fn write_report(table: &DispatchTable, path: impl AsRef<Path>) -> Result<(), RoutemapError> {
    let path = path.as_ref();
    fs::write(path, render_report(table)).map_err(|source| RoutemapError::DiagnosticIo {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        entry_count = table.len(),
        "route report written"
    );
    Ok(())
}
