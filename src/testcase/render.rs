//! Presenting testcases as a Markdown table or a JSON literal.

use crate::Result;
use crate::markdown::{escape_inline_code, escape_table_cell};

use super::TestCase;

/// Render cases as a pipe table with a `#` column.
///
/// Columns follow `names`, then any other names found in the cases in
/// first-seen order. Missing and empty values render as empty cells.
pub fn render_table<S: AsRef<str>>(cases: &[TestCase], names: &[S]) -> String {
    if cases.is_empty() {
        return String::new();
    }

    let mut columns: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    for case in cases {
        for name in case.names() {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }

    let mut out = String::new();
    out.push_str("| # |");
    for column in &columns {
        out.push_str(&format!(" {} |", escape_table_cell(column)));
    }
    out.push_str("\n| --- |");
    out.push_str(&" --- |".repeat(columns.len()));
    out.push('\n');

    for (index, case) in cases.iter().enumerate() {
        out.push_str(&format!("| {} |", index + 1));
        for column in &columns {
            let value = case.get(column).map(escape_table_cell).unwrap_or_default();
            if value.is_empty() {
                out.push_str("  |");
            } else {
                out.push_str(&format!(" `{}` |", escape_inline_code(&value)));
            }
        }
        out.push('\n');
    }

    out
}

/// Pretty JSON array of case objects, keys in case order.
pub fn cases_to_json(cases: &[TestCase]) -> Result<String> {
    Ok(serde_json::to_string_pretty(cases)?)
}
