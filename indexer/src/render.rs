use fts_core::{DocId, InvertedIndex};
use std::io::{self, Write};

const ID_WIDTH: usize = 10;
const TITLE_WIDTH: usize = 40;
const RULE_WIDTH: usize = 105;
const SNIPPET_MAX: usize = 50;
const ELLIPSIS: &str = "...";

/// Whitespace-collapsed text, cut to fit the snippet column.
pub fn snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_MAX {
        return flat;
    }
    let mut cut: String = flat.chars().take(SNIPPET_MAX - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Print matched documents as a fixed-width table followed by a hit-count
/// footer. Ids with no stored document are skipped. Returns the number of
/// rows written.
pub fn render_results<W: Write>(mut out: W, index: &InvertedIndex, ids: &[DocId], limit: Option<usize>) -> io::Result<usize> {
    writeln!(out)?;
    writeln!(out, "{:<ID_WIDTH$} | {:<TITLE_WIDTH$} | {}", "Doc Id", "Title", "Snippet")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    let mut rows = 0usize;
    for &id in ids.iter().take(limit.unwrap_or(usize::MAX)) {
        if let Some(doc) = index.document(id) {
            writeln!(out, "{:<ID_WIDTH$} | {:<TITLE_WIDTH$} | {}", doc.id, doc.title, snippet(&doc.text))?;
            rows += 1;
        }
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "{} documents matched (showing {rows})", ids.len())?;
    Ok(rows)
}
