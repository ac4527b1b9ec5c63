use crate::analyzer::analyze;
use crate::index::{DocId, InvertedIndex};

/// Two-pointer merge of two ascending, duplicate-free id lists.
///
/// The output is ascending and duplicate-free as well, so results can be
/// folded through further intersections.
pub fn intersection(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        let x = a[i];
        let y = b[j];
        if x < y {
            i += 1;
        } else if x > y {
            j += 1;
        } else {
            out.push(x);
            i += 1;
            j += 1;
        }
    }
    out
}

impl InvertedIndex {
    /// Conjunctive search: ids of documents containing every query term, ascending.
    ///
    /// The query goes through the same analyzer as indexed text. A query that
    /// analyzes to nothing, or any term missing from the index, gives an empty
    /// result. All lookups share one read guard.
    pub fn search(&self, query: &str) -> Vec<DocId> {
        let tokens = analyze(query);
        let state = self.read();
        let mut result: Option<Vec<DocId>> = None;
        for token in &tokens {
            let Some(ids) = state.postings.get(token) else {
                return Vec::new();
            };
            let next = match result {
                None => ids.clone(),
                Some(acc) => intersection(&acc, ids),
            };
            if next.is_empty() {
                return next;
            }
            result = Some(next);
        }
        result.unwrap_or_default()
    }
}
