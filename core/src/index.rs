use crate::analyzer::analyze;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
}

/// Both maps live behind one lock so a document and its postings are always
/// published together.
#[derive(Debug, Default)]
pub(crate) struct IndexState {
    pub(crate) postings: HashMap<String, Vec<DocId>>, // ascending, no duplicates
    pub(crate) docs: HashMap<DocId, Document>,
}

/// In-memory inverted index: token -> sorted doc ids, plus the stored documents.
///
/// All access goes through `&self`; the index can be shared across threads
/// (e.g. behind an `Arc` or a scoped borrow) and written by several ingest
/// workers at once as long as they insert distinct document ids.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    state: RwLock<IndexState>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub(crate) fn from_state(state: IndexState) -> Self {
        Self { state: RwLock::new(state) }
    }

    /// Store `doc` and add its id to the postings of every token in its text.
    ///
    /// Analysis runs before the write lock is taken; all postings updates and
    /// the document store write then happen in a single critical section.
    /// Re-adding an id overwrites the stored document and never duplicates a
    /// posting.
    pub fn add_document(&self, doc: Document) {
        let tokens = analyze(&doc.text);
        let mut state = self.state.write();
        let IndexState { postings, docs } = &mut *state;
        for token in tokens {
            insert_sorted(postings.entry(token).or_default(), doc.id);
        }
        docs.insert(doc.id, doc);
    }

    /// Copy of the postings list for an already-analyzed token.
    pub fn postings(&self, token: &str) -> Option<Vec<DocId>> {
        self.state.read().postings.get(token).cloned()
    }

    pub fn document(&self, id: DocId) -> Option<Document> {
        self.state.read().docs.get(&id).cloned()
    }

    pub fn size(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats { num_docs: state.docs.len(), num_terms: state.postings.len() }
    }

    pub fn is_empty(&self) -> bool { self.state.read().docs.is_empty() }

    pub(crate) fn into_state(self) -> IndexState { self.state.into_inner() }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, IndexState> { self.state.read() }

    /// Swap in a fully built state, dropping whatever was held before.
    pub(crate) fn replace(&self, fresh: IndexState) {
        *self.state.write() = fresh;
    }
}

/// Insert `id` keeping `ids` ascending and duplicate-free.
///
/// Workers finish documents in arbitrary order, so a plain append would
/// break the ordering the intersection merge relies on. The common case
/// (ids arriving in increasing order) is still a push.
fn insert_sorted(ids: &mut Vec<DocId>, id: DocId) {
    match ids.last() {
        None => ids.push(id),
        Some(&last) if last < id => ids.push(id),
        Some(&last) if last == id => {}
        Some(_) => {
            if let Err(pos) = ids.binary_search(&id) {
                ids.insert(pos, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocId, text: &str) -> Document {
        Document { id, title: format!("Doc {id}"), url: format!("http://example.com/{id}"), text: text.into() }
    }

    #[test]
    fn insert_sorted_handles_out_of_order_ids() {
        let mut ids = Vec::new();
        for id in [5, 1, 9, 3, 5, 1, 7] {
            insert_sorted(&mut ids, id);
        }
        assert_eq!(ids, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn add_document_stores_and_indexes() {
        let idx = InvertedIndex::new();
        idx.add_document(doc(1, "this is a test document with some content"));
        let stats = idx.size();
        assert_eq!(stats.num_docs, 1);
        assert!(stats.num_terms > 0);
        assert_eq!(idx.postings("test"), Some(vec![1]));
        assert_eq!(idx.postings("the"), None);
    }

    #[test]
    fn repeated_tokens_post_once() {
        let idx = InvertedIndex::new();
        idx.add_document(doc(4, "rust rust Rust RUST"));
        assert_eq!(idx.postings("rust"), Some(vec![4]));
    }

    #[test]
    fn empty_text_still_stores_document() {
        let idx = InvertedIndex::new();
        idx.add_document(doc(7, ""));
        assert_eq!(idx.size(), IndexStats { num_docs: 1, num_terms: 0 });
        assert_eq!(idx.document(7).map(|d| d.id), Some(7));
    }
}
