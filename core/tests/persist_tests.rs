use fts_core::persist::{load_index, load_meta, save_index, IndexPaths, INDEX_VERSION};
use fts_core::{DocId, Document, IndexError, InvertedIndex};
use std::fs;
use tempfile::tempdir;

fn build() -> InvertedIndex {
    let idx = InvertedIndex::new();
    let docs = [
        (1, "Doc1", "golang programming"),
        (2, "Doc2", "python programming"),
        (3, "Doc3", "golang web development framework"),
    ];
    for (id, title, text) in docs {
        idx.add_document(Document { id, title: title.into(), url: format!("http://example.com/{id}"), text: text.into() });
    }
    idx
}

const QUERIES: &[&str] = &["golang", "programming", "golang programming", "web framework", "nonexistent", ""];

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.bin");
    let idx = build();
    idx.save(&path).unwrap();

    let loaded = InvertedIndex::load(&path).unwrap();
    assert_eq!(loaded.size(), idx.size());
    for q in QUERIES {
        assert_eq!(loaded.search(q), idx.search(q), "query {q:?}");
    }
    for id in 1..=3 as DocId {
        assert_eq!(loaded.document(id), idx.document(id));
    }
}

#[test]
fn index_directory_with_metadata() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("idx"));
    assert!(!paths.exists());
    let meta = save_index(&paths, &build()).unwrap();
    assert!(paths.exists());
    assert_eq!(meta.num_docs, 3);
    assert_eq!(meta.version, INDEX_VERSION);
    assert_eq!(load_meta(&paths).unwrap(), meta);
    assert_eq!(load_index(&paths).unwrap().search("golang"), vec![1, 3]);
}

#[test]
fn load_without_metadata_still_works() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    build().save(paths.index()).unwrap();
    assert_eq!(load_index(&paths).unwrap().size().num_docs, 3);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = InvertedIndex::load(dir.path().join("nope.bin")).unwrap_err();
    assert!(matches!(err, IndexError::Io(_)));
}

#[test]
fn truncated_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.bin");
    build().save(&path).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 5]).unwrap();
    assert!(matches!(InvertedIndex::load(&path), Err(IndexError::Serialization(_))));
}

#[test]
fn failed_restore_keeps_existing_contents() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.bin");
    let bad = dir.path().join("bad.bin");
    build().save(&good).unwrap();
    let bytes = fs::read(&good).unwrap();
    fs::write(&bad, &bytes[..bytes.len() / 2]).unwrap();

    let idx = InvertedIndex::new();
    idx.add_document(Document { id: 9, title: "keep".into(), url: String::new(), text: "survivor".into() });
    assert!(idx.restore(&bad).is_err());
    assert_eq!(idx.search("survivor"), vec![9]);
    assert_eq!(idx.size().num_docs, 1);

    idx.restore(&good).unwrap();
    assert!(idx.search("survivor").is_empty());
    assert_eq!(idx.search("golang"), vec![1, 3]);
}

#[test]
fn trailing_bytes_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.bin");
    build().save(&path).unwrap();
    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(b"GARBAGE GARBAGE");
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(InvertedIndex::load(&path), Err(IndexError::Corrupt(_))));

    let idx = InvertedIndex::new();
    assert!(idx.restore(&path).is_err());
    assert!(idx.is_empty());
}
