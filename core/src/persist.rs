use crate::error::{IndexError, Result};
use crate::index::{DocId, Document, IndexState, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn describe(index: &InvertedIndex) -> Self {
        let stats = index.size();
        Self {
            num_docs: stats.num_docs,
            num_terms: stats.num_terms,
            created_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            version: INDEX_VERSION,
        }
    }
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn index(&self) -> PathBuf { self.root.join("index.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn exists(&self) -> bool { self.index().is_file() }
}

/// Write the postings table followed by the document store.
pub fn write_index<W: Write>(index: &InvertedIndex, writer: W) -> Result<()> {
    let state = index.read();
    let mut w = BufWriter::new(writer);
    bincode::serialize_into(&mut w, &state.postings)?;
    bincode::serialize_into(&mut w, &state.docs)?;
    w.flush()?;
    Ok(())
}

/// Decode both maps from `bytes` into a fresh index. Either both maps decode
/// and pass validation or nothing is returned.
pub fn decode_index(bytes: &[u8]) -> Result<InvertedIndex> {
    let postings: HashMap<String, Vec<DocId>> = bincode::deserialize(bytes)?;
    let offset = bincode::serialized_size(&postings)? as usize;
    let rest = bytes.get(offset..).ok_or_else(|| IndexError::Corrupt("postings table overruns input".into()))?;
    let docs: HashMap<DocId, Document> = bincode::deserialize(rest)?;
    let end = offset + bincode::serialized_size(&docs)? as usize;
    if end != bytes.len() {
        return Err(IndexError::Corrupt(format!("{} trailing bytes after document table", bytes.len() - end)));
    }
    let state = IndexState { postings, docs };
    validate(&state)?;
    Ok(InvertedIndex::from_state(state))
}

pub fn read_index<R: Read>(mut reader: R) -> Result<InvertedIndex> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    decode_index(&buf)
}

fn validate(state: &IndexState) -> Result<()> {
    for (id, doc) in &state.docs {
        if *id != doc.id {
            return Err(IndexError::Corrupt(format!("document stored under {id} has id {}", doc.id)));
        }
    }
    for (term, ids) in &state.postings {
        if ids.windows(2).any(|w| w[0] >= w[1]) {
            return Err(IndexError::Corrupt(format!("postings for {term:?} are not strictly ascending")));
        }
        if let Some(missing) = ids.iter().find(|&&id| !state.docs.contains_key(&id)) {
            return Err(IndexError::Corrupt(format!("postings for {term:?} reference unknown document {missing}")));
        }
    }
    Ok(())
}

impl InvertedIndex {
    /// Write the index to a single file. Not atomic: a failure midway leaves a
    /// partial file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let f = File::create(path)?;
        write_index(self, f)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path)?;
        read_index(f)
    }

    /// Replace this index's contents with the file at `path`. The file is
    /// decoded into a fresh index first; on error the current contents stay.
    pub fn restore<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fresh = Self::load(path)?;
        self.replace(fresh.into_state());
        Ok(())
    }
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Save `index.bin` and then `meta.json` under `paths.root`.
pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<MetaFile> {
    create_dir_all(&paths.root)?;
    index.save(paths.index())?;
    let meta = MetaFile::describe(index);
    save_meta(paths, &meta)?;
    tracing::info!(path = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "index saved");
    Ok(meta)
}

/// Load `index.bin`. `meta.json` is informational only and may be absent.
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let index = InvertedIndex::load(paths.index())?;
    let stats = index.size();
    match load_meta(paths) {
        Ok(meta) => tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, created_at = %meta.created_at, "index loaded"),
        Err(e) => tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, error = %e, "index loaded without metadata"),
    }
    Ok(index)
}
