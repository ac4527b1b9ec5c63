use anyhow::{anyhow, bail, Context, Result};
use crossbeam::channel::Sender;
use flate2::read::GzDecoder;
use fts_core::{DocId, Document};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct InputDoc {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(alias = "body", alias = "abstract")]
    text: String,
}

/// Hands out document ids for one ingest run. Shared by every producer so
/// ids stay unique across input files.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    pub fn next_id(&self) -> DocId { self.next.fetch_add(1, Ordering::Relaxed) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
}

/// Recognize `.json`, `.jsonl` and their `.gz` variants.
fn classify(path: &Path) -> Option<(Format, bool)> {
    let name = path.file_name()?.to_str()?;
    let (stem, gzipped) = match name.strip_suffix(".gz") {
        Some(stem) => (stem, true),
        None => (name, false),
    };
    if stem.ends_with(".jsonl") {
        Some((Format::JsonLines, gzipped))
    } else if stem.ends_with(".json") {
        Some((Format::Json, gzipped))
    } else {
        None
    }
}

/// Corpus files under `input`: the path itself if it is a file, otherwise
/// every recognized file below it, in a stable order.
pub fn collect_inputs(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && classify(p).is_some())
        .collect();
    files.sort();
    files
}

/// Parse one corpus file and push its documents onto the ingest queue.
/// Returns how many documents were sent.
pub fn load_documents(path: &Path, ids: &IdAllocator, tx: &Sender<Document>) -> Result<usize> {
    let (format, gzipped) = classify(path).unwrap_or((Format::Json, false));
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let raw: Box<dyn Read> = if gzipped { Box::new(GzDecoder::new(f)) } else { Box::new(f) };
    let reader = BufReader::new(raw);

    let mut sent = 0usize;
    let mut push = |doc: InputDoc| -> Result<()> {
        let doc = Document { id: ids.next_id(), title: doc.title, url: doc.url.unwrap_or_default(), text: doc.text };
        tx.send(doc).map_err(|_| anyhow!("ingest queue closed"))?;
        sent += 1;
        Ok(())
    };

    match format {
        Format::JsonLines => {
            for (lineno, line) in reader.lines().enumerate() {
                let line = line.with_context(|| format!("reading {}", path.display()))?;
                if line.trim().is_empty() { continue; }
                let doc: InputDoc = serde_json::from_str(&line)
                    .with_context(|| format!("{}:{}: invalid document", path.display(), lineno + 1))?;
                push(doc)?;
            }
        }
        Format::Json => {
            let json: serde_json::Value = serde_json::from_reader(reader)
                .with_context(|| format!("parsing {}", path.display()))?;
            match json {
                serde_json::Value::Array(arr) => {
                    for v in arr {
                        push(serde_json::from_value(v)?)?;
                    }
                }
                serde_json::Value::Object(_) => push(serde_json::from_value(json)?)?,
                _ => bail!("{}: expected a JSON object or array", path.display()),
            }
        }
    }
    Ok(sent)
}
