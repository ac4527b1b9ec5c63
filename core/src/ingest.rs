use crate::index::{Document, InvertedIndex};
use crossbeam::channel::{bounded, Receiver, Sender};
use std::fmt::Display;
use std::panic::resume_unwind;
use std::thread;
use tracing::{debug, info, warn};

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Number of worker threads calling `InvertedIndex::add_document`.
    pub workers: usize,
    /// Capacity of the bounded document queue between producers and workers.
    pub queue_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { workers: DEFAULT_WORKERS, queue_capacity: DEFAULT_QUEUE_CAPACITY }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub failed_producers: usize,
}

/// Fixed pool of workers draining a bounded document queue into an index.
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    workers: usize,
    queue_capacity: usize,
}

impl IngestPipeline {
    pub fn new(config: IngestConfig) -> Self {
        Self { workers: config.workers.max(1), queue_capacity: config.queue_capacity.max(1) }
    }

    pub fn workers(&self) -> usize { self.workers }

    /// A bounded queue sized for this pipeline. Dropping every `Sender` closes it.
    pub fn channel(&self) -> (Sender<Document>, Receiver<Document>) {
        bounded(self.queue_capacity)
    }

    /// Index everything arriving on `docs` and return once the queue is
    /// closed and drained. Returns the number of documents indexed.
    ///
    /// Blocks forever if some `Sender` for this queue is never dropped, which
    /// includes one held by the calling thread.
    pub fn drain(&self, index: &InvertedIndex, docs: Receiver<Document>) -> usize {
        thread::scope(|s| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker| {
                    let docs = docs.clone();
                    s.spawn(move || {
                        let mut count = 0usize;
                        for doc in docs.iter() {
                            index.add_document(doc);
                            count += 1;
                        }
                        debug!(worker, count, "ingest worker finished");
                        count
                    })
                })
                .collect();
            drop(docs);
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| resume_unwind(e)))
                .sum()
        })
    }

    /// Run each producer on its own thread feeding the shared queue, while the
    /// worker pool drains it into `index`. Returns when every producer has
    /// exited and the queue is empty.
    ///
    /// Each producer owns its `Sender`, so the queue closes on every exit
    /// path. A producer returning `Err` is logged and counted; documents it
    /// already sent stay indexed.
    pub fn run<P, E>(&self, index: &InvertedIndex, producers: Vec<P>) -> IngestReport
    where
        P: FnOnce(Sender<Document>) -> Result<(), E> + Send,
        E: Display,
    {
        let (tx, rx) = self.channel();
        let report = thread::scope(|s| {
            let producer_handles: Vec<_> = producers
                .into_iter()
                .enumerate()
                .map(|(producer, produce)| {
                    let tx = tx.clone();
                    s.spawn(move || match produce(tx) {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(producer, error = %e, "document source failed");
                            false
                        }
                    })
                })
                .collect();
            drop(tx);

            let documents = self.drain(index, rx);
            let failed_producers = producer_handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| resume_unwind(e)))
                .filter(|ok| !ok)
                .count();
            IngestReport { documents, failed_producers }
        });
        info!(documents = report.documents, failed_producers = report.failed_producers, workers = self.workers, "ingestion complete");
        report
    }
}

impl Default for IngestPipeline {
    fn default() -> Self { Self::new(IngestConfig::default()) }
}
