use crate::config::BatchWindow;
use crate::config::DEFAULT_DELAY_MS;
use crate::core::search::ProductSearch;
use crate::domain::model::{BatchSummary, CatalogEntry, EntryOutcome, OutputRow};
use crate::domain::ports::{CatalogSource, OutputSink, PageSource};
use crate::utils::error::Result;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Walks the catalog one entry at a time, searching, matching and writing
/// each hit to the sink before moving on.
pub struct BatchRunner<C: CatalogSource, P: PageSource, O: OutputSink> {
    catalog: C,
    search: ProductSearch<P>,
    sink: O,
    delay: Duration,
    window: BatchWindow,
}

impl<C: CatalogSource, P: PageSource, O: OutputSink> BatchRunner<C, P, O> {
    pub fn new(catalog: C, search: ProductSearch<P>, sink: O) -> Self {
        Self {
            catalog,
            search,
            sink,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            window: BatchWindow::default(),
        }
    }

    /// Pause between consecutive searches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_window(mut self, window: BatchWindow) -> Self {
        self.window = window;
        self
    }

    pub fn into_sink(self) -> O {
        self.sink
    }

    /// Returns an error only for faults that make continuing pointless:
    /// no catalog, a dead browser engine or an unwritable output.
    pub async fn run(&mut self) -> Result<BatchSummary> {
        let started = Instant::now();

        info!("Loading catalog...");
        let entries = self.catalog.load().await?;
        let total = entries.len();
        let range = self.window.range(total);
        info!(
            "Loaded {} catalog entries, processing {}..{}",
            total, range.start, range.end
        );

        let mut summary = BatchSummary::new(total);
        let mut last_finished = Instant::now();

        for (index, entry) in entries
            .into_iter()
            .enumerate()
            .skip(range.start)
            .take(range.len())
        {
            let outcome = self.process_entry(&entry).await?;

            let finished = Instant::now();
            report_progress(index + 1, total, &outcome, finished - last_finished);
            last_finished = finished;
            summary.record(&outcome);

            if index + 1 < range.end {
                tokio::time::sleep(self.delay).await;
            }
        }

        summary.elapsed = started.elapsed();
        info!(
            "Batch finished: {} attempted, {} matched, {} not found, {} failed in {:?}",
            summary.attempted, summary.matched, summary.not_found, summary.failed, summary.elapsed
        );
        Ok(summary)
    }

    async fn process_entry(&mut self, entry: &CatalogEntry) -> Result<EntryOutcome> {
        match self.search.search(&entry.title).await {
            Ok(Some(matched)) => {
                let row = OutputRow::from_match(entry, &matched);
                self.sink.append(&row)?;
                Ok(EntryOutcome::Matched {
                    row,
                    score: matched.score,
                })
            }
            Ok(None) => Ok(EntryOutcome::NotFound),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Ok(EntryOutcome::Failed(e)),
        }
    }
}

fn report_progress(position: usize, total: usize, outcome: &EntryOutcome, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis();
    match outcome {
        EntryOutcome::Matched { row, score } => {
            let record = serde_json::to_string(row).unwrap_or_else(|_| format!("{:?}", row));
            info!(
                "[{}/{}] {} score={:.3} {}ms",
                position, total, record, score, elapsed_ms
            );
        }
        EntryOutcome::NotFound => {
            warn!("[{}/{}] NOT FOUND {}ms", position, total, elapsed_ms);
        }
        EntryOutcome::Failed(e) => {
            warn!("[{}/{}] FAILED: {} {}ms", position, total, e, elapsed_ms);
        }
    }
}
