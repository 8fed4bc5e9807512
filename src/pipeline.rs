//! Search → fetch → locate → decode → extract → emit

use crate::config::{FailurePolicy, PipelineConfig};
use crate::decode::decode_part;
use crate::error::{ExtractError, Result};
use crate::extractor::OrderLinkExtractor;
use crate::locator::locate_html_body;
use crate::paginator::{MessageSearch, SearchPaginator};
use crate::types::{MessageId, MimePart, OrderLink};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Fetches the full MIME structure of a message
pub trait MessageSource {
    fn get_message(&self, id: &MessageId) -> Result<MimePart>;
}

impl<F> MessageSource for F
where
    F: Fn(&MessageId) -> Result<MimePart>,
{
    fn get_message(&self, id: &MessageId) -> Result<MimePart> {
        self(id)
    }
}

/// Receives every extracted link together with the message it came from
pub trait LinkSink {
    fn emit(&mut self, link: &OrderLink, source: &MessageId);
}

impl LinkSink for Vec<(MessageId, OrderLink)> {
    fn emit(&mut self, link: &OrderLink, source: &MessageId) {
        self.push((source.clone(), link.clone()));
    }
}

/// Logs each link at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LinkSink for LogSink {
    fn emit(&mut self, link: &OrderLink, source: &MessageId) {
        info!("You bought {link} (message {source})");
    }
}

/// A message that was skipped
#[derive(Debug, Clone, Serialize)]
pub struct MessageFailure {
    pub id: MessageId,
    pub reason: String,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub messages_seen: usize,
    pub messages_processed: usize,
    pub links_emitted: usize,
    pub failures: Vec<MessageFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            messages_seen: 0,
            messages_processed: 0,
            links_emitted: 0,
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }
}

/// Locate, decode and scrape one message
pub fn process_message(root: &MimePart, extractor: &OrderLinkExtractor) -> Result<Vec<OrderLink>> {
    let html_part = locate_html_body(root)?;
    let html = decode_part(html_part)?;
    Ok(extractor.extract(&html))
}

pub struct Pipeline {
    config: PipelineConfig,
    extractor: OrderLinkExtractor,
    pool: Option<rayon::ThreadPool>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = OrderLinkExtractor::new(&config.marker)?;

        let pool = if config.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .build()
                .map_err(|e| ExtractError::Config(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            extractor,
            pool,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the configured query to completion.
    ///
    /// Search errors always end the run. Per-message failures end it under
    /// [`FailurePolicy::AbortOnFirstFailure`] and are collected in the report
    /// otherwise. Links are emitted in discovery order; under the abort policy
    /// only links of messages before the failing one reach the sink. With a
    /// single worker each message's links are emitted before the next
    /// message is fetched; a worker pool emits page by page.
    pub fn run<S, M, K>(&self, search: S, source: &M, sink: &mut K) -> Result<RunReport>
    where
        S: MessageSearch,
        M: MessageSource + Sync,
        K: LinkSink,
    {
        let mut report = RunReport::start();
        let mut pages = SearchPaginator::new(self.config.query.clone(), search);

        while let Some(page) = pages.next_page() {
            let ids = page?;

            let Some(pool) = &self.pool else {
                for id in &ids {
                    let outcome = self.process_id(id, source);
                    self.settle(id, outcome, sink, &mut report)?;
                }
                continue;
            };

            let outcomes = self.process_page(pool, &ids, source);
            for (id, outcome) in ids.iter().zip(outcomes) {
                // Cancelled in the pool before it started; finish it here so
                // the result matches a sequential run
                let outcome = outcome.unwrap_or_else(|| self.process_id(id, source));
                self.settle(id, outcome, sink, &mut report)?;
            }
        }

        report.finished_at = Utc::now();
        info!(
            "Run finished: {} messages, {} links, {} skipped",
            report.messages_seen,
            report.links_emitted,
            report.failures.len()
        );
        Ok(report)
    }

    /// Emit the links of one message or apply the failure policy
    fn settle<K: LinkSink>(
        &self,
        id: &MessageId,
        outcome: Result<Vec<OrderLink>>,
        sink: &mut K,
        report: &mut RunReport,
    ) -> Result<()> {
        report.messages_seen += 1;

        match outcome {
            Ok(links) => {
                for link in &links {
                    sink.emit(link, id);
                }
                report.messages_processed += 1;
                report.links_emitted += links.len();
            }
            Err(e) => {
                let e = e.for_message(id);
                match self.config.policy {
                    FailurePolicy::AbortOnFirstFailure => return Err(e),
                    FailurePolicy::SkipAndContinue => {
                        warn!("Skipping: {e}");
                        report.failures.push(MessageFailure {
                            id: id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn process_id<M: MessageSource>(&self, id: &MessageId, source: &M) -> Result<Vec<OrderLink>> {
        let root = source.get_message(id)?;
        let links = process_message(&root, &self.extractor)?;
        debug!("Message {id}: {} order links", links.len());
        Ok(links)
    }

    /// Run a whole page on the pool. `None` marks a message that was never
    /// started because an earlier failure cancelled the page
    fn process_page<M>(
        &self,
        pool: &rayon::ThreadPool,
        ids: &[MessageId],
        source: &M,
    ) -> Vec<Option<Result<Vec<OrderLink>>>>
    where
        M: MessageSource + Sync,
    {
        let cancelled = AtomicBool::new(false);
        let abort = self.config.policy == FailurePolicy::AbortOnFirstFailure;

        let work = |id: &MessageId| {
            if cancelled.load(Ordering::Relaxed) {
                return None;
            }
            let outcome = self.process_id(id, source);
            if abort && outcome.is_err() {
                cancelled.store(true, Ordering::Relaxed);
            }
            Some(outcome)
        };

        pool.install(|| ids.par_iter().map(work).collect())
    }
}
