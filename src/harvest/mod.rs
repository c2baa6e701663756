//! Harvest engine module
//!
//! Main page walk and keyed fan-out.
//!
//! # Overview
//!
//! The harvest module provides:
//! - `Harvester` - Walks every page of a [`ResourceDescriptor`]
//! - `HarvestResult` - Records plus an explicit `completed` flag
//! - `Harvester::harvest_keyed` - One walk per key with bounded concurrency
//!
//! A request or decode failure stops the walk and yields a partial result
//! tagged with the failing page. The harvester never retries; retries are a
//! transport concern.

mod types;

pub use types::{
    FailureSummary, HarvestFailure, HarvestResult, HarvestStats, HarvestSummary, KeyedHarvest,
};

use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::Result;
use crate::http::Transport;
use crate::pagination::{check_stop_condition, Page, PaginationState, ResourceDescriptor};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Walks paginated collections over a [`Transport`]
#[derive(Debug, Clone)]
pub struct Harvester<T> {
    transport: T,
}

impl<T: Transport> Harvester<T> {
    /// Create a harvester over a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Walk every page of a collection
    ///
    /// Pages are requested in order starting at 1, each exactly once. The
    /// walk ends on an empty page, when the stop condition is met, or on the
    /// first failure, in which case the records gathered so far are returned
    /// with `completed = false`.
    pub async fn harvest(&self, descriptor: &ResourceDescriptor) -> HarvestResult {
        let start = Instant::now();
        let decoder = JsonDecoder::for_descriptor(descriptor);
        let mut state = PaginationState::new();
        let mut records = Vec::new();
        let mut pages = 0;

        info!("Starting harvest of {}", descriptor.name);

        let failure = loop {
            let outcome = match self.fetch_page(descriptor, &decoder, &mut state).await {
                Ok(page) => check_stop_condition(&descriptor.stop_condition, &page, &state)
                    .map(|stop| (page, stop)),
                Err(e) => Err(e),
            };

            match outcome {
                Ok((page, stop)) => {
                    let count = page.len();
                    pages += 1;
                    state.add_fetched(count as u64);
                    records.extend(page.records);

                    debug!(
                        "{} page {}: fetched {} records ({} total)",
                        descriptor.name, state.page, count, state.total_fetched
                    );

                    if stop.should_stop() {
                        state.mark_done();
                        break None;
                    }
                    state.next_page();
                }
                Err(error) => break Some((state.page, error)),
            }
        };

        let stats = HarvestStats {
            requests: state.requests,
            pages,
            records: records.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        match failure {
            None => {
                info!(
                    "Completed harvest of {}: {} records in {} pages",
                    descriptor.name, stats.records, stats.pages
                );
                HarvestResult::complete(&descriptor.name, records, stats)
            }
            Some((page, error)) => {
                warn!(
                    "Harvest of {} stopped at page {page} after {} records: {error}",
                    descriptor.name, stats.records
                );
                HarvestResult::partial(&descriptor.name, records, page, error, stats)
            }
        }
    }

    /// Run one walk per key with at most `concurrency` in flight
    ///
    /// Results come back in key input order. A key whose descriptor cannot be
    /// built yields a failed result without any request.
    pub async fn harvest_keyed<K, F>(
        &self,
        keys: impl IntoIterator<Item = K>,
        concurrency: usize,
        build: F,
    ) -> Vec<KeyedHarvest<K>>
    where
        F: Fn(&K) -> Result<ResourceDescriptor>,
    {
        let build = &build;
        stream::iter(keys)
            .map(|key| async move {
                let result = match build(&key) {
                    Ok(descriptor) => self.harvest(&descriptor).await,
                    Err(error) => {
                        warn!("Skipping harvest, descriptor could not be built: {error}");
                        HarvestResult::partial("", Vec::new(), 1, error, HarvestStats::default())
                    }
                };
                KeyedHarvest { key, result }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn fetch_page(
        &self,
        descriptor: &ResourceDescriptor,
        decoder: &JsonDecoder,
        state: &mut PaginationState,
    ) -> Result<Page> {
        let url = descriptor.url()?;
        let request = descriptor.request_for(state).await?;
        state.record_request();
        let body = self.transport.get_json(url.as_str(), request).await?;
        decoder.decode_page(&body)
    }
}
