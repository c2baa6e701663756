//! Vendor harvest jobs
//!
//! Each vendor module knows its API base URL, its auth scheme, which
//! collections to walk and how to shape the output files. Everything else
//! (pagination, joins, persistence, completeness policy) goes through the
//! shared core via [`VendorContext`].

pub mod bizneo;
pub mod greenhouse;
pub mod gupy;
pub mod lever;
pub mod pandape;
pub mod recruitee;

use crate::config::{HarvestConfig, VendorSettings};
use crate::error::Result;
use crate::harvest::{HarvestResult, HarvestSummary, Harvester, KeyedHarvest};
use crate::http::{HttpClient, RateLimiterConfig};
use crate::output::PersistenceSink;
use crate::pagination::ResourceDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Defaults a vendor job starts from before configuration overrides
#[derive(Debug, Clone)]
pub struct VendorProfile {
    /// Vendor name, also the key under `vendors:` in the config file
    pub name: &'static str,
    /// Production API base URL
    pub base_url: &'static str,
    /// Keyed harvests in flight at once
    pub concurrency: usize,
    /// Transport retries for this vendor
    pub max_retries: Option<u32>,
    /// Request pacing for this vendor
    pub rate_limit: Option<RateLimiterConfig>,
}

impl VendorProfile {
    /// Profile with sequential keyed harvests and no pacing
    pub fn new(name: &'static str, base_url: &'static str) -> Self {
        Self {
            name,
            base_url,
            concurrency: 1,
            max_retries: None,
            rate_limit: None,
        }
    }
}

/// Everything a vendor job needs at run time
pub struct VendorContext {
    /// Vendor name
    pub vendor: &'static str,
    /// Effective API base URL
    pub base_url: String,
    /// Effective keyed concurrency
    pub concurrency: usize,
    /// Vendor overrides from the config file
    pub settings: VendorSettings,
    /// Abort on partial collections instead of writing them
    pub require_complete: bool,
    harvester: Harvester<HttpClient>,
    sink: Arc<dyn PersistenceSink>,
}

impl VendorContext {
    /// Build the context for a vendor: config overrides win over the
    /// profile, which wins over the global HTTP settings
    pub fn new(
        profile: &VendorProfile,
        config: &HarvestConfig,
        sink: Arc<dyn PersistenceSink>,
    ) -> Result<Self> {
        let settings = config.vendor(profile.name);

        let mut client_config = config.http.client_config();
        if let Some(retries) = settings.max_retries.or(profile.max_retries) {
            client_config.max_retries = retries;
        }
        client_config.rate_limit = settings
            .rate_limit
            .as_ref()
            .map(RateLimiterConfig::from)
            .or_else(|| profile.rate_limit.clone());

        Ok(Self {
            vendor: profile.name,
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| profile.base_url.to_string()),
            concurrency: settings.concurrency.unwrap_or(profile.concurrency).max(1),
            require_complete: config.require_complete,
            harvester: Harvester::new(HttpClient::with_config(client_config)?),
            sink,
            settings,
        })
    }

    /// Descriptor for a path under the vendor base URL
    pub fn descriptor(&self, path: impl Into<String>) -> ResourceDescriptor {
        ResourceDescriptor::new(&self.base_url, path)
    }

    /// Page size from the config file, or the vendor default
    pub fn page_size(&self, default: u32) -> u32 {
        self.settings.page_size.unwrap_or(default)
    }

    /// Walk one collection and apply the completeness policy
    pub async fn harvest(&self, descriptor: &ResourceDescriptor) -> Result<HarvestResult> {
        let result = self.harvester.harvest(descriptor).await;
        self.accept(result)
    }

    /// Walk one collection per key and apply the completeness policy to each
    pub async fn harvest_keyed<K, F>(
        &self,
        keys: impl IntoIterator<Item = K>,
        build: F,
    ) -> Result<Vec<KeyedHarvest<K>>>
    where
        F: Fn(&K) -> Result<ResourceDescriptor>,
    {
        self.harvester
            .harvest_keyed(keys, self.concurrency, build)
            .await
            .into_iter()
            .map(|keyed| {
                Ok(KeyedHarvest {
                    result: self.accept(keyed.result)?,
                    key: keyed.key,
                })
            })
            .collect()
    }

    /// Fail on a partial result when completeness is required, otherwise
    /// pass it through with a warning
    pub fn accept(&self, result: HarvestResult) -> Result<HarvestResult> {
        if self.require_complete {
            return result.require_complete();
        }
        if !result.is_complete() {
            warn!(
                "{}: keeping {} records of incomplete harvest '{}' ({})",
                self.vendor,
                result.len(),
                result.resource,
                result.failure_reason().unwrap_or_default()
            );
        }
        Ok(result)
    }

    /// Write a document through the sink
    pub async fn persist(
        &self,
        file: &str,
        value: &Value,
        sources: Vec<HarvestSummary>,
    ) -> Result<WrittenFile> {
        let path = self.sink.write(file, value).await?;
        Ok(WrittenFile {
            vendor: self.vendor.to_string(),
            file: file.to_string(),
            path,
            records: value.as_array().map_or(1, Vec::len),
            completed: sources.iter().all(|s| s.completed),
            sources,
        })
    }
}

impl std::fmt::Debug for VendorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorContext")
            .field("vendor", &self.vendor)
            .field("base_url", &self.base_url)
            .field("concurrency", &self.concurrency)
            .field("require_complete", &self.require_complete)
            .finish_non_exhaustive()
    }
}

/// One output file written by a vendor job
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    /// Vendor name
    pub vendor: String,
    /// File name
    pub file: String,
    /// Where it was written
    pub path: PathBuf,
    /// Top-level entries in the file
    pub records: usize,
    /// Whether every harvest feeding the file finished
    pub completed: bool,
    /// The harvests feeding the file
    pub sources: Vec<HarvestSummary>,
}

/// Files written by one vendor run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Files in the order they were written
    pub files: Vec<WrittenFile>,
}

impl RunReport {
    /// Record a written file
    pub fn push(&mut self, file: WrittenFile) {
        self.files.push(file);
    }

    /// Whether every file is complete
    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|f| f.completed)
    }
}

/// Summaries of every result in a fan-out
pub(crate) fn keyed_summaries<K>(results: &[KeyedHarvest<K>]) -> Vec<HarvestSummary> {
    results.iter().map(|k| k.result.summary()).collect()
}

/// Collect the `id` of each record, skipping records without one
pub(crate) fn record_ids(records: &[Value], what: &str) -> Vec<Value> {
    records
        .iter()
        .filter_map(|record| match record.get("id") {
            Some(id) if !id.is_null() => Some(id.clone()),
            _ => {
                warn!("Skipping {what} without an id");
                None
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::output::JsonFileSink;
    use std::path::Path;

    /// Context pointing a vendor at a mock server and a temp directory
    pub fn context(
        profile: &VendorProfile,
        base_url: &str,
        dir: &Path,
        require_complete: bool,
    ) -> VendorContext {
        let mut config = HarvestConfig {
            require_complete,
            ..Default::default()
        };
        config.vendors.insert(
            profile.name.to_string(),
            VendorSettings {
                base_url: Some(base_url.to_string()),
                ..Default::default()
            },
        );
        VendorContext::new(profile, &config, Arc::new(JsonFileSink::new(dir))).unwrap()
    }

    /// Parse a written output file
    pub fn read_json(dir: &Path, file: &str) -> Value {
        let contents = std::fs::read_to_string(dir.join(file)).unwrap();
        serde_json::from_str(&contents).unwrap()
    }
}
