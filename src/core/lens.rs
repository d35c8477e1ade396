use crate::core::aggregator::Aggregator;
use crate::core::classifier::{CapabilitySet, Classifier};
use crate::core::collector::Collector;
use crate::core::{
    Address, CapabilityProfile, CollectPage, CompositeRecord, RecordAddress, RecordSource, Registry,
};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Instant;

/// 對外的查詢入口：classify / aggregate / collect
pub struct LaunchLens<R: Registry, S: RecordSource> {
    collector: Collector<R, S>,
}

impl<R: Registry, S: RecordSource> LaunchLens<R, S> {
    pub fn new(
        registry: Arc<R>,
        source: Arc<S>,
        capabilities: CapabilitySet,
        concurrent_requests: usize,
    ) -> Self {
        let classifier = Classifier::new(source, capabilities);
        let aggregator = Aggregator::new(classifier);
        Self {
            collector: Collector::new(registry, aggregator, concurrent_requests),
        }
    }

    pub async fn classify(&self, record: &RecordAddress) -> CapabilityProfile {
        let profile = self.collector.aggregator().classifier().classify(record).await;
        tracing::info!("🔎 {} classified as {}", record, profile);
        profile
    }

    pub async fn aggregate(
        &self,
        record: RecordAddress,
        requester: Option<Address>,
    ) -> Result<CompositeRecord> {
        let started = Instant::now();
        let composite = self.collector.aggregator().aggregate(record, requester).await?;
        tracing::info!(
            "✅ Aggregated {} ({}) in {:?}",
            record,
            composite.profile(),
            started.elapsed()
        );
        Ok(composite)
    }

    pub async fn collect(
        &self,
        type_tag: u64,
        offset: u64,
        limit: u64,
        requester: Option<Address>,
    ) -> Result<Vec<CompositeRecord>> {
        self.collector.collect(type_tag, offset, limit, requester).await
    }

    pub async fn collect_page(
        &self,
        type_tag: u64,
        offset: u64,
        limit: u64,
        requester: Option<Address>,
    ) -> Result<CollectPage> {
        let started = Instant::now();
        let page = self
            .collector
            .collect_page(type_tag, offset, limit, requester)
            .await?;
        tracing::info!(
            "📦 Page of {} / {} records fetched in {:?}",
            page.records.len(),
            page.total,
            started.elapsed()
        );
        Ok(page)
    }
}
