use crate::core::aggregator::Aggregator;
use crate::core::{Address, CollectPage, CompositeRecord, RecordSource, Registry};
use crate::utils::error::Result;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::ops::Range;
use std::sync::Arc;

/// 計算分頁視窗 `[offset, min(offset + limit, total))`；空範圍回傳 `None`
pub fn page_window(offset: u64, limit: u64, total: u64) -> Option<Range<u64>> {
    if limit == 0 || offset >= total {
        return None;
    }
    let end = offset.saturating_add(limit).min(total);
    Some(offset..end)
}

/// 走訪 registry 某類型的一段位址並逐一組裝
pub struct Collector<R: Registry, S: RecordSource> {
    registry: Arc<R>,
    aggregator: Aggregator<S>,
    concurrent_requests: usize,
}

impl<R: Registry, S: RecordSource> Collector<R, S> {
    pub fn new(registry: Arc<R>, aggregator: Aggregator<S>, concurrent_requests: usize) -> Self {
        Self {
            registry,
            aggregator,
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    pub fn aggregator(&self) -> &Aggregator<S> {
        &self.aggregator
    }

    pub async fn collect(
        &self,
        type_tag: u64,
        offset: u64,
        limit: u64,
        requester: Option<Address>,
    ) -> Result<Vec<CompositeRecord>> {
        let total = self.registry.count_of(type_tag).await?;
        self.collect_window(type_tag, offset, limit, total, requester).await
    }

    /// 與 `collect` 相同，但附帶總數與查詢時間
    pub async fn collect_page(
        &self,
        type_tag: u64,
        offset: u64,
        limit: u64,
        requester: Option<Address>,
    ) -> Result<CollectPage> {
        let total = self.registry.count_of(type_tag).await?;
        let records = self
            .collect_window(type_tag, offset, limit, total, requester)
            .await?;

        Ok(CollectPage {
            type_tag,
            offset,
            limit,
            total,
            fetched_at: chrono::Utc::now(),
            records,
        })
    }

    async fn collect_window(
        &self,
        type_tag: u64,
        offset: u64,
        limit: u64,
        total: u64,
        requester: Option<Address>,
    ) -> Result<Vec<CompositeRecord>> {
        let Some(window) = page_window(offset, limit, total) else {
            tracing::info!(
                "📭 Empty window for type {} (offset {}, limit {}, total {})",
                type_tag,
                offset,
                limit,
                total
            );
            return Ok(Vec::new());
        };

        tracing::info!(
            "📡 Collecting type {} records [{}, {}) of {}",
            type_tag,
            window.start,
            window.end,
            total
        );

        // buffered 依輸入順序產出結果，與各筆完成先後無關
        let records: Vec<CompositeRecord> = stream::iter(window)
            .map(move |index| async move {
                let record = self.registry.address_at(type_tag, index).await?;
                tracing::debug!("Registry index {} -> {}", index, record);
                self.aggregator.aggregate(record, requester).await
            })
            .buffered(self.concurrent_requests)
            .try_collect()
            .await?;

        tracing::info!("✅ Collected {} records for type {}", records.len(), type_tag);
        Ok(records)
    }
}
