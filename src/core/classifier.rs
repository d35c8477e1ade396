use crate::core::{CapabilityProfile, InterfaceId, RecordAddress, RecordSource};
use std::sync::Arc;

/// 拍賣型 record 的預設介面識別碼（拍賣 getter 選擇器的 XOR）
pub const DEFAULT_AUCTION_INTERFACE_ID: InterfaceId = InterfaceId::new([0x82, 0x0f, 0xab, 0x71]);

/// 固定價格型 record 的預設介面識別碼（固定價格 getter 選擇器的 XOR）
pub const DEFAULT_FLAT_INTERFACE_ID: InterfaceId = InterfaceId::new([0xd5, 0x8e, 0x07, 0x64]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    pub auction: InterfaceId,
    pub flat: InterfaceId,
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self {
            auction: DEFAULT_AUCTION_INTERFACE_ID,
            flat: DEFAULT_FLAT_INTERFACE_ID,
        }
    }
}

pub struct Classifier<S: RecordSource> {
    source: Arc<S>,
    capabilities: CapabilitySet,
}

impl<S: RecordSource> Clone for Classifier<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            capabilities: self.capabilities,
        }
    }
}

impl<S: RecordSource> Classifier<S> {
    pub fn new(source: Arc<S>, capabilities: CapabilitySet) -> Self {
        Self {
            source,
            capabilities,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// 依序探測拍賣型、固定價格型介面；兩者皆宣告時視為拍賣型
    pub async fn classify(&self, record: &RecordAddress) -> CapabilityProfile {
        if self.probe(record, self.capabilities.auction).await {
            return CapabilityProfile::AuctionStyle;
        }
        if self.probe(record, self.capabilities.flat).await {
            return CapabilityProfile::FlatPriceStyle;
        }
        CapabilityProfile::Unrecognized
    }

    // 探測失敗（record 不支援 supportsInterface、revert 等）一律當作不符合
    async fn probe(&self, record: &RecordAddress, interface: InterfaceId) -> bool {
        match self.source.supports(record, interface).await {
            Ok(supported) => supported,
            Err(e) => {
                tracing::debug!("Probe {} on {} failed, treating as unsupported: {}", interface, record, e);
                false
            }
        }
    }
}
