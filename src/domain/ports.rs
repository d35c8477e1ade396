use crate::domain::model::{Address, InterfaceId, RecordAddress};
use crate::domain::query::{QueryValue, RecordQuery};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 依類型索引 record 位址的外部目錄
#[async_trait]
pub trait Registry: Send + Sync {
    async fn count_of(&self, type_tag: u64) -> Result<u64>;
    async fn address_at(&self, type_tag: u64, index: u64) -> Result<RecordAddress>;
}

/// Record 的唯讀查詢介面
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn supports(&self, record: &RecordAddress, interface: InterfaceId) -> Result<bool>;
    async fn read(&self, record: &RecordAddress, query: RecordQuery) -> Result<QueryValue>;
}

pub trait ConfigProvider: Send + Sync {
    fn rpc_endpoint(&self) -> &str;
    fn registry_address(&self) -> Option<Address>;
    fn concurrent_requests(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn auction_interface_id(&self) -> InterfaceId;
    fn flat_interface_id(&self) -> InterfaceId;
    fn headers(&self) -> &HashMap<String, String>;
}
