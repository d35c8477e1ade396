use crate::adapters::abi::{self, Token};
use crate::core::{
    Address, ConfigProvider, InterfaceId, QueryValue, RecordAddress, RecordQuery, RecordSource, Registry,
};
use crate::utils::error::{LensError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// 以 Ethereum JSON-RPC `eth_call` 讀取 registry 與 record
pub struct RpcClient {
    client: Client,
    endpoint: String,
    registry: Option<Address>,
    headers: HashMap<String, String>,
    timeout: Duration,
    permits: Arc<Semaphore>,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(endpoint: String, registry: Option<Address>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            registry,
            headers: HashMap::new(),
            timeout: Duration::from_secs(30),
            permits: Arc::new(Semaphore::new(8)),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.rpc_endpoint().to_string(), config.registry_address())
            .with_timeout(Duration::from_secs(config.timeout_seconds()))
            .with_concurrency(config.concurrent_requests())
            .with_headers(config.headers().clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 同時進行中的 HTTP 請求上限
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    fn registry(&self) -> Result<Address> {
        self.registry.ok_or_else(|| LensError::MissingConfigError {
            field: "registry.address".to_string(),
        })
    }

    /// 對 `to` 執行 `eth_call`，回傳原始 return data
    async fn eth_call(&self, to: &Address, data: Vec<u8>, query: &str) -> Result<Vec<u8>> {
        let target = to.to_string();
        let fail = |reason: String| LensError::external(target.clone(), query, reason);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [
                { "to": target.as_str(), "data": format!("0x{}", hex::encode(&data)) },
                "latest"
            ]
        });

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| fail(format!("request slot unavailable: {}", e)))?;

        let mut request = self.client.post(&self.endpoint).json(&body).timeout(self.timeout);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        tracing::trace!("📡 eth_call #{} {} {}", id, target, query);
        let response = request.send().await.map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(format!("HTTP status {}", response.status())));
        }

        let reply: RpcResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("malformed JSON-RPC response: {}", e)))?;

        if let Some(error) = reply.error {
            return Err(fail(format!("rpc error {}: {}", error.code, error.message)));
        }

        let result = reply
            .result
            .ok_or_else(|| fail("response carries neither result nor error".to_string()))?;
        let digits = result.strip_prefix("0x").unwrap_or(&result);
        hex::decode(digits).map_err(|e| fail(format!("result is not hex: {}", e)))
    }

    async fn call(&self, to: &Address, signature: &str, args: &[Token]) -> Result<Vec<u8>> {
        let data = abi::encode_call(signature, args)
            .map_err(|e| LensError::external(to.to_string(), signature, e.to_string()))?;
        self.eth_call(to, data, signature).await
    }
}

#[async_trait]
impl RecordSource for RpcClient {
    async fn supports(&self, record: &RecordAddress, interface: InterfaceId) -> Result<bool> {
        let data = self
            .call(record, abi::SUPPORTS_INTERFACE, &[Token::Bytes4(interface)])
            .await?;
        abi::decode_bool(&data)
            .map_err(|e| LensError::external(record.to_string(), abi::SUPPORTS_INTERFACE, e.to_string()))
    }

    async fn read(&self, record: &RecordAddress, query: RecordQuery) -> Result<QueryValue> {
        let label = query.to_string();
        let data = abi::encode_query(&query)
            .map_err(|e| LensError::external(record.to_string(), label.as_str(), e.to_string()))?;
        let returned = self.eth_call(record, data, &label).await?;
        abi::decode_value(query.kind(), &returned)
            .map_err(|e| LensError::external(record.to_string(), label.as_str(), e.to_string()))
    }
}

#[async_trait]
impl Registry for RpcClient {
    async fn count_of(&self, type_tag: u64) -> Result<u64> {
        let registry = self.registry()?;
        let data = self
            .call(&registry, abi::COUNT_OF, &[Token::Uint(type_tag.into())])
            .await?;
        abi::decode_u64(&data)
            .map_err(|e| LensError::external(registry.to_string(), abi::COUNT_OF, e.to_string()))
    }

    async fn address_at(&self, type_tag: u64, index: u64) -> Result<RecordAddress> {
        let registry = self.registry()?;
        let data = self
            .call(
                &registry,
                abi::ADDRESS_AT,
                &[Token::Uint(type_tag.into()), Token::Uint(index.into())],
            )
            .await?;
        abi::decode_address(&data)
            .map_err(|e| LensError::external(registry.to_string(), abi::ADDRESS_AT, e.to_string()))
    }
}
