//! In-memory registry and record source for core tests.

use crate::core::classifier::{DEFAULT_AUCTION_INTERFACE_ID, DEFAULT_FLAT_INTERFACE_ID};
use crate::core::{Address, InterfaceId, QueryValue, RecordQuery, RecordSource, Registry};
use crate::domain::query::{AuctionField, ParticipationField, ValueKind};
use crate::utils::error::{LensError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const STUB_AUCTION_START_TIME: u128 = 1_000;

#[derive(Debug, Clone, Default)]
pub struct StubRecord {
    interfaces: Vec<InterfaceId>,
    failing_probes: bool,
    fail_all_reads: bool,
    failing_read: Option<RecordQuery>,
    delay: Option<Duration>,
}

impl StubRecord {
    pub fn auction() -> Self {
        Self {
            interfaces: vec![DEFAULT_AUCTION_INTERFACE_ID],
            ..Self::default()
        }
    }

    pub fn flat() -> Self {
        Self {
            interfaces: vec![DEFAULT_FLAT_INTERFACE_ID],
            ..Self::default()
        }
    }

    pub fn unrecognized() -> Self {
        Self::default()
    }

    pub fn also_supporting(mut self, interface: InterfaceId) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_failing_probes(mut self) -> Self {
        self.failing_probes = true;
        self
    }

    pub fn with_failing_reads(mut self) -> Self {
        self.fail_all_reads = true;
        self
    }

    pub fn failing_on(mut self, query: RecordQuery) -> Self {
        self.failing_read = Some(query);
        self
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }
}

#[derive(Default)]
pub struct StubChain {
    records: HashMap<Address, StubRecord>,
    listings: HashMap<u64, Vec<Address>>,
    reads: Mutex<Vec<(Address, RecordQuery)>>,
    probes: AtomicUsize,
    lookups: AtomicUsize,
}

impl StubChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, address: Address, record: StubRecord) -> Self {
        self.records.insert(address, record);
        self
    }

    pub fn with_listing(mut self, type_tag: u64, addresses: Vec<Address>) -> Self {
        self.listings.insert(type_tag, addresses);
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> Vec<(Address, RecordQuery)> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn read_count(&self) -> usize {
        self.reads().len()
    }

    pub fn reads_for(&self, address: &Address) -> Vec<RecordQuery> {
        self.reads()
            .into_iter()
            .filter(|(a, _)| a == address)
            .map(|(_, q)| q)
            .collect()
    }

    fn record(&self, address: &Address, query: &str) -> Result<&StubRecord> {
        self.records
            .get(address)
            .ok_or_else(|| LensError::external(address.to_string(), query, "no contract at address"))
    }
}

fn stub_value(query: &RecordQuery) -> QueryValue {
    match query.kind() {
        ValueKind::Text => QueryValue::Text(query.signature().to_string()),
        ValueKind::Phase => QueryValue::Phase(1),
        ValueKind::Uint => QueryValue::Uint(match query {
            RecordQuery::Auction(AuctionField::AuctionStartTime) => STUB_AUCTION_START_TIME,
            RecordQuery::Auction(AuctionField::AuctionPrice { start_time }) => start_time * 2,
            RecordQuery::Participation(ParticipationField::Balance, _) => 3,
            RecordQuery::Participation(ParticipationField::NumberMinted, _) => 4,
            RecordQuery::Participation(ParticipationField::AllowlistAllowance, _) => 5,
            _ => 7,
        }),
    }
}

#[async_trait]
impl RecordSource for StubChain {
    async fn supports(&self, record: &Address, interface: InterfaceId) -> Result<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let stub = self.record(record, "supportsInterface(bytes4)")?;
        if stub.failing_probes {
            return Err(LensError::external(
                record.to_string(),
                "supportsInterface(bytes4)",
                "execution reverted",
            ));
        }
        Ok(stub.interfaces.contains(&interface))
    }

    async fn read(&self, record: &Address, query: RecordQuery) -> Result<QueryValue> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push((*record, query));
        }
        let stub = self.record(record, query.signature())?.clone();
        if let Some(delay) = stub.delay {
            tokio::time::sleep(delay).await;
        }
        if stub.fail_all_reads || stub.failing_read == Some(query) {
            return Err(LensError::external(
                record.to_string(),
                query.to_string(),
                "execution reverted",
            ));
        }
        Ok(stub_value(&query))
    }
}

#[async_trait]
impl Registry for StubChain {
    async fn count_of(&self, type_tag: u64) -> Result<u64> {
        Ok(self.listings.get(&type_tag).map_or(0, |l| l.len() as u64))
    }

    async fn address_at(&self, type_tag: u64, index: u64) -> Result<Address> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.listings
            .get(&type_tag)
            .and_then(|l| l.get(index as usize))
            .copied()
            .ok_or_else(|| {
                LensError::external("registry", format!("addressAt({}, {})", type_tag, index), "index out of bounds")
            })
    }
}
