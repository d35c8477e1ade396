pub mod aggregator;
pub mod classifier;
pub mod collector;
pub mod lens;

#[cfg(test)]
pub(crate) mod stub;

pub use crate::domain::model::{
    Address, AuctionSale, CapabilityProfile, CollectPage, CollectionMetadata, CompositeRecord,
    FlatPriceSale, InterfaceId, Participation, RecordAddress, RevealSchedule, SaleParameters,
};
pub use crate::domain::ports::{ConfigProvider, RecordSource, Registry};
pub use crate::domain::query::{QueryValue, RecordQuery};
pub use crate::utils::error::Result;
