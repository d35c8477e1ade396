use crate::utils::error::LensError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 20 位元組的鏈上位址，用於 record、registry 與 requester 身分
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_prefixed_hex("address", s)?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| LensError::InvalidConfigValueError {
                field: "address".to_string(),
                value: s.to_string(),
                reason: format!("expected 20 bytes, got {}", b.len()),
            })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 指向單一 launch record 的位址
pub type RecordAddress = Address;

/// ERC-165 風格的 4 位元組能力識別碼
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InterfaceId([u8; 4]);

impl InterfaceId {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceId({})", self)
    }
}

impl FromStr for InterfaceId {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_prefixed_hex("interface_id", s)?;
        let bytes: [u8; 4] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| LensError::InvalidConfigValueError {
                field: "interface_id".to_string(),
                value: s.to_string(),
                reason: format!("expected 4 bytes, got {}", b.len()),
            })?;
        Ok(Self(bytes))
    }
}

impl Serialize for InterfaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InterfaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn decode_prefixed_hex(field: &str, s: &str) -> Result<Vec<u8>, LensError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| LensError::InvalidConfigValueError {
        field: field.to_string(),
        value: s.to_string(),
        reason: format!("invalid hex: {}", e),
    })
}

/// Record 對外宣告的能力類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityProfile {
    Unrecognized,
    AuctionStyle,
    FlatPriceStyle,
}

impl fmt::Display for CapabilityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CapabilityProfile::Unrecognized => "unrecognized",
            CapabilityProfile::AuctionStyle => "auction_style",
            CapabilityProfile::FlatPriceStyle => "flat_price_style",
        };
        f.write_str(label)
    }
}

/// u128 以十進位字串序列化，避免 JSON 消費端遺失精度
pub mod decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(with = "decimal")]
    pub collection_size: u128,
    #[serde(with = "decimal")]
    pub max_batch_size: u128,
    #[serde(with = "decimal")]
    pub total_supply: u128,
    pub unrevealed_uri: String,
    pub base_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSchedule {
    #[serde(with = "decimal")]
    pub reveal_batch_size: u128,
    #[serde(with = "decimal")]
    pub last_token_revealed: u128,
    #[serde(with = "decimal")]
    pub reveal_start_time: u128,
    #[serde(with = "decimal")]
    pub reveal_interval: u128,
}

/// 荷蘭式拍賣 record 的銷售參數；三個價格欄位由 record 本身即時計算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSale {
    pub current_phase: u8,
    #[serde(with = "decimal")]
    pub amount_for_auction: u128,
    #[serde(with = "decimal")]
    pub amount_for_allowlist: u128,
    #[serde(with = "decimal")]
    pub amount_for_devs: u128,
    #[serde(with = "decimal")]
    pub auction_start_time: u128,
    #[serde(with = "decimal")]
    pub allowlist_start_time: u128,
    #[serde(with = "decimal")]
    pub public_sale_start_time: u128,
    #[serde(with = "decimal")]
    pub auction_start_price: u128,
    #[serde(with = "decimal")]
    pub auction_end_price: u128,
    #[serde(with = "decimal")]
    pub auction_price_curve_length: u128,
    #[serde(with = "decimal")]
    pub auction_drop_interval: u128,
    #[serde(with = "decimal")]
    pub auction_drop_per_step: u128,
    #[serde(with = "decimal")]
    pub allowlist_discount_percent: u128,
    #[serde(with = "decimal")]
    pub public_sale_discount_percent: u128,
    #[serde(with = "decimal")]
    pub auction_price: u128,
    #[serde(with = "decimal")]
    pub allowlist_price: u128,
    #[serde(with = "decimal")]
    pub public_sale_price: u128,
    #[serde(with = "decimal")]
    pub minted_during_auction: u128,
    #[serde(with = "decimal")]
    pub minted_during_allowlist: u128,
    #[serde(with = "decimal")]
    pub minted_during_public_sale: u128,
    #[serde(with = "decimal")]
    pub last_auction_price: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatPriceSale {
    pub current_phase: u8,
    #[serde(with = "decimal")]
    pub amount_for_allowlist: u128,
    #[serde(with = "decimal")]
    pub amount_for_devs: u128,
    #[serde(with = "decimal")]
    pub allowlist_start_time: u128,
    #[serde(with = "decimal")]
    pub public_sale_start_time: u128,
    #[serde(with = "decimal")]
    pub allowlist_price: u128,
    #[serde(with = "decimal")]
    pub public_sale_price: u128,
    #[serde(with = "decimal")]
    pub minted_during_allowlist: u128,
    #[serde(with = "decimal")]
    pub minted_during_public_sale: u128,
}

/// 依 profile 區分的銷售參數，只會有一種被填入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "profile", content = "params", rename_all = "snake_case")]
pub enum SaleParameters {
    AuctionStyle(AuctionSale),
    FlatPriceStyle(FlatPriceSale),
}

impl SaleParameters {
    pub fn profile(&self) -> CapabilityProfile {
        match self {
            SaleParameters::AuctionStyle(_) => CapabilityProfile::AuctionStyle,
            SaleParameters::FlatPriceStyle(_) => CapabilityProfile::FlatPriceStyle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub requester: Address,
    #[serde(with = "decimal")]
    pub balance: u128,
    #[serde(with = "decimal")]
    pub number_minted: u128,
    #[serde(with = "decimal")]
    pub allowlist_allowance: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRecord {
    pub record: RecordAddress,
    pub metadata: CollectionMetadata,
    pub reveal: RevealSchedule,
    pub sale: SaleParameters,
    pub participation: Option<Participation>,
}

impl CompositeRecord {
    pub fn profile(&self) -> CapabilityProfile {
        self.sale.profile()
    }
}

/// `collect` 一次分頁查詢的輸出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectPage {
    pub type_tag: u64,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<CompositeRecord>,
}
