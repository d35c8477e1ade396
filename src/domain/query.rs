use crate::domain::model::Address;
use crate::utils::error::{LensError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionField {
    Name,
    Symbol,
    CollectionSize,
    MaxBatchSize,
    TotalSupply,
    UnrevealedUri,
    BaseUri,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealField {
    BatchSize,
    LastTokenRevealed,
    StartTime,
    Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionField {
    AmountForAuction,
    AmountForAllowlist,
    AmountForDevs,
    AuctionStartTime,
    AllowlistStartTime,
    PublicSaleStartTime,
    StartPrice,
    EndPrice,
    PriceCurveLength,
    DropInterval,
    DropPerStep,
    AllowlistDiscountPercent,
    PublicSaleDiscountPercent,
    CurrentPhase,
    /// 由 record 依拍賣起始時間即時計算的目前價格
    AuctionPrice { start_time: u128 },
    AllowlistPrice,
    PublicSalePrice,
    MintedDuringAuction,
    MintedDuringAllowlist,
    MintedDuringPublicSale,
    LastAuctionPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlatField {
    CurrentPhase,
    AmountForAllowlist,
    AmountForDevs,
    AllowlistStartTime,
    PublicSaleStartTime,
    AllowlistPrice,
    SalePrice,
    MintedDuringAllowlist,
    MintedDuringPublicSale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipationField {
    Balance,
    NumberMinted,
    AllowlistAllowance,
}

/// Record 對外提供的唯讀查詢，依介面分組
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordQuery {
    Collection(CollectionField),
    Reveal(RevealField),
    Auction(AuctionField),
    Flat(FlatField),
    Participation(ParticipationField, Address),
}

/// 查詢回傳值的型別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Uint,
    Phase,
    Text,
}

impl RecordQuery {
    /// Record 上對應 getter 的函式簽章
    pub fn signature(&self) -> &'static str {
        match self {
            RecordQuery::Collection(field) => match field {
                CollectionField::Name => "name()",
                CollectionField::Symbol => "symbol()",
                CollectionField::CollectionSize => "collectionSize()",
                CollectionField::MaxBatchSize => "maxBatchSize()",
                CollectionField::TotalSupply => "totalSupply()",
                CollectionField::UnrevealedUri => "unrevealedURI()",
                CollectionField::BaseUri => "baseURI()",
            },
            RecordQuery::Reveal(field) => match field {
                RevealField::BatchSize => "revealBatchSize()",
                RevealField::LastTokenRevealed => "lastTokenRevealed()",
                RevealField::StartTime => "revealStartTime()",
                RevealField::Interval => "revealInterval()",
            },
            RecordQuery::Auction(field) => match field {
                AuctionField::AmountForAuction => "amountForAuction()",
                AuctionField::AmountForAllowlist => "amountForAllowlist()",
                AuctionField::AmountForDevs => "amountForDevs()",
                AuctionField::AuctionStartTime => "auctionSaleStartTime()",
                AuctionField::AllowlistStartTime => "allowlistStartTime()",
                AuctionField::PublicSaleStartTime => "publicSaleStartTime()",
                AuctionField::StartPrice => "auctionStartPrice()",
                AuctionField::EndPrice => "auctionEndPrice()",
                AuctionField::PriceCurveLength => "auctionPriceCurveLength()",
                AuctionField::DropInterval => "auctionDropInterval()",
                AuctionField::DropPerStep => "auctionDropPerStep()",
                AuctionField::AllowlistDiscountPercent => "allowlistDiscountPercent()",
                AuctionField::PublicSaleDiscountPercent => "publicSaleDiscountPercent()",
                AuctionField::CurrentPhase => "currentPhase()",
                AuctionField::AuctionPrice { .. } => "getAuctionPrice(uint256)",
                AuctionField::AllowlistPrice => "getAllowlistPrice()",
                AuctionField::PublicSalePrice => "getPublicSalePrice()",
                AuctionField::MintedDuringAuction => "amountMintedDuringAuction()",
                AuctionField::MintedDuringAllowlist => "amountMintedDuringAllowlist()",
                AuctionField::MintedDuringPublicSale => "amountMintedDuringPublicSale()",
                AuctionField::LastAuctionPrice => "lastAuctionPrice()",
            },
            RecordQuery::Flat(field) => match field {
                FlatField::CurrentPhase => "currentPhase()",
                FlatField::AmountForAllowlist => "amountForAllowlist()",
                FlatField::AmountForDevs => "amountForDevs()",
                FlatField::AllowlistStartTime => "allowlistStartTime()",
                FlatField::PublicSaleStartTime => "publicSaleStartTime()",
                FlatField::AllowlistPrice => "allowlistPrice()",
                FlatField::SalePrice => "salePrice()",
                FlatField::MintedDuringAllowlist => "amountMintedDuringAllowlist()",
                FlatField::MintedDuringPublicSale => "amountMintedDuringPublicSale()",
            },
            RecordQuery::Participation(field, _) => match field {
                ParticipationField::Balance => "balanceOf(address)",
                ParticipationField::NumberMinted => "numberMinted(address)",
                ParticipationField::AllowlistAllowance => "allowlistAllowance(address)",
            },
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            RecordQuery::Collection(
                CollectionField::Name
                | CollectionField::Symbol
                | CollectionField::UnrevealedUri
                | CollectionField::BaseUri,
            ) => ValueKind::Text,
            RecordQuery::Auction(AuctionField::CurrentPhase)
            | RecordQuery::Flat(FlatField::CurrentPhase) => ValueKind::Phase,
            _ => ValueKind::Uint,
        }
    }
}

impl fmt::Display for RecordQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordQuery::Auction(AuctionField::AuctionPrice { start_time }) => {
                write!(f, "getAuctionPrice({})", start_time)
            }
            RecordQuery::Participation(_, identity) => {
                let signature = self.signature();
                let name = signature.trim_end_matches("(address)");
                write!(f, "{}({})", name, identity)
            }
            _ => f.write_str(self.signature()),
        }
    }
}

/// 外部讀取的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Uint(u128),
    Phase(u8),
    Text(String),
}

impl QueryValue {
    pub fn into_uint(self, record: &Address, query: &RecordQuery) -> Result<u128> {
        match self {
            QueryValue::Uint(value) => Ok(value),
            other => Err(mismatch(record, query, "uint", &other)),
        }
    }

    pub fn into_phase(self, record: &Address, query: &RecordQuery) -> Result<u8> {
        match self {
            QueryValue::Phase(value) => Ok(value),
            other => Err(mismatch(record, query, "phase", &other)),
        }
    }

    pub fn into_text(self, record: &Address, query: &RecordQuery) -> Result<String> {
        match self {
            QueryValue::Text(value) => Ok(value),
            other => Err(mismatch(record, query, "text", &other)),
        }
    }
}

fn mismatch(record: &Address, query: &RecordQuery, expected: &str, got: &QueryValue) -> LensError {
    LensError::external(
        record.to_string(),
        query.to_string(),
        format!("expected {} value, got {:?}", expected, got),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kinds() {
        assert_eq!(
            RecordQuery::Collection(CollectionField::Name).kind(),
            ValueKind::Text
        );
        assert_eq!(
            RecordQuery::Flat(FlatField::CurrentPhase).kind(),
            ValueKind::Phase
        );
        assert_eq!(
            RecordQuery::Auction(AuctionField::AuctionPrice { start_time: 5 }).kind(),
            ValueKind::Uint
        );
    }

    #[test]
    fn test_query_display_includes_arguments() {
        let query = RecordQuery::Auction(AuctionField::AuctionPrice { start_time: 1_700_000_000 });
        assert_eq!(query.to_string(), "getAuctionPrice(1700000000)");

        let identity = Address::new([0x11; 20]);
        let query = RecordQuery::Participation(ParticipationField::NumberMinted, identity);
        assert_eq!(
            query.to_string(),
            format!("numberMinted({})", identity)
        );
    }

    #[test]
    fn test_value_mismatch_is_external_failure() {
        let record = Address::new([0x22; 20]);
        let query = RecordQuery::Collection(CollectionField::Name);
        let err = QueryValue::Uint(3).into_text(&record, &query).unwrap_err();
        assert!(err.is_external());
    }
}
