//! Minimal Solidity ABI codec for the getters the aggregator reads.
//!
//! Only static `uint256` / `address` / `bytes4` arguments and `uint256`,
//! `bool`, `address` and `string` return values are supported.

use crate::core::{Address, InterfaceId, QueryValue, RecordQuery};
use crate::domain::query::ValueKind;
use thiserror::Error;

const WORD: usize = 32;

pub const SUPPORTS_INTERFACE: &str = "supportsInterface(bytes4)";
pub const COUNT_OF: &str = "countOf(uint256)";
pub const ADDRESS_AT: &str = "addressAt(uint256,uint256)";

/// keccak256(signature) 的前 4 個位元組
const SELECTORS: &[(&str, [u8; 4])] = &[
    ("supportsInterface(bytes4)", [0x01, 0xff, 0xc9, 0xa7]),
    ("countOf(uint256)", [0xd5, 0x0d, 0x59, 0xa9]),
    ("addressAt(uint256,uint256)", [0x78, 0x86, 0xf0, 0x9a]),
    ("name()", [0x06, 0xfd, 0xde, 0x03]),
    ("symbol()", [0x95, 0xd8, 0x9b, 0x41]),
    ("collectionSize()", [0x45, 0xc0, 0xf5, 0x33]),
    ("maxBatchSize()", [0x29, 0x13, 0xda, 0xa0]),
    ("totalSupply()", [0x18, 0x16, 0x0d, 0xdd]),
    ("unrevealedURI()", [0x70, 0x35, 0xbf, 0x18]),
    ("baseURI()", [0x6c, 0x03, 0x60, 0xeb]),
    ("revealBatchSize()", [0x0b, 0x56, 0x48, 0x10]),
    ("lastTokenRevealed()", [0xf4, 0x31, 0x91, 0x95]),
    ("revealStartTime()", [0xcc, 0x0b, 0xef, 0x84]),
    ("revealInterval()", [0x24, 0x7c, 0xd8, 0xad]),
    ("amountForAuction()", [0xf7, 0xdf, 0x4c, 0x5a]),
    ("amountForAllowlist()", [0xd6, 0x2b, 0x63, 0x03]),
    ("amountForDevs()", [0xfb, 0xe1, 0xaa, 0x51]),
    ("auctionSaleStartTime()", [0xfa, 0xb2, 0xbf, 0x58]),
    ("allowlistStartTime()", [0x59, 0xd7, 0xbc, 0x4d]),
    ("publicSaleStartTime()", [0x6b, 0xb7, 0xb1, 0xd9]),
    ("auctionStartPrice()", [0xd7, 0x56, 0x98, 0x5b]),
    ("auctionEndPrice()", [0xa0, 0x4a, 0x6a, 0xc8]),
    ("auctionPriceCurveLength()", [0x8a, 0x9d, 0xaf, 0x2b]),
    ("auctionDropInterval()", [0xf2, 0x43, 0x66, 0x9b]),
    ("auctionDropPerStep()", [0xe6, 0xfe, 0x34, 0xb3]),
    ("allowlistDiscountPercent()", [0x15, 0x48, 0x95, 0x10]),
    ("publicSaleDiscountPercent()", [0x08, 0xa3, 0xfb, 0x4e]),
    ("currentPhase()", [0x05, 0x5a, 0xd4, 0x2e]),
    ("getAuctionPrice(uint256)", [0x91, 0x7d, 0x00, 0x9e]),
    ("getAllowlistPrice()", [0x0b, 0x10, 0x19, 0xe7]),
    ("getPublicSalePrice()", [0x8e, 0x8b, 0xdd, 0x0d]),
    ("amountMintedDuringAuction()", [0xa5, 0x4c, 0xd7, 0xdc]),
    ("amountMintedDuringAllowlist()", [0x3c, 0xc4, 0xca, 0xdb]),
    ("amountMintedDuringPublicSale()", [0x96, 0x33, 0x31, 0xd8]),
    ("lastAuctionPrice()", [0x7a, 0x18, 0xc1, 0xfe]),
    ("allowlistPrice()", [0x90, 0x96, 0x7a, 0x52]),
    ("salePrice()", [0xf5, 0x1f, 0x96, 0xdd]),
    ("balanceOf(address)", [0x70, 0xa0, 0x82, 0x31]),
    ("numberMinted(address)", [0xdc, 0x33, 0xe6, 0x81]),
    ("allowlistAllowance(address)", [0xb9, 0x8e, 0xb8, 0xd4]),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AbiError {
    #[error("no selector known for {0}")]
    UnknownFunction(String),

    #[error("return data too short: need {needed} bytes, got {got}")]
    Short { needed: usize, got: usize },

    #[error("value does not fit in {0}")]
    Overflow(&'static str),

    #[error("invalid bool word")]
    InvalidBool,

    #[error("address word has non-zero padding")]
    DirtyAddress,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Uint(u128),
    Address(Address),
    Bytes4(InterfaceId),
}

impl Token {
    fn word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Token::Uint(value) => word[16..].copy_from_slice(&value.to_be_bytes()),
            Token::Address(address) => word[12..].copy_from_slice(address.as_bytes()),
            Token::Bytes4(id) => word[..4].copy_from_slice(id.as_bytes()),
        }
        word
    }
}

pub fn selector(signature: &str) -> Result<[u8; 4], AbiError> {
    SELECTORS
        .iter()
        .find(|(s, _)| *s == signature)
        .map(|(_, selector)| *selector)
        .ok_or_else(|| AbiError::UnknownFunction(signature.to_string()))
}

pub fn encode_call(signature: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut data = Vec::with_capacity(4 + WORD * args.len());
    data.extend_from_slice(&selector(signature)?);
    for arg in args {
        data.extend_from_slice(&arg.word());
    }
    Ok(data)
}

pub fn encode_query(query: &RecordQuery) -> Result<Vec<u8>, AbiError> {
    use crate::domain::query::AuctionField;

    let args = match query {
        RecordQuery::Auction(AuctionField::AuctionPrice { start_time }) => vec![Token::Uint(*start_time)],
        RecordQuery::Participation(_, identity) => vec![Token::Address(*identity)],
        _ => Vec::new(),
    };
    encode_call(query.signature(), &args)
}

fn word_at(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let end = offset.checked_add(WORD).ok_or(AbiError::Overflow("usize"))?;
    data.get(offset..end).ok_or(AbiError::Short {
        needed: end,
        got: data.len(),
    })
}

fn uint_at(data: &[u8], offset: usize) -> Result<u128, AbiError> {
    let word = word_at(data, offset)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow("u128"));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

pub fn decode_uint(data: &[u8]) -> Result<u128, AbiError> {
    uint_at(data, 0)
}

pub fn decode_u64(data: &[u8]) -> Result<u64, AbiError> {
    u64::try_from(decode_uint(data)?).map_err(|_| AbiError::Overflow("u64"))
}

pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    match decode_uint(data)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(AbiError::InvalidBool),
    }
}

pub fn decode_address(data: &[u8]) -> Result<Address, AbiError> {
    let word = word_at(data, 0)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(AbiError::DirtyAddress);
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Address::new(bytes))
}

pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    let offset = usize::try_from(decode_uint(data)?).map_err(|_| AbiError::Overflow("usize"))?;
    let length = usize::try_from(uint_at(data, offset)?).map_err(|_| AbiError::Overflow("usize"))?;
    let start = offset + WORD;
    let end = start.checked_add(length).ok_or(AbiError::Overflow("usize"))?;
    let bytes = data.get(start..end).ok_or(AbiError::Short {
        needed: end,
        got: data.len(),
    })?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

pub fn decode_value(kind: ValueKind, data: &[u8]) -> Result<QueryValue, AbiError> {
    match kind {
        ValueKind::Uint => decode_uint(data).map(QueryValue::Uint),
        ValueKind::Phase => {
            let phase = u8::try_from(decode_uint(data)?).map_err(|_| AbiError::Overflow("u8"))?;
            Ok(QueryValue::Phase(phase))
        }
        ValueKind::Text => decode_string(data).map(QueryValue::Text),
    }
}
