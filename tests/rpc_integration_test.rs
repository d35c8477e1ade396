use httpmock::prelude::*;
use httpmock::Mock;
use launch_lens::{
    Address, CapabilityProfile, CapabilitySet, LaunchLens, LensError, RpcClient, SaleParameters,
};
use std::sync::Arc;

const AUCTION_PROBE: &str = "01ffc9a7820fab71";
const FLAT_PROBE: &str = "01ffc9a7d58e0764";

fn record() -> Address {
    Address::new([0x11; 20])
}

fn registry() -> Address {
    Address::new([0x22; 20])
}

fn word(value: u128) -> String {
    format!("{:064x}", value)
}

fn abi_string(s: &str) -> String {
    let mut data = hex::encode(s);
    while data.len() % 64 != 0 {
        data.push('0');
    }
    format!("{}{}{}", word(32), word(s.len() as u128), data)
}

async fn mock_call<'a>(server: &'a MockServer, fragment: &str, result: String) -> Mock<'a> {
    let fragment = fragment.to_string();
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains(fragment);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": format!("0x{}", result)
                }));
        })
        .await
}

async fn mock_revert<'a>(server: &'a MockServer, fragment: &str) -> Mock<'a> {
    let fragment = fragment.to_string();
    server
        .mock_async(|when, then| {
            when.method(POST).path("/").body_contains(fragment);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": 3, "message": "execution reverted" }
                }));
        })
        .await
}

/// Collection, reveal and flat-price getters, except the ones listed in `skip`.
async fn mock_flat_getters(server: &MockServer, skip: &[&str]) {
    let getters = [
        ("06fdde03", abi_string("Lumen Drop")),
        ("95d89b41", abi_string("LUMEN")),
        ("45c0f533", word(5_000)),
        ("2913daa0", word(5)),
        ("18160ddd", word(1_234)),
        ("7035bf18", abi_string("ipfs://unrevealed")),
        ("6c0360eb", abi_string("ipfs://base/")),
        ("0b564810", word(100)),
        ("f4319195", word(499)),
        ("cc0bef84", word(1_700_100_000)),
        ("247cd8ad", word(3_600)),
        ("055ad42e", word(2)),
        ("d62b6303", word(1_000)),
        ("fbe1aa51", word(50)),
        ("59d7bc4d", word(1_700_000_000)),
        ("6bb7b1d9", word(1_700_086_400)),
        ("90967a52", word(50_000_000_000_000_000)),
        ("f51f96dd", word(80_000_000_000_000_000)),
        ("3cc4cadb", word(900)),
        ("963331d8", word(334)),
    ];
    for (selector, result) in getters {
        if !skip.contains(&selector) {
            mock_call(server, selector, result).await;
        }
    }
}

fn lens(server: &MockServer) -> LaunchLens<RpcClient, RpcClient> {
    let client = Arc::new(RpcClient::new(server.url("/"), Some(registry())).with_concurrency(4));
    LaunchLens::new(Arc::clone(&client), client, CapabilitySet::default(), 4)
}

#[tokio::test]
async fn test_classify_flat_record_over_rpc() {
    let server = MockServer::start_async().await;
    let auction_probe = mock_call(&server, AUCTION_PROBE, word(0)).await;
    let flat_probe = mock_call(&server, FLAT_PROBE, word(1)).await;

    let profile = lens(&server).classify(&record()).await;

    assert_eq!(profile, CapabilityProfile::FlatPriceStyle);
    auction_probe.assert_async().await;
    flat_probe.assert_async().await;
}

#[tokio::test]
async fn test_aggregate_flat_record_with_requester() {
    let server = MockServer::start_async().await;
    mock_call(&server, AUCTION_PROBE, word(0)).await;
    mock_call(&server, FLAT_PROBE, word(1)).await;
    mock_flat_getters(&server, &[]).await;
    mock_call(&server, "70a08231", word(3)).await;
    mock_call(&server, "dc33e681", word(4)).await;
    mock_call(&server, "b98eb8d4", word(1)).await;

    let requester = Address::new([0x33; 20]);
    let composite = lens(&server)
        .aggregate(record(), Some(requester))
        .await
        .unwrap();

    assert_eq!(composite.record, record());
    assert_eq!(composite.metadata.name, "Lumen Drop");
    assert_eq!(composite.metadata.symbol, "LUMEN");
    assert_eq!(composite.metadata.collection_size, 5_000);
    assert_eq!(composite.metadata.base_uri, "ipfs://base/");
    assert_eq!(composite.reveal.last_token_revealed, 499);
    assert_eq!(composite.reveal.reveal_interval, 3_600);

    let SaleParameters::FlatPriceStyle(sale) = &composite.sale else {
        panic!("expected flat-price parameters, got {:?}", composite.sale);
    };
    assert_eq!(sale.current_phase, 2);
    assert_eq!(sale.public_sale_price, 80_000_000_000_000_000);
    assert_eq!(sale.minted_during_allowlist, 900);

    let participation = composite.participation.as_ref().unwrap();
    assert_eq!(participation.requester, requester);
    assert_eq!(participation.balance, 3);
    assert_eq!(participation.number_minted, 4);
    assert_eq!(participation.allowlist_allowance, 1);

    let json = serde_json::to_value(&composite).unwrap();
    assert_eq!(json["sale"]["profile"], "flat_price_style");
    assert_eq!(json["sale"]["params"]["public_sale_price"], "80000000000000000");
}

#[tokio::test]
async fn test_reverting_probes_yield_unrecognized_without_reads() {
    let server = MockServer::start_async().await;
    mock_revert(&server, AUCTION_PROBE).await;
    mock_revert(&server, FLAT_PROBE).await;
    let name = mock_call(&server, "06fdde03", abi_string("never read")).await;

    let err = lens(&server).aggregate(record(), None).await.unwrap_err();

    assert!(matches!(err, LensError::UnrecognizedRecord { record: r } if r == record()));
    assert_eq!(name.hits_async().await, 0);
}

#[tokio::test]
async fn test_reverting_getter_fails_aggregate() {
    let server = MockServer::start_async().await;
    mock_call(&server, AUCTION_PROBE, word(0)).await;
    mock_call(&server, FLAT_PROBE, word(1)).await;
    mock_flat_getters(&server, &["f51f96dd"]).await;
    mock_revert(&server, "f51f96dd").await;

    let err = lens(&server).aggregate(record(), None).await.unwrap_err();

    assert!(err.is_external());
    let message = err.to_string();
    assert!(message.contains("salePrice()"), "{}", message);
    assert!(message.contains("execution reverted"), "{}", message);
}

#[tokio::test]
async fn test_malformed_return_data_fails_aggregate() {
    let server = MockServer::start_async().await;
    mock_call(&server, AUCTION_PROBE, word(0)).await;
    mock_call(&server, FLAT_PROBE, word(1)).await;
    mock_flat_getters(&server, &["45c0f533"]).await;
    // Half a word
    mock_call(&server, "45c0f533", "00".repeat(16)).await;

    let err = lens(&server).aggregate(record(), None).await.unwrap_err();
    assert!(err.is_external());
    assert!(err.to_string().contains("collectionSize()"));
}

#[tokio::test]
async fn test_collect_walks_registry() {
    let server = MockServer::start_async().await;
    let count = mock_call(&server, "d50d59a9", word(1)).await;
    let lookup = mock_call(
        &server,
        "7886f09a",
        format!("{:0>64}", hex::encode(record().as_bytes())),
    )
    .await;
    mock_call(&server, AUCTION_PROBE, word(0)).await;
    mock_call(&server, FLAT_PROBE, word(1)).await;
    mock_flat_getters(&server, &[]).await;

    let page = lens(&server).collect_page(1, 0, 10, None).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].record, record());
    assert!(page.records[0].participation.is_none());
    count.assert_async().await;
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_collect_offset_past_total_is_empty() {
    let server = MockServer::start_async().await;
    mock_call(&server, "d50d59a9", word(3)).await;
    let lookup = mock_call(&server, "7886f09a", word(0)).await;

    let records = lens(&server).collect(1, 5, 10, None).await.unwrap();

    assert!(records.is_empty());
    assert_eq!(lookup.hits_async().await, 0);
}

#[tokio::test]
async fn test_registry_http_failure_is_external() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(500);
        })
        .await;

    let err = lens(&server).collect(1, 0, 10, None).await.unwrap_err();
    assert!(err.is_external());
    assert!(err.to_string().contains("countOf(uint256)"));
}

#[tokio::test]
async fn test_collect_without_registry_is_config_error() {
    let server = MockServer::start_async().await;
    let client = Arc::new(RpcClient::new(server.url("/"), None));
    let lens = LaunchLens::new(Arc::clone(&client), client, CapabilitySet::default(), 1);

    let err = lens.collect(1, 0, 10, None).await.unwrap_err();
    assert!(matches!(err, LensError::MissingConfigError { .. }));
}
