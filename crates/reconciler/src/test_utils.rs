use std::{str::FromStr, sync::Arc, time::Duration};

use bitcoin::Txid;
use bridgewatch_chain::MockChainClient;
use bridgewatch_store::RequestStore;
use bridgewatch_types::{AccountId, BridgeRequest, RequestId, RequestKind, RequestStatus};
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::{ctx::ReconcilerCtx, watchers::WatcherRegistry};

pub(crate) fn test_txid() -> Txid {
    Txid::from_str("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855").unwrap()
}

pub(crate) fn test_account() -> AccountId {
    test_account_named("alice")
}

pub(crate) fn test_account_named(name: &str) -> AccountId {
    AccountId::new(name).unwrap()
}

fn request(kind: RequestKind, id_byte: u8, creation_height: u64) -> BridgeRequest {
    BridgeRequest {
        id: RequestId::new([id_byte; 32]),
        kind,
        requester: test_account(),
        amount: 50_000,
        vault_btc_address: "bcrt1qvault".to_owned(),
        vault_account: test_account_named("vault"),
        creation_height,
        btc_txid: None,
        confirmations: 0,
        status: RequestStatus::Pending,
    }
}

pub(crate) fn issue_request(id_byte: u8, creation_height: u64) -> BridgeRequest {
    request(RequestKind::Issue, id_byte, creation_height)
}

pub(crate) fn redeem_request(id_byte: u8, creation_height: u64) -> BridgeRequest {
    request(RequestKind::Redeem, id_byte, creation_height)
}

/// Builds a reconciler context around a mock client, with the account
/// channel initialized to the test account. The sender is returned so tests
/// can switch accounts or keep the channel alive.
pub(crate) fn test_ctx(
    mock_client: MockChainClient,
) -> (
    ReconcilerCtx<MockChainClient>,
    watch::Sender<Option<AccountId>>,
) {
    let (account_tx, account_rx) = watch::channel(Some(test_account()));
    let ctx = ReconcilerCtx {
        client: Arc::new(mock_client),
        store: Arc::new(RequestStore::new()),
        watchers: Arc::new(WatcherRegistry::new()),
        params: Arc::new(RwLock::new(None)),
        account_rx,
        poll_interval: Duration::from_millis(100),
        sync_interval: Duration::from_millis(100),
    };
    (ctx, account_tx)
}
