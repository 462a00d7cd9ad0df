use std::{future::Future, sync::Arc, time::Duration};

use bridgewatch_chain::{ChainClient, ChainParams};
use bridgewatch_config::ReconcilerConfig;
use bridgewatch_store::RequestStore;
use bridgewatch_types::{AccountId, RequestId};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::debug;

use crate::{
    ctx::ReconcilerCtx, error::ExecuteError, execute::execute_request, task::reconciler_task,
    watchers::WatcherRegistry,
};

/// Handle for steering the reconciler.
///
/// Dropping the handle shuts the reconciler down: the account channel
/// closes and every task winds down on its next cycle.
#[expect(
    missing_debug_implementations,
    reason = "client type is not required to implement Debug"
)]
pub struct ReconcilerHandle<TClient> {
    client: Arc<TClient>,
    store: Arc<RequestStore>,
    params: Arc<RwLock<Option<ChainParams>>>,
    account_tx: watch::Sender<Option<AccountId>>,
}

impl<TClient: ChainClient> ReconcilerHandle<TClient> {
    /// The store this reconciler writes into.
    pub fn store(&self) -> &Arc<RequestStore> {
        &self.store
    }

    /// Switches the active account. The previous account's records are
    /// dropped and its watchers wind down; `None` pauses tracking.
    pub fn set_active_account(&self, account: Option<AccountId>) {
        self.account_tx.send_if_modified(|current| {
            if *current == account {
                return false;
            }
            debug!(?account, "active account changed");
            *current = account;
            true
        });
    }

    /// Executes a confirmed request for the active account.
    ///
    /// Preconditions are checked against the latest store record before any
    /// network call; see [`ExecuteError`] for the ways this can fail.
    pub async fn execute(&self, id: RequestId) -> Result<(), ExecuteError> {
        let account = self
            .account_tx
            .borrow()
            .clone()
            .ok_or(ExecuteError::NoActiveAccount)?;

        // The sync pass caches the chain constants; only a never-synced
        // reconciler has to fetch them here.
        let required_confirmations = match *self.params.read() {
            Some(params) => params.required_confirmations,
            None => self.client.required_confirmations().await?,
        };

        execute_request(
            self.client.as_ref(),
            &self.store,
            &account,
            id,
            required_confirmations,
        )
        .await
    }
}

/// Builder for the reconciler: one background future plus a handle.
#[expect(
    missing_debug_implementations,
    reason = "client type is not required to implement Debug"
)]
pub struct ReconcilerBuilder<TClient> {
    client: Arc<TClient>,
    store: Arc<RequestStore>,
    config: ReconcilerConfig,
}

impl<TClient> ReconcilerBuilder<TClient>
where
    TClient: ChainClient + 'static,
{
    pub fn new(client: Arc<TClient>, store: Arc<RequestStore>, config: ReconcilerConfig) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    /// Builds the handle and the reconciler future. The caller spawns the
    /// future on its runtime; it runs until the handle is dropped.
    pub fn build(self) -> (ReconcilerHandle<TClient>, impl Future<Output = ()>) {
        let (account_tx, account_rx) = watch::channel(None);
        let params = Arc::new(RwLock::new(None));

        let ctx = ReconcilerCtx {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
            watchers: Arc::new(WatcherRegistry::new()),
            params: Arc::clone(&params),
            account_rx,
            poll_interval: Duration::from_millis(self.config.poll_interval_ms),
            sync_interval: Duration::from_millis(self.config.sync_interval_ms),
        };

        let handle = ReconcilerHandle {
            client: self.client,
            store: self.store,
            params,
            account_tx,
        };

        (handle, reconciler_task(ctx))
    }
}

#[cfg(test)]
mod tests {
    use bridgewatch_chain::MockChainClient;
    use bridgewatch_types::{PaymentProof, RequestStatus};

    use super::*;
    use crate::{sync::sync_account_once, task::reconcile_request, test_utils::*};

    #[tokio::test]
    async fn test_execute_without_active_account_is_rejected() {
        let mock_client = MockChainClient::new();
        let (handle, _task) = ReconcilerBuilder::new(
            Arc::new(mock_client),
            Arc::new(RequestStore::new()),
            ReconcilerConfig::default(),
        )
        .build();

        let result = handle.execute(RequestId::new([1; 32])).await;

        assert!(matches!(result.unwrap_err(), ExecuteError::NoActiveAccount));
    }

    #[tokio::test]
    async fn test_request_lifecycle_end_to_end() {
        // The full life of an issue request, driven cycle by cycle:
        //
        //   created at height 100, period 50, 6 confirmations required
        //   resync     -> request enters the store, Pending
        //   cycle @105 -> no payment yet, stays Pending
        //   cycle @110 -> payment with 2 confirmations, stays Pending
        //   cycle @120 -> 7 confirmations, AwaitingExecution
        //   execute    -> proof fetched, submission accepted, Completed
        //
        // After that the record is terminal and a watcher's next cycle
        // would wind down rather than keep polling.
        let request = issue_request(1, 100);
        let id = request.id;
        let txid = test_txid();

        let mut mock_client = MockChainClient::new();
        mock_client.expect_request_period().returning(|| Ok(50));
        mock_client
            .expect_required_confirmations()
            .returning(|| Ok(6));
        let listing = vec![request.clone()];
        mock_client
            .expect_requests_for_account()
            .times(1)
            .returning(move |_| Ok(listing.clone()));

        // heights seen by the three reconcile cycles, in order
        for height in [105u64, 110, 120] {
            mock_client
                .expect_current_chain_height()
                .times(1)
                .returning(move || Ok(height));
        }
        // payment appears on the second lookup
        mock_client
            .expect_find_payment_by_recipient()
            .times(1)
            .returning(|_, _| Ok(None));
        mock_client
            .expect_find_payment_by_recipient()
            .times(1)
            .returning(move |_, _| Ok(Some(txid)));
        // confirmations grow across the remaining cycles
        mock_client
            .expect_confirmations_of()
            .times(1)
            .returning(|_| Ok(2));
        mock_client
            .expect_confirmations_of()
            .times(1)
            .returning(|_| Ok(7));
        mock_client.expect_fetch_proof().times(1).returning(|_| {
            Ok(PaymentProof {
                merkle_proof: vec![0x01],
                raw_tx: vec![0x02],
            })
        });
        mock_client
            .expect_submit_execution()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (ctx, account_tx) = test_ctx(mock_client);
        let account = test_account();
        let handle = ReconcilerHandle {
            client: Arc::clone(&ctx.client),
            store: Arc::clone(&ctx.store),
            params: Arc::clone(&ctx.params),
            account_tx,
        };
        handle.set_active_account(Some(account.clone()));

        // resync brings the request in
        let open = sync_account_once(&ctx, &account).await.unwrap();
        assert_eq!(open, vec![id]);

        // three reconcile cycles
        for _ in 0..3 {
            let current = ctx.store.get(&account, &id).unwrap();
            let updated = reconcile_request(ctx.client.as_ref(), current).await.unwrap();
            ctx.store.upsert(&account, updated);
        }

        let ready = ctx.store.get(&account, &id).unwrap();
        assert_eq!(ready.btc_txid, Some(txid));
        assert_eq!(ready.confirmations, 7);
        assert_eq!(ready.status, RequestStatus::AwaitingExecution);

        handle.execute(id).await.unwrap();

        let done = ctx.store.get(&account, &id).unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert!(done.status.is_terminal());
    }

    #[tokio::test]
    async fn test_execute_falls_back_to_fetching_params() {
        // Scenario: execute before any sync pass cached the chain params
        // Expected: required confirmations are fetched from the client
        let mut mock_client = MockChainClient::new();
        mock_client
            .expect_required_confirmations()
            .times(1)
            .returning(|| Ok(6));

        let store = Arc::new(RequestStore::new());
        let account = test_account();
        let mut request = issue_request(1, 100);
        request.observe_payment(test_txid());
        request.observe_confirmations(3);
        let id = request.id;
        store.upsert(&account, request);

        let (handle, _task) = ReconcilerBuilder::new(
            Arc::new(mock_client),
            Arc::clone(&store),
            ReconcilerConfig::default(),
        )
        .build();
        handle.set_active_account(Some(account));

        let result = handle.execute(id).await;

        assert!(matches!(
            result.unwrap_err(),
            ExecuteError::InsufficientConfirmations { have: 3, need: 6 }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_account_switch_clears_previous_account() {
        // Scenario: the reconciler tracks alice, then the wallet switches
        //           to bob
        // Expected: alice's records leave the store; bob's get tracked
        let alice = test_account_named("alice");
        let bob = test_account_named("bob");

        let mut mock_client = MockChainClient::new();
        mock_client.expect_request_period().returning(|| Ok(50));
        mock_client
            .expect_required_confirmations()
            .returning(|| Ok(6));
        mock_client.expect_current_chain_height().returning(|| Ok(105));
        mock_client
            .expect_find_payment_by_recipient()
            .returning(|_, _| Ok(None));

        let alice_req = issue_request(1, 100);
        let bob_req = issue_request(2, 100);
        {
            let alice = alice.clone();
            let alice_req = alice_req.clone();
            let bob_req = bob_req.clone();
            mock_client
                .expect_requests_for_account()
                .returning(move |account| {
                    if *account == alice {
                        Ok(vec![alice_req.clone()])
                    } else {
                        Ok(vec![bob_req.clone()])
                    }
                });
        }

        let store = Arc::new(RequestStore::new());
        let (handle, task) = ReconcilerBuilder::new(
            Arc::new(mock_client),
            Arc::clone(&store),
            ReconcilerConfig::default(),
        )
        .build();
        let task = tokio::spawn(task);

        handle.set_active_account(Some(alice.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.requests_for_account(&alice).len(), 1);

        handle.set_active_account(Some(bob.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.requests_for_account(&alice).is_empty());
        assert_eq!(store.requests_for_account(&bob).len(), 1);

        drop(handle);
        task.await.unwrap();
    }
}
