use bridgewatch_chain::{fetch_chain_params, ChainClient, ClientError};
use bridgewatch_types::{AccountId, BridgeRequest, RequestKind};
use tracing::{debug, warn};

use crate::{ctx::ReconcilerCtx, sync::track_account, watchers::WatcherGuard};

/// Top-level reconciler loop: follow the active account, track it until it
/// changes, drop its state when it does.
pub(crate) async fn reconciler_task<TClient: ChainClient + 'static>(ctx: ReconcilerCtx<TClient>) {
    let mut account_rx = ctx.account_rx.clone();

    loop {
        let active = account_rx.borrow_and_update().clone();
        match active {
            Some(account) => {
                track_account(&ctx, &account).await;
                // The store is keyed per account; leaving an account is the
                // one place its records are removed.
                ctx.store.clear_account(&account);
                if account_rx.has_changed().is_err() {
                    break;
                }
            }
            None => {
                if account_rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("reconciler shut down");
}

/// Runs one reconciliation pass over a single request.
///
/// Payment lookups that find nothing are not failures; the record simply
/// carries no payment for another cycle, and expiry is still derived. A
/// failed chain call aborts the pass with the record untouched so the
/// caller retries next cycle.
pub(crate) async fn reconcile_request(
    client: &impl ChainClient,
    mut request: BridgeRequest,
) -> Result<BridgeRequest, ClientError> {
    let current_height = client.current_chain_height().await?;
    let params = fetch_chain_params(client).await?;

    if request.btc_txid.is_none() {
        // An issue payment goes to the vault, so it is found by recipient
        // and amount; a redeem payment goes out from the vault and carries
        // the request id in an output marker instead.
        let found = match request.kind {
            RequestKind::Issue => {
                client
                    .find_payment_by_recipient(&request.vault_btc_address, request.amount)
                    .await?
            }
            RequestKind::Redeem => client.find_payment_by_request_id(request.id).await?,
        };
        if let Some(txid) = found {
            debug!(id = %request.id, %txid, "discovered payment for request");
            request.observe_payment(txid);
        }
    }

    if let Some(txid) = request.btc_txid {
        let confirmations = client.confirmations_of(txid).await?;
        request.observe_confirmations(confirmations);
    }

    request.status = request.reconciled_status(
        current_height,
        params.request_period,
        params.required_confirmations,
    );
    Ok(request)
}

/// Watcher task for one request: reconcile, write back, sleep, repeat.
///
/// Ends (releasing the registration via the guard) when the request reaches
/// a terminal status, leaves the store, or stops belonging to the active
/// account. Poll failures are logged and retried; they never end the task.
pub(crate) async fn request_watcher_task<TClient: ChainClient>(
    ctx: ReconcilerCtx<TClient>,
    account: AccountId,
    guard: WatcherGuard,
) {
    let id = guard.id();
    let mut account_rx = ctx.account_rx.clone();

    loop {
        let Some(request) = ctx.store.get(&account, &id) else {
            debug!(%id, "request left the store; watcher done");
            break;
        };
        if request.status.is_terminal() {
            break;
        }

        match reconcile_request(ctx.client.as_ref(), request).await {
            Ok(updated) => {
                // The execute path may have completed the request while this
                // pass was in flight; a terminal status must not be
                // overwritten with stale open state.
                let overtaken = ctx
                    .store
                    .get(&account, &id)
                    .is_none_or(|current| current.status.is_terminal());
                if overtaken {
                    break;
                }

                let finished = updated.status.is_terminal();
                ctx.store.upsert(&account, updated);
                if finished {
                    debug!(%id, "request reached terminal status; watcher done");
                    break;
                }
            }
            Err(err) => {
                // Transient by assumption; the next cycle retries.
                warn!(%id, %err, "failed to poll chain for request");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(ctx.poll_interval) => {}
            changed = account_rx.changed() => {
                match changed {
                    Ok(()) => {
                        if account_rx.borrow().as_ref() != Some(&account) {
                            debug!(%id, "active account changed; watcher done");
                            break;
                        }
                    }
                    // Handle dropped; the whole reconciler is shutting down.
                    Err(_) => break,
                }
            }
        }
    }
}
