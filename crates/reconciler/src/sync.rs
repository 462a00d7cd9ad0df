use bridgewatch_chain::{fetch_chain_params, ChainClient, ClientError};
use bridgewatch_types::{AccountId, RequestId};
use tracing::{debug, warn};

use crate::{ctx::ReconcilerCtx, task::request_watcher_task};

/// One full resync of an account's request set against the chain's view.
///
/// The chain listing is authoritative for which requests exist and for
/// terminal flags, but knows nothing about Bitcoin-side progress, so
/// locally discovered payments and confirmation counts are grafted onto
/// still-open records before the wholesale replace. Returns the ids that
/// are still open afterwards (the ones that need a watcher).
pub(crate) async fn sync_account_once<TClient: ChainClient>(
    ctx: &ReconcilerCtx<TClient>,
    account: &AccountId,
) -> Result<Vec<RequestId>, ClientError> {
    let params = fetch_chain_params(ctx.client.as_ref()).await?;
    ctx.cache_params(params);

    let mut fresh = ctx.client.requests_for_account(account).await?;

    for request in &mut fresh {
        let Some(local) = ctx.store.get(account, &request.id) else {
            continue;
        };
        if let Some(txid) = local.btc_txid {
            request.observe_payment(txid);
        }
        request.observe_confirmations(local.confirmations);
        // Statuses never revert: a locally terminal record stays terminal
        // even when the chain's listing lags behind a just-executed request.
        if local.status.is_terminal() && !request.status.is_terminal() {
            request.status = local.status;
        }
    }

    let open: Vec<RequestId> = fresh
        .iter()
        .filter(|r| !r.status.is_terminal())
        .map(|r| r.id)
        .collect();

    debug!(%account, total = fresh.len(), open = open.len(), "resynced account requests");
    ctx.store.replace_all(account, fresh);
    Ok(open)
}

/// Tracks one account until the active account moves away or the handle is
/// dropped: resync on an interval, keep at most one watcher per open
/// request. Sync failures are logged and retried on the next interval.
pub(crate) async fn track_account<TClient>(ctx: &ReconcilerCtx<TClient>, account: &AccountId)
where
    TClient: ChainClient + 'static,
{
    let mut account_rx = ctx.account_rx.clone();

    loop {
        match sync_account_once(ctx, account).await {
            Ok(open) => {
                for id in open {
                    if let Some(guard) = ctx.watchers.try_register(id) {
                        tokio::spawn(request_watcher_task(ctx.clone(), account.clone(), guard));
                    }
                }
            }
            Err(err) => {
                warn!(%account, %err, "account sync failed");
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(ctx.sync_interval) => {}
            changed = account_rx.changed() => {
                match changed {
                    Ok(()) => {
                        if account_rx.borrow().as_ref() != Some(account) {
                            return;
                        }
                    }
                    Err(_) => return,
                }
            }
        }
    }
}
