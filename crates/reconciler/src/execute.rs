use bridgewatch_chain::{ChainClient, ClientError};
use bridgewatch_store::RequestStore;
use bridgewatch_types::{AccountId, RequestId, RequestStatus};
use tracing::info;

use crate::error::ExecuteError;

/// Executes a confirmed request: prove the Bitcoin payment and submit the
/// execution to the bridge chain.
///
/// Every precondition is checked against the latest store record before any
/// network call; a request that is unknown, already finished, unpaid or
/// under-confirmed is rejected locally. A successful submission marks the
/// record `Completed`, which also makes a repeat call fail its terminal
/// precondition instead of double-submitting.
pub(crate) async fn execute_request<TClient: ChainClient>(
    client: &TClient,
    store: &RequestStore,
    account: &AccountId,
    id: RequestId,
    required_confirmations: u32,
) -> Result<(), ExecuteError> {
    let Some(mut request) = store.get(account, &id) else {
        return Err(ExecuteError::UnknownRequest(id));
    };
    if request.status.is_terminal() {
        return Err(ExecuteError::AlreadyFinished {
            id,
            status: request.status,
        });
    }
    let Some(txid) = request.btc_txid else {
        return Err(ExecuteError::PaymentNotFound(id));
    };
    if !request.is_executable(required_confirmations) {
        return Err(ExecuteError::InsufficientConfirmations {
            have: request.confirmations,
            need: required_confirmations,
        });
    }

    let proof = match client.fetch_proof(txid).await {
        Ok(proof) => proof,
        Err(ClientError::ProofUnavailable(txid)) => {
            return Err(ExecuteError::ProofUnavailable(txid))
        }
        Err(err) => return Err(ExecuteError::Client(err)),
    };

    match client.submit_execution(id, txid, &proof).await {
        Ok(()) => {}
        Err(ClientError::Rejected(reason)) => return Err(ExecuteError::Rejected(reason)),
        Err(err) => return Err(ExecuteError::Client(err)),
    }

    info!(%id, %txid, "request executed");
    request.status = RequestStatus::Completed;
    store.upsert(account, request);
    Ok(())
}
