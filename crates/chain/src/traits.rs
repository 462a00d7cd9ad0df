use async_trait::async_trait;
use bitcoin::Txid;
use bridgewatch_types::{AccountId, BridgeRequest, PaymentProof, RequestId};

use crate::{errors::ClientError, params::ChainParams};

/// Client interface for the chain state the reconciler observes and acts on.
///
/// Covers both sides of the bridge: bridge-chain queries (heights, request
/// sets, chain constants, execution submission) and Bitcoin-side queries
/// (payment discovery, confirmations, inclusion proofs).
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the current bridge-chain block height.
    async fn current_chain_height(&self) -> Result<u64, ClientError>;

    /// Looks up a Bitcoin payment by recipient address and amount.
    ///
    /// Returns `Ok(None)` when no matching transaction exists yet.
    async fn find_payment_by_recipient(
        &self,
        address: &str,
        amount: u64,
    ) -> Result<Option<Txid>, ClientError>;

    /// Looks up a Bitcoin payment by the request-id marker embedded in one
    /// of its outputs.
    ///
    /// Returns `Ok(None)` when no matching transaction exists yet.
    async fn find_payment_by_request_id(
        &self,
        id: RequestId,
    ) -> Result<Option<Txid>, ClientError>;

    /// Returns the confirmation count of a Bitcoin transaction.
    async fn confirmations_of(&self, txid: Txid) -> Result<u32, ClientError>;

    /// Fetches the inclusion proof and raw bytes of a Bitcoin transaction.
    ///
    /// Fails with [`ClientError::ProofUnavailable`] while the transaction is
    /// not yet included in a block.
    async fn fetch_proof(&self, txid: Txid) -> Result<PaymentProof, ClientError>;

    /// Submits the execution of a request, proving its Bitcoin payment.
    async fn submit_execution(
        &self,
        id: RequestId,
        txid: Txid,
        proof: &PaymentProof,
    ) -> Result<(), ClientError>;

    /// Returns the number of blocks a request stays open.
    async fn request_period(&self) -> Result<u64, ClientError>;

    /// Returns the confirmations a payment needs before execution.
    async fn required_confirmations(&self) -> Result<u32, ClientError>;

    /// Returns the chain's view of all requests created by `account`.
    ///
    /// Records carry the chain's terminal flags but know nothing about
    /// Bitcoin-side progress; payment discovery happens locally.
    async fn requests_for_account(
        &self,
        account: &AccountId,
    ) -> Result<Vec<BridgeRequest>, ClientError>;
}

/// Fetches both request-lifetime constants in one place.
pub async fn fetch_chain_params(client: &impl ChainClient) -> Result<ChainParams, ClientError> {
    let request_period = client.request_period().await?;
    let required_confirmations = client.required_confirmations().await?;
    Ok(ChainParams {
        request_period,
        required_confirmations,
    })
}
