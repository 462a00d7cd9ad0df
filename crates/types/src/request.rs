use std::fmt;

use bitcoin::Txid;
use serde::{Deserialize, Serialize};

use crate::id::{AccountId, RequestId};

/// Which direction a bridge request moves the asset.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Mint the wrapped asset against a Bitcoin payment to a vault.
    Issue,
    /// Burn the wrapped asset for a Bitcoin payment from a vault.
    Redeem,
}

/// Lifecycle status of a request.
///
/// The open states are `Pending` and `AwaitingExecution`; everything else is
/// terminal and never changes again once reached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Payment not yet found, or found with too few confirmations.
    Pending,

    /// Payment has the required confirmations; the requester may execute.
    AwaitingExecution,

    /// Execution succeeded on the bridge chain.
    Completed,

    /// Cancelled on-chain.
    Cancelled,

    /// Request period elapsed before execution.
    Expired,

    /// Requester was reimbursed in collateral instead of Bitcoin.
    Reimbursed,

    /// Retried against a different vault.
    Retried,
}

impl RequestStatus {
    /// Whether the status can never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Completed
                | RequestStatus::Cancelled
                | RequestStatus::Expired
                | RequestStatus::Reimbursed
                | RequestStatus::Retried
        )
    }
}

/// Merkle proof and raw transaction bytes backing one execution call.
///
/// Fetched on demand and handed straight to the execution submission; never
/// kept in the store.
#[derive(Clone, Eq, PartialEq)]
pub struct PaymentProof {
    pub merkle_proof: Vec<u8>,
    pub raw_tx: Vec<u8>,
}

impl fmt::Debug for PaymentProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProof")
            .field("merkle_proof_len", &self.merkle_proof.len())
            .field("raw_tx_len", &self.raw_tx.len())
            .finish()
    }
}

/// A tracked issue or redeem request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BridgeRequest {
    /// Chain-assigned request id.
    pub id: RequestId,

    /// Issue or redeem.
    pub kind: RequestKind,

    /// Account that created the request.
    pub requester: AccountId,

    /// Amount of the bridged asset in its smallest unit.
    pub amount: u64,

    /// Bitcoin address of the counterparty vault.
    pub vault_btc_address: String,

    /// Chain-side account of the counterparty vault.
    pub vault_account: AccountId,

    /// Bridge-chain height at which the request was accepted.
    pub creation_height: u64,

    /// Bitcoin transaction carrying the payment, once discovered.
    ///
    /// Goes from `None` to `Some` exactly once; never cleared.
    pub btc_txid: Option<Txid>,

    /// Confirmations observed for `btc_txid`; non-decreasing while open.
    pub confirmations: u32,

    pub status: RequestStatus,
}

impl BridgeRequest {
    /// Records a discovered payment. A payment already on record wins; the
    /// txid field is write-once.
    pub fn observe_payment(&mut self, txid: Txid) {
        if self.btc_txid.is_none() {
            self.btc_txid = Some(txid);
        }
    }

    /// Records a fresh confirmation count, keeping the field monotonic so a
    /// lagging node cannot walk it backwards.
    pub fn observe_confirmations(&mut self, count: u32) {
        self.confirmations = self.confirmations.max(count);
    }

    /// Whether the request may be executed right now.
    pub fn is_executable(&self, required_confirmations: u32) -> bool {
        !self.status.is_terminal()
            && self.btc_txid.is_some()
            && self.confirmations > 0
            && self.confirmations >= required_confirmations
    }

    /// Derives the status from observed chain state.
    ///
    /// Terminal statuses are sticky. Expiry takes precedence over the
    /// confirmation count: a request past `creation_height + request_period`
    /// is `Expired` no matter how confirmed its payment is.
    pub fn reconciled_status(
        &self,
        current_height: u64,
        request_period: u64,
        required_confirmations: u32,
    ) -> RequestStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        if current_height >= self.creation_height.saturating_add(request_period) {
            return RequestStatus::Expired;
        }
        if self.is_executable(required_confirmations) {
            return RequestStatus::AwaitingExecution;
        }
        RequestStatus::Pending
    }
}
