use bitcoin::Txid;
use bridgewatch_chain::ClientError;
use bridgewatch_types::{RequestId, RequestStatus};
use thiserror::Error;

/// Errors from the caller-triggered execute operation.
///
/// Unlike polling failures, which are contained and retried, every failure
/// here is reported to the caller: execution is a deliberate action and the
/// caller decides whether to retry.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// No account is active, so there is nothing to execute against.
    #[error("no active account")]
    NoActiveAccount,

    /// The request is not tracked for the active account.
    #[error("unknown request {0}")]
    UnknownRequest(RequestId),

    /// The request already reached a terminal status; executing again would
    /// duplicate a finished action.
    #[error("request {id} already finished as {status:?}")]
    AlreadyFinished {
        id: RequestId,
        status: RequestStatus,
    },

    /// No Bitcoin payment has been discovered for the request yet.
    #[error("no payment discovered yet for request {0}")]
    PaymentNotFound(RequestId),

    /// The payment does not have the confirmations execution needs.
    #[error("payment has {have} of {need} required confirmations")]
    InsufficientConfirmations { have: u32, need: u32 },

    /// The payment is known but not yet provable; retry once it is included.
    #[error("no inclusion proof available yet for {0}")]
    ProofUnavailable(Txid),

    /// The chain rejected the execution (stale proof, already executed by
    /// someone else, ...).
    #[error("execution rejected: {0}")]
    Rejected(String),

    /// Any other client failure while proving or submitting.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}
