use bitcoin::Txid;
use thiserror::Error;

/// Errors that can occur when interacting with the chain client.
///
/// Lookup misses are not errors; lookups return `Ok(None)`. An error here
/// means the call itself failed or the chain refused it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-related error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// RPC call failed.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Transaction known but not yet provable (not included in a block).
    #[error("no inclusion proof available yet for {0}")]
    ProofUnavailable(Txid),

    /// The chain accepted the call but rejected the execution itself.
    #[error("execution rejected: {0}")]
    Rejected(String),

    /// Other unspecified error.
    #[error(transparent)]
    Other(#[from] eyre::Error),
}

impl ClientError {
    /// Creates a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Creates an RPC error.
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Creates a rejection error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}
