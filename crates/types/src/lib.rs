//! Core data model for bridge request tracking.

mod id;
mod request;

pub use id::{AccountId, IdParseError, RequestId};
pub use request::{BridgeRequest, PaymentProof, RequestKind, RequestStatus};
