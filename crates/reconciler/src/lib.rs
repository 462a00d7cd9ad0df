//! Reconciles tracked bridge requests against observable chain state.
//!
//! One watcher task per open request polls the chain for payment discovery,
//! confirmation counts and expiry, and writes derived state back into the
//! request store. A recurring account sync pass keeps the tracked set in
//! step with the chain's view of the active account. Execution of a
//! confirmed request is a separate, caller-triggered operation.

mod ctx;
mod error;
mod execute;
mod handle;
mod sync;
mod task;
#[cfg(test)]
pub(crate) mod test_utils;
mod watchers;

pub use error::ExecuteError;
pub use handle::{ReconcilerBuilder, ReconcilerHandle};
