//! Abstract client interface to the bridge chain and the Bitcoin network.

mod errors;
mod params;
mod traits;

pub use errors::ClientError;
pub use params::ChainParams;
#[cfg(any(test, feature = "test-utils"))]
pub use traits::MockChainClient;
pub use traits::{fetch_chain_params, ChainClient};
