/// Chain constants governing request lifetimes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChainParams {
    /// Blocks a request stays open before it expires.
    pub request_period: u64,

    /// Bitcoin confirmations a payment needs before execution.
    pub required_confirmations: u32,
}
