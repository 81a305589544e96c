pub mod jupiter;
pub mod serde_helpers;

pub use jupiter::{
    JupiterApiClient, JupiterError, QuoteOutcome, QuoteRejection, QuoteRequest, SwapRequest,
    SwapTransactionResponse,
};
