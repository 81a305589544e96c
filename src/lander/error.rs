use solana_client::client_error::ClientError;
use solana_sdk::signature::Signature;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanderError {
    #[error("RPC 请求失败: {0}")]
    Rpc(#[from] ClientError),
    #[error("交易 {signature} 在 {timeout_ms}ms 内未确认")]
    ConfirmTimeout {
        signature: Signature,
        timeout_ms: u64,
    },
}
