//! 交易落地：提交、确认与链上结果复核。

pub mod error;
mod rpc;

use async_trait::async_trait;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;

pub use error::LanderError;
pub use rpc::RpcLander;

/// 链上执行结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Succeeded,
    Failed(String),
    /// 确认或交易记录中缺少执行结果，无法判断成败。
    Unknown,
}

#[derive(Debug, Clone)]
pub struct LanderReceipt {
    pub lander: &'static str,
    pub endpoint: String,
    pub signature: Signature,
}

#[async_trait]
pub trait TransactionLander: Send + Sync {
    /// 发送已签名交易，返回节点回执。
    async fn submit(&self, tx: &VersionedTransaction) -> Result<LanderReceipt, LanderError>;

    /// 阻塞轮询直到签名在 confirmed 级别可见。
    /// 无法从确认结果判断成败的实现返回 `Unknown`，调用方按失败处理。
    async fn confirm(&self, signature: &Signature) -> Result<ExecutionStatus, LanderError>;

    /// 单独拉取交易记录复核执行结果。
    async fn fetch_status(&self, signature: &Signature) -> Result<ExecutionStatus, LanderError>;
}
