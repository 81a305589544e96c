use solana_sdk::signature::Signature;
use solana_sdk::signer::SignerError;
use thiserror::Error;

use crate::api::JupiterError;
use crate::lander::LanderError;

use super::transaction::DecodeTxError;

/// 失败分类：调用方据此决定是立即重新轮询、退避重试，还是终止。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 市场尚无路由，属于正常的“还不能买”。
    NoRoute,
    /// 网络、解码、链上执行失败等，可以换一个新报价再试。
    Retryable,
    /// 启动阶段的配置或密钥问题，重试无意义。
    Fatal,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("配置缺失或非法: {0}")]
    InvalidConfig(String),
    #[error("Jupiter API 错误: {0}")]
    Jupiter(#[from] JupiterError),
    #[error("落地失败: {0}")]
    Lander(#[from] LanderError),
    #[error("交易解码失败: {0}")]
    Decode(#[from] DecodeTxError),
    #[error("交易签名失败: {0}")]
    Signing(#[from] SignerError),
    #[error("交易 {signature} 链上执行失败: {reason}")]
    ExecutionFailed { signature: Signature, reason: String },
    #[error("交易 {signature} 复核未通过: {reason}")]
    VerificationFailed { signature: Signature, reason: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidConfig(_) => ErrorKind::Fatal,
            EngineError::Jupiter(_)
            | EngineError::Lander(_)
            | EngineError::Decode(_)
            | EngineError::Signing(_)
            | EngineError::ExecutionFailed { .. }
            | EngineError::VerificationFailed { .. } => ErrorKind::Retryable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Fatal
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_startup_config_is_fatal() {
        let config = EngineError::InvalidConfig("缺少私钥".into());
        assert_eq!(config.kind(), ErrorKind::Fatal);
        assert!(config.is_fatal());

        let signing = EngineError::Signing(SignerError::KeypairPubkeyMismatch);
        assert_eq!(signing.kind(), ErrorKind::Retryable);
        assert!(!signing.is_fatal());

        let failed = EngineError::ExecutionFailed {
            signature: Signature::default(),
            reason: "InstructionError(0, Custom(1))".into(),
        };
        assert_eq!(failed.kind(), ErrorKind::Retryable);
    }
}
