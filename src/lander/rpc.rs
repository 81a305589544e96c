use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig};
use solana_commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::LanderConfig;
use crate::monitoring::guard;

use super::error::LanderError;
use super::{ExecutionStatus, LanderReceipt, TransactionLander};

/// 通过普通 RPC 节点发送交易。
#[derive(Clone)]
pub struct RpcLander {
    client: Arc<RpcClient>,
    config: RpcSendTransactionConfig,
    commitment: CommitmentConfig,
    confirm_timeout: Duration,
    confirm_poll_interval: Duration,
}

impl RpcLander {
    pub fn new(client: Arc<RpcClient>, lander: &LanderConfig) -> Self {
        let config = RpcSendTransactionConfig {
            skip_preflight: lander.skip_preflight,
            preflight_commitment: Some(CommitmentLevel::Processed),
            max_retries: Some(lander.max_retries),
            ..RpcSendTransactionConfig::default()
        };

        Self {
            client,
            config,
            commitment: CommitmentConfig::confirmed(),
            confirm_timeout: Duration::from_millis(lander.confirm_timeout_ms),
            confirm_poll_interval: Duration::from_millis(lander.confirm_poll_interval_ms.max(1)),
        }
    }
}

#[async_trait]
impl TransactionLander for RpcLander {
    async fn submit(&self, tx: &VersionedTransaction) -> Result<LanderReceipt, LanderError> {
        let timer = guard("lander.rpc.submit");
        let signature = self
            .client
            .send_transaction_with_config(tx, self.config.clone())
            .await?;
        timer.finish();

        info!(
            target: "lander::rpc",
            signature = %signature,
            skip_preflight = self.config.skip_preflight,
            max_retries = ?self.config.max_retries,
            "transaction submitted via rpc client"
        );
        Ok(LanderReceipt {
            lander: "rpc",
            endpoint: self.client.url(),
            signature,
        })
    }

    async fn confirm(&self, signature: &Signature) -> Result<ExecutionStatus, LanderError> {
        let timer = guard("lander.rpc.confirm");
        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, self.commitment)
                .await?;
            match status {
                Some(Ok(())) => {
                    timer.finish();
                    return Ok(ExecutionStatus::Succeeded);
                }
                Some(Err(err)) => {
                    warn!(
                        target: "lander::rpc",
                        signature = %signature,
                        error = %err,
                        "交易已确认但执行失败"
                    );
                    return Ok(ExecutionStatus::Failed(err.to_string()));
                }
                None => {}
            }

            if Instant::now() >= deadline {
                return Err(LanderError::ConfirmTimeout {
                    signature: *signature,
                    timeout_ms: self.confirm_timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.confirm_poll_interval).await;
        }
    }

    async fn fetch_status(&self, signature: &Signature) -> Result<ExecutionStatus, LanderError> {
        let config = RpcTransactionConfig {
            encoding: None,
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };
        let record = self
            .client
            .get_transaction_with_config(signature, config)
            .await?;

        let status = match record.transaction.meta {
            None => ExecutionStatus::Unknown,
            Some(meta) => match meta.err {
                None => ExecutionStatus::Succeeded,
                Some(err) => ExecutionStatus::Failed(format!("{err:?}")),
            },
        };
        debug!(
            target: "lander::rpc",
            signature = %signature,
            slot = record.slot,
            ?status,
            "已拉取交易记录"
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::instruction::Instruction;
    use solana_sdk::message::{Message, VersionedMessage};
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::{Keypair, Signer};

    use super::*;

    fn signed_transaction() -> VersionedTransaction {
        let payer = Keypair::new();
        let instruction = Instruction::new_with_bytes(Pubkey::new_unique(), &[7], vec![]);
        let message = Message::new(&[instruction], Some(&payer.pubkey()));
        VersionedTransaction::try_new(VersionedMessage::Legacy(message), &[&payer])
            .expect("sign")
    }

    fn mock_lander(url: &str) -> RpcLander {
        let client = Arc::new(RpcClient::new_mock(url.to_string()));
        RpcLander::new(client, &LanderConfig::default())
    }

    #[test]
    fn send_config_follows_lander_settings() {
        let lander = mock_lander("succeeds");
        assert!(lander.config.skip_preflight);
        assert_eq!(lander.config.max_retries, Some(2));
        assert_eq!(
            lander.config.preflight_commitment,
            Some(CommitmentLevel::Processed)
        );
        assert_eq!(lander.commitment, CommitmentConfig::confirmed());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn submit_and_confirm_against_mock_node() {
        let lander = mock_lander("succeeds");
        let tx = signed_transaction();

        let receipt = lander.submit(&tx).await.expect("submit");
        assert_eq!(receipt.lander, "rpc");
        assert_eq!(receipt.signature, tx.signatures[0]);

        let status = lander.confirm(&receipt.signature).await.expect("confirm");
        assert_eq!(status, ExecutionStatus::Succeeded);
    }
}
