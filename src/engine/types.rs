use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::api::{QuoteRejection, QuoteRequest};
use crate::config::SnipeConfig;

use super::error::ErrorKind;

/// 不可变的交易意图：启动时构造一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapIntent {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
}

impl SwapIntent {
    pub fn new(input_mint: Pubkey, output_mint: Pubkey, amount: u64, slippage_bps: u16) -> Self {
        Self {
            input_mint,
            output_mint,
            amount,
            slippage_bps,
        }
    }

    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest::new(
            self.input_mint,
            self.output_mint,
            self.amount,
            self.slippage_bps,
        )
    }
}

/// 一轮“报价 + 最多 N 次 swap 尝试”的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success {
        signature: Signature,
        attempts: u32,
    },
    /// dry-run 模式下交易已签名但未发送。
    DryRun {
        signature: Signature,
    },
    NoRoute {
        rejection: QuoteRejection,
    },
    Exhausted {
        attempts: u32,
        last_error: Option<String>,
    },
}

impl AttemptOutcome {
    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            AttemptOutcome::Success { .. } | AttemptOutcome::DryRun { .. } => None,
            AttemptOutcome::NoRoute { .. } => Some(ErrorKind::NoRoute),
            AttemptOutcome::Exhausted { .. } => Some(ErrorKind::Retryable),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnipeStatus {
    Landed { signature: Signature },
    DryRun { signature: Signature },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct SnipeReport {
    pub status: SnipeStatus,
    pub cycles: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub poll_interval: Duration,
    pub exhausted_backoff: Duration,
    pub progress_interval: Duration,
    pub wrap_and_unwrap_sol: bool,
    pub compute_unit_price_micro_lamports: Option<u64>,
    pub dry_run: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&SnipeConfig::default())
    }
}

impl EngineSettings {
    pub fn from_config(config: &SnipeConfig) -> Self {
        let poll_interval = Duration::from_millis(config.poll_interval_ms);
        Self {
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            poll_interval,
            exhausted_backoff: config
                .exhausted_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(poll_interval),
            progress_interval: Duration::from_millis(config.progress_log_interval_ms),
            wrap_and_unwrap_sol: config.wrap_and_unwrap_sol,
            compute_unit_price_micro_lamports: config.compute_unit_price_micro_lamports,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
