mod aggregator;
mod context;
mod error;
mod identity;
mod scheduler;
mod transaction;
mod types;


pub use aggregator::RouteProvider;
pub use context::SnipeContext;
pub use error::{EngineError, EngineResult};
pub use identity::EngineIdentity;
pub use scheduler::Scheduler;
pub use transaction::{decode_base64_transaction, sign_transaction};
pub use types::{AttemptOutcome, EngineSettings, SnipeReport, SnipeStatus, SwapIntent};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::api::{QuoteOutcome, SwapRequest};
use crate::lander::{ExecutionStatus, TransactionLander};
use crate::monitoring::events;

/// 狙击循环：反复报价，一旦出现路由就构造、签名、发送并确认 swap。
pub struct SnipeEngine<R, L> {
    provider: R,
    lander: L,
    identity: EngineIdentity,
    intent: SwapIntent,
    settings: EngineSettings,
    poll: Scheduler,
    retry: Scheduler,
    backoff: Scheduler,
}

impl<R, L> SnipeEngine<R, L>
where
    R: RouteProvider,
    L: TransactionLander,
{
    pub fn new(context: SnipeContext<R, L>) -> Self {
        let SnipeContext {
            provider,
            lander,
            identity,
            intent,
            settings,
        } = context;
        Self {
            poll: Scheduler::new(settings.poll_interval),
            retry: Scheduler::new(settings.retry_delay),
            backoff: Scheduler::new(settings.exhausted_backoff),
            provider,
            lander,
            identity,
            intent,
            settings,
        }
    }

    /// 一直轮询直到 swap 成功、被取消或遇到致命错误。
    pub async fn snipe(&self, cancel: CancellationToken) -> EngineResult<SnipeReport> {
        info!(
            target: "sniper",
            output_mint = %self.intent.output_mint,
            input_mint = %self.intent.input_mint,
            amount = self.intent.amount,
            slippage_bps = self.intent.slippage_bps,
            poll_interval_ms = self.poll.delay().as_millis() as u64,
            wallet = %self.identity.pubkey,
            dry_run = self.settings.dry_run,
            "开始狙击代币"
        );

        let started = Instant::now();
        let mut progress_mark = started;
        let mut cycles: u64 = 0;

        let report = |status, cycles| SnipeReport {
            status,
            cycles,
            elapsed: started.elapsed(),
        };

        loop {
            if cancel.is_cancelled() {
                info!(target: "sniper", cycles, "收到取消信号，停止轮询");
                return Ok(report(SnipeStatus::Cancelled, cycles));
            }

            cycles += 1;
            let outcome = self.attempt(&cancel).await?;
            events::attempt_cycle(&outcome);

            let scheduler = match outcome {
                AttemptOutcome::Success {
                    signature,
                    attempts,
                } => {
                    events::swap_landed(&signature, attempts, cycles, started.elapsed());
                    return Ok(report(SnipeStatus::Landed { signature }, cycles));
                }
                AttemptOutcome::DryRun { signature } => {
                    info!(
                        target: "sniper",
                        signature = %signature,
                        cycles,
                        "dry-run: 交易已签名，未发送"
                    );
                    return Ok(report(SnipeStatus::DryRun { signature }, cycles));
                }
                AttemptOutcome::NoRoute { rejection } => {
                    trace!(
                        target: "sniper",
                        cycles,
                        reason = %rejection.describe(),
                        "暂无路由，继续轮询"
                    );
                    &self.poll
                }
                AttemptOutcome::Exhausted {
                    attempts,
                    last_error,
                } => {
                    warn!(
                        target: "sniper",
                        attempts,
                        last_error = last_error.as_deref().unwrap_or("-"),
                        "所有 swap 尝试均失败，继续狙击"
                    );
                    &self.backoff
                }
            };

            if !scheduler.wait(&cancel).await {
                info!(target: "sniper", cycles, "收到取消信号，停止轮询");
                return Ok(report(SnipeStatus::Cancelled, cycles));
            }

            if progress_mark.elapsed() >= self.settings.progress_interval {
                events::poll_progress(started.elapsed(), cycles);
                progress_mark = Instant::now();
            }
        }
    }

    /// 一轮报价 + swap：最多 `max_attempts` 次，每次都重新报价。
    /// 无路由立即返回且不计入重试次数；致命错误直接向上传播。
    pub async fn attempt(&self, cancel: &CancellationToken) -> EngineResult<AttemptOutcome> {
        let max_attempts = self.settings.max_attempts;
        let mut failures: u32 = 0;
        let mut last_error: Option<String> = None;

        while failures < max_attempts {
            match self.try_swap(failures + 1).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if err.is_fatal() => {
                    error!(
                        target: "sniper::attempt",
                        error = %err,
                        "不可恢复的错误，停止狙击"
                    );
                    return Err(err);
                }
                Err(err) => {
                    failures += 1;
                    events::attempt_failed(failures, max_attempts, &err);
                    last_error = Some(err.to_string());
                    if failures < max_attempts {
                        debug!(
                            target: "sniper::attempt",
                            delay_ms = self.retry.delay().as_millis() as u64,
                            "稍后使用新报价重试"
                        );
                        if !self.retry.wait(cancel).await {
                            break;
                        }
                    }
                }
            }
        }

        Ok(AttemptOutcome::Exhausted {
            attempts: failures,
            last_error,
        })
    }

    async fn try_swap(&self, attempt: u32) -> EngineResult<AttemptOutcome> {
        let request = self.intent.quote_request();
        let quote = match self.provider.quote(&request).await? {
            QuoteOutcome::NoRoute(rejection) => return Ok(AttemptOutcome::NoRoute { rejection }),
            QuoteOutcome::Routable(quote) => quote,
        };

        info!(
            target: "sniper::attempt",
            attempt,
            out_amount = quote.payload().out_amount,
            min_out_amount = quote.payload().other_amount_threshold,
            price_impact_pct = %quote.payload().price_impact_pct,
            "第 {attempt} 次尝试：以 {}% 滑点执行 swap",
            f64::from(self.intent.slippage_bps) / 100.0
        );

        let mut swap_request = SwapRequest::from_quote(&quote, self.identity.pubkey);
        swap_request.wrap_and_unwrap_sol = self.settings.wrap_and_unwrap_sol;
        swap_request.compute_unit_price_micro_lamports =
            self.settings.compute_unit_price_micro_lamports;
        let swap = self.provider.swap_transaction(&swap_request).await?;

        let unsigned = decode_base64_transaction(&swap.swap_transaction)?;
        let signed = sign_transaction(unsigned, &self.identity.signer)?;
        let signature = signed.signatures.first().copied().unwrap_or_default();

        if self.settings.dry_run {
            return Ok(AttemptOutcome::DryRun { signature });
        }

        let receipt = self.lander.submit(&signed).await?;
        let signature = receipt.signature;
        info!(
            target: "sniper::attempt",
            signature = %signature,
            lander = receipt.lander,
            endpoint = %receipt.endpoint,
            "交易已发送，等待确认…"
        );

        match self.lander.confirm(&signature).await? {
            ExecutionStatus::Succeeded => {}
            ExecutionStatus::Failed(reason) => {
                return Err(EngineError::ExecutionFailed { signature, reason });
            }
            ExecutionStatus::Unknown => {
                return Err(EngineError::ExecutionFailed {
                    signature,
                    reason: "确认结果未知".to_string(),
                });
            }
        }

        match self.lander.fetch_status(&signature).await {
            Ok(ExecutionStatus::Succeeded) => Ok(AttemptOutcome::Success {
                signature,
                attempts: attempt,
            }),
            Ok(ExecutionStatus::Failed(reason)) => {
                Err(EngineError::VerificationFailed { signature, reason })
            }
            Ok(ExecutionStatus::Unknown) => Err(EngineError::VerificationFailed {
                signature,
                reason: "交易记录缺少执行结果".to_string(),
            }),
            Err(err) => Err(EngineError::VerificationFailed {
                signature,
                reason: err.to_string(),
            }),
        }
    }
}
