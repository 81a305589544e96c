use std::time::Duration;

use metrics::counter;
use solana_sdk::signature::Signature;
use tracing::{info, warn};

use crate::engine::{AttemptOutcome, EngineError};

use super::metrics::prometheus_enabled;

pub fn attempt_cycle(outcome: &AttemptOutcome) {
    if !prometheus_enabled() {
        return;
    }
    let result = match outcome {
        AttemptOutcome::Success { .. } => "success",
        AttemptOutcome::DryRun { .. } => "dry_run",
        AttemptOutcome::NoRoute { .. } => "no_route",
        AttemptOutcome::Exhausted { .. } => "exhausted",
    };
    let kind = outcome
        .failure_kind()
        .map(|kind| format!("{kind:?}"))
        .unwrap_or_else(|| "none".to_string());
    counter!("sniper_attempt_total", "result" => result, "kind" => kind).increment(1);
}

pub fn attempt_failed(attempt: u32, max_attempts: u32, error: &EngineError) {
    warn!(
        target: "sniper::attempt",
        attempt,
        max_attempts,
        kind = ?error.kind(),
        error = %error,
        "第 {attempt} 次尝试失败"
    );
    if prometheus_enabled() {
        counter!("sniper_attempt_failure_total", "kind" => format!("{:?}", error.kind()))
            .increment(1);
    }
}

pub fn swap_landed(signature: &Signature, attempts: u32, cycles: u64, elapsed: Duration) {
    info!(
        target: "sniper",
        signature = %signature,
        attempts,
        cycles,
        elapsed_ms = elapsed.as_millis() as u64,
        "Swap 成功! https://solscan.io/tx/{signature}"
    );
    if prometheus_enabled() {
        counter!("sniper_swap_landed_total").increment(1);
    }
}

pub fn poll_progress(total: Duration, cycles: u64) {
    info!(
        target: "sniper",
        cycles,
        "仍在搜索路由… 已耗时 {:.1}s",
        total.as_secs_f64()
    );
}
