//! Jupiter 聚合器 API 封装：`/quote` 与 `/swap`。

pub mod quote;
pub mod swap;

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{JupiterConfig, LoggingConfig};
use crate::monitoring::metrics::prometheus_enabled;
use crate::monitoring::{LatencyMetadata, guard_with_level};

pub use quote::{QuoteOutcome, QuoteRejection, QuoteRequest, QuoteResponse};
pub use swap::{SwapRequest, SwapTransactionResponse};

#[derive(Debug, Error)]
pub enum JupiterError {
    #[error("Jupiter API 请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("请求 {endpoint} 超时（{timeout_ms}ms）")]
    Timeout {
        endpoint: String,
        timeout_ms: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("响应解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("请求 {endpoint} 返回状态 {status}: {body}")]
    ApiStatus {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("请求 {endpoint} 被限流，状态 {status}: {body}")]
    RateLimited {
        endpoint: String,
        status: StatusCode,
        body: String,
    },
    #[error("Jupiter 响应结构不符合预期: {0}")]
    Schema(String),
}

#[derive(Clone, Debug)]
pub struct JupiterApiClient {
    quote_url: String,
    swap_url: String,
    client: reqwest::Client,
    quote_timeout: Duration,
    swap_timeout: Duration,
    slow_quote_warn_ms: u64,
    slow_swap_warn_ms: u64,
}

#[derive(Clone, Copy)]
enum Stage {
    Quote,
    Swap,
}

impl Stage {
    fn metric_prefix(self) -> &'static str {
        match self {
            Stage::Quote => "sniper_jupiter_quote",
            Stage::Swap => "sniper_jupiter_swap",
        }
    }
}

impl JupiterApiClient {
    pub fn new(client: reqwest::Client, config: &JupiterConfig, logging: &LoggingConfig) -> Self {
        Self {
            quote_url: config.quote_url.clone(),
            swap_url: config.swap_url.clone(),
            client,
            quote_timeout: Duration::from_millis(config.quote_timeout_ms),
            swap_timeout: Duration::from_millis(config.swap_timeout_ms),
            slow_quote_warn_ms: logging.slow_quote_warn_ms,
            slow_swap_warn_ms: logging.slow_swap_warn_ms,
        }
    }

    /// 请求报价。Jupiter 在无路由时返回 4xx + 错误对象，这里先读 body 再判断状态码。
    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, JupiterError> {
        let url = self.quote_url.clone();
        let guard = guard_with_level(
            "jupiter.quote",
            tracing::Level::DEBUG,
            LatencyMetadata::new([("stage", "quote"), ("url", url.as_str())]),
        );
        let started = Instant::now();

        trace!(
            target: "jupiter::quote",
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            amount = request.amount,
            slippage_bps = request.slippage_bps,
            "开始请求 Jupiter 报价"
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.quote_timeout)
            .query(&request.to_query_params())
            .send()
            .await
            .map_err(|err| self.transport_error(Stage::Quote, &url, err, None))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(Stage::Quote, &url, err, Some(status)))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let summary = summarize_error_body(&body);
            record_metrics(Stage::Quote, "rate_limited", None, Some(status));
            warn!(
                target: "jupiter::quote",
                endpoint = %url,
                body = %summary,
                "Jupiter 报价命中限流"
            );
            return Err(JupiterError::RateLimited {
                endpoint: url,
                status,
                body: summary,
            });
        }

        let json: Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(err) if status.is_success() => {
                record_metrics(Stage::Quote, "decode_error", None, Some(status));
                warn!(
                    target: "jupiter::quote",
                    endpoint = %url,
                    error = %err,
                    "Jupiter 报价 JSON 解析失败"
                );
                return Err(JupiterError::Json(err));
            }
            Err(_) => return Err(self.status_error(Stage::Quote, url, status, &body)),
        };

        if let Some(rejection) = quote::detect_rejection(&json) {
            record_metrics(Stage::Quote, "no_route", None, Some(status));
            debug!(
                target: "jupiter::quote",
                status = status.as_u16(),
                reason = %rejection.describe(),
                "Jupiter 暂无可用路由"
            );
            guard.finish();
            return Ok(QuoteOutcome::NoRoute(rejection));
        }

        if !status.is_success() {
            return Err(self.status_error(Stage::Quote, url, status, &body));
        }

        let quote = QuoteResponse::try_from_value(json).map_err(|err| {
            record_metrics(Stage::Quote, "schema_error", None, Some(status));
            warn!(
                target: "jupiter::quote",
                endpoint = %url,
                error = %err,
                "Jupiter 报价 schema 校验失败"
            );
            JupiterError::Schema(err.to_string())
        })?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;
        if elapsed_ms > self.slow_quote_warn_ms as f64 {
            debug!(
                target: "jupiter::quote",
                elapsed_ms = format_args!("{elapsed_ms:.3}"),
                threshold_ms = self.slow_quote_warn_ms,
                "Jupiter 报价耗时较长"
            );
        }
        debug!(
            target: "jupiter::quote",
            in_amount = quote.payload().in_amount,
            out_amount = quote.payload().out_amount,
            other_amount_threshold = quote.payload().other_amount_threshold,
            price_impact_pct = %quote.payload().price_impact_pct,
            hops = quote.hops(),
            "Jupiter 报价完成"
        );

        record_metrics(Stage::Quote, "success", Some(elapsed_ms), Some(status));
        guard.finish();
        Ok(QuoteOutcome::Routable(quote))
    }

    /// 请求 Jupiter 构造 swap 交易（未签名）。
    pub async fn swap_transaction(
        &self,
        request: &SwapRequest,
    ) -> Result<SwapTransactionResponse, JupiterError> {
        let url = self.swap_url.clone();
        let guard = guard_with_level(
            "jupiter.swap",
            tracing::Level::DEBUG,
            LatencyMetadata::new([("stage", "swap"), ("url", url.as_str())]),
        );
        let started = Instant::now();

        trace!(
            target: "jupiter::swap",
            user = %request.user_public_key,
            wrap_and_unwrap_sol = request.wrap_and_unwrap_sol,
            "即将请求 Jupiter swap 交易"
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.swap_timeout)
            .json(request)
            .send()
            .await
            .map_err(|err| self.transport_error(Stage::Swap, &url, err, None))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(Stage::Swap, &url, err, Some(status)))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let summary = summarize_error_body(&body);
            record_metrics(Stage::Swap, "rate_limited", None, Some(status));
            warn!(
                target: "jupiter::swap",
                endpoint = %url,
                body = %summary,
                "Jupiter swap 请求命中限流"
            );
            return Err(JupiterError::RateLimited {
                endpoint: url,
                status,
                body: summary,
            });
        }

        if !status.is_success() {
            return Err(self.status_error(Stage::Swap, url, status, &body));
        }

        let json: Value = serde_json::from_str(&body).map_err(|err| {
            record_metrics(Stage::Swap, "decode_error", None, Some(status));
            JupiterError::Json(err)
        })?;

        let swap = SwapTransactionResponse::try_from_value(json).map_err(|err| {
            record_metrics(Stage::Swap, "schema_error", None, Some(status));
            warn!(
                target: "jupiter::swap",
                endpoint = %url,
                error = %err,
                "Jupiter swap 响应缺少交易"
            );
            JupiterError::Schema(err)
        })?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;
        if elapsed_ms > self.slow_swap_warn_ms as f64 {
            debug!(
                target: "jupiter::swap",
                elapsed_ms = format_args!("{elapsed_ms:.3}"),
                threshold_ms = self.slow_swap_warn_ms,
                "Jupiter swap 请求耗时较长"
            );
        }
        debug!(
            target: "jupiter::swap",
            last_valid_block_height = ?swap.last_valid_block_height,
            prioritization_fee_lamports = ?swap.prioritization_fee_lamports,
            "Jupiter swap 交易已生成"
        );

        record_metrics(Stage::Swap, "success", Some(elapsed_ms), Some(status));
        guard.finish();
        Ok(swap)
    }

    fn transport_error(
        &self,
        stage: Stage,
        url: &str,
        err: reqwest::Error,
        status: Option<StatusCode>,
    ) -> JupiterError {
        if err.is_timeout() {
            let timeout = match stage {
                Stage::Quote => self.quote_timeout,
                Stage::Swap => self.swap_timeout,
            };
            record_metrics(stage, "timeout", None, status);
            warn!(
                target: "jupiter",
                endpoint = %url,
                timeout_ms = timeout.as_millis() as u64,
                "Jupiter 请求超时"
            );
            JupiterError::Timeout {
                endpoint: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
                source: err,
            }
        } else {
            record_metrics(stage, "transport_error", None, status);
            warn!(
                target: "jupiter",
                endpoint = %url,
                error = %err,
                "Jupiter 请求发送失败"
            );
            JupiterError::from(err)
        }
    }

    fn status_error(
        &self,
        stage: Stage,
        url: String,
        status: StatusCode,
        body: &str,
    ) -> JupiterError {
        let summary = summarize_error_body(body);
        record_metrics(stage, "http_error", None, Some(status));
        warn!(
            target: "jupiter",
            endpoint = %url,
            status = status.as_u16(),
            body = %summary,
            "Jupiter 返回非 200 状态"
        );
        JupiterError::ApiStatus {
            endpoint: url,
            status,
            body: summary,
        }
    }
}

fn record_metrics(
    stage: Stage,
    status: &'static str,
    elapsed_ms: Option<f64>,
    http_status: Option<StatusCode>,
) {
    if !prometheus_enabled() {
        return;
    }
    let prefix = stage.metric_prefix();
    counter!(
        format!("{prefix}_total"),
        "status" => status,
        "http_status" => http_status
            .map(|code| code.as_u16().to_string())
            .unwrap_or_else(|| "none".to_string())
    )
    .increment(1);
    if let Some(value) = elapsed_ms {
        histogram!(format!("{prefix}_latency_ms"), "status" => status).record(value);
    }
}

fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty response body)".to_string();
    }
    let single_line = trimmed.replace(['\n', '\r'], " ");
    const MAX_LEN: usize = 512;
    if single_line.chars().count() > MAX_LEN {
        let mut truncated: String = single_line.chars().take(MAX_LEN).collect();
        truncated.push('…');
        truncated
    } else {
        single_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_collapses_and_truncates() {
        assert_eq!(summarize_error_body("  \n "), "(empty response body)");
        assert_eq!(summarize_error_body("bad\nrequest\r"), "bad request");

        let long = "x".repeat(600);
        let summary = summarize_error_body(&long);
        assert_eq!(summary.chars().count(), 513);
        assert!(summary.ends_with('…'));
    }
}
