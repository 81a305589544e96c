use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SniperConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub jupiter: JupiterConfig,
    #[serde(default)]
    pub sniper: SnipeConfig,
    #[serde(default)]
    pub lander: LanderConfig,
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// base58 / JSON 数组 / 逗号分隔字节，均可。
    #[serde(default)]
    pub private_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "super::default_logging_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    #[serde(default = "super::default_slow_quote_warn_ms")]
    pub slow_quote_warn_ms: u64,
    #[serde(default = "super::default_slow_swap_warn_ms")]
    pub slow_swap_warn_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JupiterConfig {
    #[serde(default = "super::default_quote_url")]
    pub quote_url: String,
    #[serde(default = "super::default_swap_url")]
    pub swap_url: String,
    #[serde(default = "super::default_quote_timeout_ms")]
    pub quote_timeout_ms: u64,
    #[serde(default = "super::default_swap_timeout_ms")]
    pub swap_timeout_ms: u64,
    #[serde(default)]
    pub proxy: Option<String>,
}

/// 狙击参数：输入币种、金额、滑点与轮询节奏。
#[derive(Debug, Clone, Deserialize)]
pub struct SnipeConfig {
    #[serde(default = "super::default_input_mint")]
    pub input_mint: String,
    #[serde(default = "super::default_amount_lamports")]
    pub amount_lamports: u64,
    #[serde(default = "super::default_slippage_bps")]
    pub slippage_bps: u16,
    #[serde(default = "super::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "super::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "super::default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "super::default_progress_log_interval_ms")]
    pub progress_log_interval_ms: u64,
    /// 重试耗尽后的等待时间，缺省与 `poll_interval_ms` 相同。
    #[serde(default)]
    pub exhausted_backoff_ms: Option<u64>,
    #[serde(default = "super::default_true")]
    pub wrap_and_unwrap_sol: bool,
    #[serde(default)]
    pub compute_unit_price_micro_lamports: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanderConfig {
    #[serde(default = "super::default_true")]
    pub skip_preflight: bool,
    #[serde(default = "super::default_send_max_retries")]
    pub max_retries: usize,
    #[serde(default = "super::default_confirm_timeout_ms")]
    pub confirm_timeout_ms: u64,
    #[serde(default = "super::default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrometheusConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "super::default_prometheus_listen")]
    pub listen: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: SniperConfig = toml::from_str("").expect("parse toml");
        assert_eq!(
            config.sniper.input_mint,
            "So11111111111111111111111111111111111111112"
        );
        assert_eq!(config.sniper.amount_lamports, 500_000_000);
        assert_eq!(config.sniper.slippage_bps, 2_500);
        assert_eq!(config.sniper.poll_interval_ms, 25);
        assert_eq!(config.sniper.max_attempts, 3);
        assert_eq!(config.sniper.retry_delay_ms, 1_000);
        assert!(config.sniper.wrap_and_unwrap_sol);
        assert!(config.lander.skip_preflight);
        assert_eq!(config.lander.max_retries, 2);
        assert_eq!(config.jupiter.quote_url, "https://quote-api.jup.ag/v6/quote");
        assert_eq!(config.jupiter.swap_url, "https://quote-api.jup.ag/v6/swap");
        assert!(!config.prometheus.enable);
        assert_eq!(config.global.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let raw = r#"
            [global]
            rpc_url = "http://127.0.0.1:8899"

            [sniper]
            amount_lamports = 10000000
            slippage_bps = 300
            exhausted_backoff_ms = 500

            [lander]
            confirm_timeout_ms = 45000
        "#;
        let config: SniperConfig = toml::from_str(raw).expect("parse toml");
        assert_eq!(config.global.rpc_url.as_deref(), Some("http://127.0.0.1:8899"));
        assert_eq!(config.sniper.amount_lamports, 10_000_000);
        assert_eq!(config.sniper.slippage_bps, 300);
        assert_eq!(config.sniper.exhausted_backoff_ms, Some(500));
        assert_eq!(config.sniper.poll_interval_ms, 25);
        assert_eq!(config.lander.confirm_timeout_ms, 45_000);
        assert_eq!(config.lander.confirm_poll_interval_ms, 400);
    }
}
