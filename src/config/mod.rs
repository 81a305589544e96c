pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

use self::types as cfg;

/// wSOL mint。
pub const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_logging_level() -> String {
    "info".to_string()
}

pub(crate) fn default_slow_quote_warn_ms() -> u64 {
    250
}

pub(crate) fn default_slow_swap_warn_ms() -> u64 {
    500
}

pub(crate) fn default_quote_url() -> String {
    "https://quote-api.jup.ag/v6/quote".to_string()
}

pub(crate) fn default_swap_url() -> String {
    "https://quote-api.jup.ag/v6/swap".to_string()
}

pub(crate) fn default_quote_timeout_ms() -> u64 {
    2_000
}

pub(crate) fn default_swap_timeout_ms() -> u64 {
    5_000
}

pub(crate) fn default_input_mint() -> String {
    NATIVE_MINT.to_string()
}

/// 0.5 SOL。
pub(crate) fn default_amount_lamports() -> u64 {
    500_000_000
}

pub(crate) fn default_slippage_bps() -> u16 {
    2_500
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    25
}

pub(crate) fn default_max_attempts() -> u32 {
    3
}

pub(crate) fn default_retry_delay_ms() -> u64 {
    1_000
}

pub(crate) fn default_progress_log_interval_ms() -> u64 {
    1_000
}

pub(crate) fn default_send_max_retries() -> usize {
    2
}

pub(crate) fn default_confirm_timeout_ms() -> u64 {
    30_000
}

pub(crate) fn default_confirm_poll_interval_ms() -> u64 {
    400
}

pub(crate) fn default_prometheus_listen() -> String {
    "0.0.0.0:9898".to_string()
}

impl Default for cfg::SniperConfig {
    fn default() -> Self {
        Self {
            global: cfg::GlobalConfig::default(),
            jupiter: cfg::JupiterConfig::default(),
            sniper: cfg::SnipeConfig::default(),
            lander: cfg::LanderConfig::default(),
            prometheus: cfg::PrometheusConfig::default(),
        }
    }
}

impl Default for cfg::GlobalConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            wallet: cfg::WalletConfig::default(),
            logging: cfg::LoggingConfig::default(),
        }
    }
}

impl Default for cfg::LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_logging_level(),
            json: false,
            slow_quote_warn_ms: default_slow_quote_warn_ms(),
            slow_swap_warn_ms: default_slow_swap_warn_ms(),
        }
    }
}

impl Default for cfg::JupiterConfig {
    fn default() -> Self {
        Self {
            quote_url: default_quote_url(),
            swap_url: default_swap_url(),
            quote_timeout_ms: default_quote_timeout_ms(),
            swap_timeout_ms: default_swap_timeout_ms(),
            proxy: None,
        }
    }
}

impl Default for cfg::SnipeConfig {
    fn default() -> Self {
        Self {
            input_mint: default_input_mint(),
            amount_lamports: default_amount_lamports(),
            slippage_bps: default_slippage_bps(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            progress_log_interval_ms: default_progress_log_interval_ms(),
            exhausted_backoff_ms: None,
            wrap_and_unwrap_sol: true,
            compute_unit_price_micro_lamports: None,
        }
    }
}

impl Default for cfg::LanderConfig {
    fn default() -> Self {
        Self {
            skip_preflight: true,
            max_retries: default_send_max_retries(),
            confirm_timeout_ms: default_confirm_timeout_ms(),
            confirm_poll_interval_ms: default_confirm_poll_interval_ms(),
        }
    }
}

impl Default for cfg::PrometheusConfig {
    fn default() -> Self {
        Self {
            enable: false,
            listen: default_prometheus_listen(),
        }
    }
}
