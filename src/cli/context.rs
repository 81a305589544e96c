use std::env;
use std::net::IpAddr;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use reqwest::Proxy;
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use crate::config::{GlobalConfig, JupiterConfig, LoggingConfig, SnipeConfig};
use crate::engine::{EngineError, EngineResult, SwapIntent};

pub const RPC_URL_ENV_VARS: &[&str] = &["SNIPER_RPC_URL", "SOLANA_RPC_URL"];
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// 初始化 tracing，兼顾 JSON 与文本输出模式。
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let mut filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    const QUIET_TARGETS: &[(&str, &str)] = &[
        ("hyper", "warn"),
        ("hyper_util::client::legacy", "warn"),
        ("reqwest", "info"),
    ];
    for (module, level) in QUIET_TARGETS {
        if !config.level.contains(module) {
            if let Ok(directive) = format!("{module}={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
    }

    let base = fmt()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true)
        .with_level(true);

    if config.json {
        base.json()
            .with_current_span(false)
            .with_span_list(false)
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| anyhow!(err.to_string()))?;
    } else {
        base.with_env_filter(filter)
            .event_format(fmt::format().compact())
            .try_init()
            .map_err(|err| anyhow!(err.to_string()))?;
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_http_url(label: &str, raw: &str) -> EngineResult<()> {
    let parsed = Url::parse(raw)
        .map_err(|err| EngineError::InvalidConfig(format!("{label} 地址无效 {raw}: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(EngineError::InvalidConfig(format!(
            "{label} 地址协议不受支持 {raw}: {scheme}"
        ))),
    }
}

pub fn resolve_rpc_url<F>(global: &GlobalConfig, lookup: F) -> EngineResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let url = RPC_URL_ENV_VARS
        .iter()
        .copied()
        .find_map(|name| non_empty(lookup(name)))
        .or_else(|| non_empty(global.rpc_url.clone()))
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    validate_http_url("RPC", &url)?;
    Ok(url)
}

/// `JUPITER_QUOTE_URL` / `JUPITER_SWAP_URL` 覆盖配置文件中的端点。
pub fn resolve_jupiter_config<F>(
    mut config: JupiterConfig,
    lookup: F,
) -> EngineResult<JupiterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(lookup("JUPITER_QUOTE_URL")) {
        config.quote_url = url;
    }
    if let Some(url) = non_empty(lookup("JUPITER_SWAP_URL")) {
        config.swap_url = url;
    }
    validate_http_url("Jupiter quote", &config.quote_url)?;
    validate_http_url("Jupiter swap", &config.swap_url)?;
    config.proxy = non_empty(config.proxy.take());
    Ok(config)
}

pub fn resolve_env_config(
    global: &GlobalConfig,
    jupiter: JupiterConfig,
) -> EngineResult<(String, JupiterConfig)> {
    let lookup = |name: &str| env::var(name).ok();
    Ok((
        resolve_rpc_url(global, lookup)?,
        resolve_jupiter_config(jupiter, lookup)?,
    ))
}

pub fn should_bypass_proxy(base_url: &str) -> bool {
    if let Ok(url) = Url::parse(base_url) {
        if let Some(host) = url.host_str() {
            if host.eq_ignore_ascii_case("localhost") {
                return true;
            }
            if let Ok(ip) = host.trim_matches(['[', ']']).parse::<IpAddr>() {
                return ip.is_loopback() || ip.is_unspecified();
            }
        }
    }
    false
}

/// 本地 Jupiter 端点绕过代理，其余请求走 `[jupiter].proxy`（若配置）。
pub fn build_http_client(jupiter: &JupiterConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("jup-sniper/", env!("CARGO_PKG_VERSION")));

    if should_bypass_proxy(&jupiter.quote_url) && should_bypass_proxy(&jupiter.swap_url) {
        builder = builder.no_proxy();
    } else if let Some(proxy_url) = jupiter.proxy.as_deref() {
        let proxy = Proxy::all(proxy_url)
            .map_err(|err| anyhow!("HTTP 代理地址无效 {proxy_url}: {err}"))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|err| anyhow!("构建 HTTP 客户端失败: {err}"))
}

fn parse_mint(label: &str, raw: &str) -> EngineResult<Pubkey> {
    Pubkey::from_str(raw.trim()).map_err(|err| {
        EngineError::InvalidConfig(format!("{label} 不是合法的 mint 地址 {raw}: {err}"))
    })
}

pub fn build_swap_intent(target_mint: &str, sniper: &SnipeConfig) -> EngineResult<SwapIntent> {
    let output_mint = parse_mint("目标代币", target_mint)?;
    let input_mint = parse_mint("sniper.input_mint", &sniper.input_mint)?;
    if input_mint == output_mint {
        return Err(EngineError::InvalidConfig("目标代币与输入代币相同".to_string()));
    }
    if sniper.amount_lamports == 0 {
        return Err(EngineError::InvalidConfig(
            "sniper.amount_lamports 必须大于 0".to_string(),
        ));
    }
    Ok(SwapIntent::new(
        input_mint,
        output_mint,
        sniper.amount_lamports,
        sniper.slippage_bps,
    ))
}
