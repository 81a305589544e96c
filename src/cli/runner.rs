use std::sync::Arc;

use anyhow::{Result, anyhow};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::api::JupiterApiClient;
use crate::cli::args::Cli;
use crate::cli::context::{
    build_http_client, build_swap_intent, init_tracing, resolve_env_config, should_bypass_proxy,
};
use crate::config::load_config;
use crate::engine::{
    EngineIdentity, EngineSettings, SnipeContext, SnipeEngine, SnipeReport, SnipeStatus,
};
use crate::lander::RpcLander;

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.clone())?;
    init_tracing(&config.global.logging)?;

    if config.prometheus.enable {
        crate::monitoring::try_init_prometheus(&config.prometheus.listen)
            .map_err(|err| anyhow!(err))?;
    }

    let (rpc_url, jupiter_cfg) = resolve_env_config(&config.global, config.jupiter.clone())?;
    let intent = build_swap_intent(&cli.target_mint, &config.sniper)?;
    let identity = EngineIdentity::from_wallet(&config.global.wallet)?;

    if let Some(proxy_url) = jupiter_cfg.proxy.as_deref() {
        if should_bypass_proxy(&jupiter_cfg.quote_url) {
            info!(
                target: "jupiter",
                quote_url = %jupiter_cfg.quote_url,
                "Jupiter API 请求绕过 HTTP 代理"
            );
        } else {
            info!(
                target: "jupiter",
                proxy = %proxy_url,
                "Jupiter API 请求将通过配置的代理发送"
            );
        }
    }

    let http_client = build_http_client(&jupiter_cfg)?;
    let provider = JupiterApiClient::new(http_client, &jupiter_cfg, &config.global.logging);

    let rpc_client = Arc::new(RpcClient::new_with_commitment(
        rpc_url.clone(),
        CommitmentConfig::confirmed(),
    ));
    let lander = RpcLander::new(rpc_client, &config.lander);
    info!(target: "sniper", rpc = %rpc_url, "RPC 客户端已就绪");

    let settings = EngineSettings::from_config(&config.sniper).with_dry_run(cli.dry_run);
    if settings.dry_run {
        warn!(target: "sniper", "dry-run 模式：交易只签名不发送");
    }

    let engine = SnipeEngine::new(SnipeContext {
        provider,
        lander,
        identity,
        intent,
        settings,
    });

    let cancel = CancellationToken::new();
    let ctrl_c = spawn_ctrl_c_handler(cancel.clone());
    let result = engine.snipe(cancel.clone()).await;
    ctrl_c.abort();

    match result {
        Ok(report) => {
            log_report(&report);
            Ok(())
        }
        Err(err) => {
            error!(target: "sniper", error = %err, kind = ?err.kind(), "狙击终止");
            Err(err.into())
        }
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(target: "sniper", "收到终止信号，停止狙击");
                cancel.cancel();
            }
            Err(err) => warn!(target: "sniper", error = %err, "捕获 Ctrl+C 失败"),
        }
    })
}

fn log_report(report: &SnipeReport) {
    let elapsed_ms = report.elapsed.as_millis() as u64;
    match &report.status {
        SnipeStatus::Landed { signature } => info!(
            target: "sniper",
            signature = %signature,
            cycles = report.cycles,
            elapsed_ms,
            "狙击完成"
        ),
        SnipeStatus::DryRun { signature } => info!(
            target: "sniper",
            signature = %signature,
            cycles = report.cycles,
            elapsed_ms,
            "dry-run 完成"
        ),
        SnipeStatus::Cancelled => info!(
            target: "sniper",
            cycles = report.cycles,
            elapsed_ms,
            "狙击已取消"
        ),
    }
}
