use std::env;
use std::fmt;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use zeroize::Zeroizing;

use crate::config::WalletConfig;

use super::error::{EngineError, EngineResult};

/// 私钥环境变量，按优先级排列。
pub const PRIVATE_KEY_ENV_VARS: &[&str] = &["SNIPER_PRIVATE_KEY", "WALLET_PRIVATE_KEY"];

/// 发起 swap 的钱包身份；启动时构造一次，之后只读。
#[derive(Clone)]
pub struct EngineIdentity {
    pub pubkey: Pubkey,
    pub signer: Arc<Keypair>,
}

impl fmt::Debug for EngineIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineIdentity")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

impl EngineIdentity {
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            pubkey: keypair.pubkey(),
            signer: Arc::new(keypair),
        }
    }

    pub fn from_wallet(wallet: &WalletConfig) -> EngineResult<Self> {
        Self::from_sources(wallet, |name| env::var(name).ok())
    }

    /// 环境变量优先于配置文件。
    pub fn from_sources<F>(wallet: &WalletConfig, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        for var in PRIVATE_KEY_ENV_VARS.iter().copied() {
            if let Some(value) = lookup(var).map(Zeroizing::new) {
                if value.trim().is_empty() {
                    continue;
                }
                let keypair = parse_keypair_string(&value).map_err(|err| {
                    EngineError::InvalidConfig(format!("环境变量 {var} 非法: {err}"))
                })?;
                return Ok(Self::from_keypair(keypair));
            }
        }

        if !wallet.private_key.trim().is_empty() {
            let keypair = parse_keypair_string(&wallet.private_key).map_err(|err| {
                EngineError::InvalidConfig(format!("配置 global.wallet.private_key 非法: {err}"))
            })?;
            return Ok(Self::from_keypair(keypair));
        }

        Err(EngineError::InvalidConfig(
            "缺少私钥配置，请提供 global.wallet.private_key 或环境变量 WALLET_PRIVATE_KEY".into(),
        ))
    }
}

/// 支持 base58、JSON 字节数组与逗号分隔字节三种格式。
fn parse_keypair_string(raw: &str) -> Result<Keypair, anyhow::Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("keypair string empty");
    }

    let bytes: Zeroizing<Vec<u8>> = if trimmed.starts_with('[') {
        Zeroizing::new(serde_json::from_str(trimmed)?)
    } else if trimmed.contains(',') {
        Zeroizing::new(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| part.parse::<u8>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        Zeroizing::new(bs58::decode(trimmed).into_vec()?)
    };
    Ok(Keypair::try_from(bytes.as_slice())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(private_key: &str) -> WalletConfig {
        WalletConfig {
            private_key: private_key.to_string(),
        }
    }

    #[test]
    fn parses_all_key_formats() {
        let keypair = Keypair::new();
        let bytes = keypair.to_bytes();

        let base58 = keypair.to_base58_string();
        let json = serde_json::to_string(&bytes.to_vec()).unwrap();
        let csv = bytes
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        for raw in [base58, json, csv] {
            let parsed = parse_keypair_string(&raw).expect("parse keypair");
            assert_eq!(parsed.pubkey(), keypair.pubkey());
        }
    }

    #[test]
    fn env_overrides_config() {
        let from_env = Keypair::new();
        let from_config = Keypair::new();
        let encoded = from_env.to_base58_string();

        let identity =
            EngineIdentity::from_sources(&wallet(&from_config.to_base58_string()), |name| {
                (name == "WALLET_PRIVATE_KEY").then(|| encoded.clone())
            })
            .expect("identity");
        assert_eq!(identity.pubkey, from_env.pubkey());
    }

    #[test]
    fn falls_back_to_config_when_env_blank() {
        let keypair = Keypair::new();
        let identity = EngineIdentity::from_sources(&wallet(&keypair.to_base58_string()), |_| {
            Some("   ".to_string())
        })
        .expect("identity");
        assert_eq!(identity.pubkey, keypair.pubkey());
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = EngineIdentity::from_sources(&wallet(""), |_| None).expect_err("missing key");
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_key_names_its_source() {
        let err = EngineIdentity::from_sources(&wallet(""), |name| {
            (name == "SNIPER_PRIVATE_KEY").then(|| "not-a-key!".to_string())
        })
        .expect_err("malformed key");
        assert!(err.to_string().contains("SNIPER_PRIVATE_KEY"));
    }

    #[test]
    fn debug_hides_secret() {
        let identity = EngineIdentity::from_keypair(Keypair::new());
        let rendered = format!("{identity:?}");
        assert!(rendered.contains(&identity.pubkey.to_string()));
        assert!(!rendered.contains("signer"));
    }
}
