use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::SniperConfig;

pub const DEFAULT_CONFIG_PATHS: &[&str] = &["sniper.toml", "config/sniper.toml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config file {0} not found")]
    Missing(PathBuf),
}

/// 显式指定的路径必须存在；未指定时依次查找默认路径，都不存在则使用默认配置。
pub fn load_config(path: Option<PathBuf>) -> Result<SniperConfig, ConfigError> {
    if let Some(explicit) = path {
        return try_load_file(&explicit)?.ok_or(ConfigError::Missing(explicit));
    }

    for candidate in DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from) {
        if let Some(config) = try_load_file(&candidate)? {
            return Ok(config);
        }
    }

    Ok(SniperConfig::default())
}

fn try_load_file(path: &Path) -> Result<Option<SniperConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: SniperConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(config))
}
