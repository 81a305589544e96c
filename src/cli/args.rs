use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

#[derive(Parser, Debug)]
#[command(name = "jup-sniper", version, about = "Jupiter 代币狙击机器人")]
pub struct Cli {
    /// 目标代币 mint 地址
    #[arg(value_name = "MINT")]
    pub target_mint: String,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径（默认查找 sniper.toml 或 config/sniper.toml）"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "只报价、构造并签名交易，不发送")]
    pub dry_run: bool,
}

impl Cli {
    /// 参数错误时打印用法并以状态码 1 退出；`--help`/`--version` 照常输出后退出。
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => {
                    let _ = err.print();
                    std::process::exit(1);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mint_is_rejected() {
        let err = Cli::try_parse_from(["jup-sniper"]).expect_err("missing mint");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_mint_and_flags() {
        let cli = Cli::try_parse_from([
            "jup-sniper",
            "--config",
            "custom.toml",
            "--dry-run",
            "So11111111111111111111111111111111111111112",
        ])
        .expect("parse");
        assert_eq!(
            cli.target_mint,
            "So11111111111111111111111111111111111111112"
        );
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.dry_run);
    }

    #[test]
    fn dry_run_defaults_off() {
        let cli = Cli::try_parse_from(["jup-sniper", "mint"]).expect("parse");
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }
}
