//! CLI 模块负责解析命令行参数、初始化日志并组装狙击引擎。

mod runner;

pub mod args;
pub mod context;

pub use runner::run;
