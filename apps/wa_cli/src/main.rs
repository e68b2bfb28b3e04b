// apps/wa_cli/src/main.rs

//! Wray-Agarwal 命令行界面
//!
//! 提供湍流闭合模型的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 组装网格、流场与模型，驱动 `correct()`
//! - 库层通过 `log` 记录，这里安装 `tracing-subscriber` 统一输出

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;

/// Wray-Agarwal 湍流模型命令行工具
#[derive(Parser)]
#[command(name = "wa_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wray-Agarwal RANS/DES turbulence closure driver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在槽道算例上运行模型
    Run(commands::run::RunArgs),
    /// 显示模型与默认系数
    Info(commands::info::InfoArgs),
    /// 验证湍流属性文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // try_init 同时转发 log 记录
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志失败: {e}"))?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
