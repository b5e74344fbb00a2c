//! foilcad 命令行入口
//!
//! 读取翼型文件，变换后作为样条导入DXF图纸中的草图。

mod cli;
mod commands;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use foilcad_host::{ErrorCategory, ImportError};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    if let Err(e) = tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish(),
    ) {
        eprintln!("failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting foilcad...");

    match commands::run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 按错误类别区分退出码
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ImportError>().map(ImportError::category) {
        Some(ErrorCategory::Format) => 2,
        Some(ErrorCategory::Precondition) => 3,
        Some(ErrorCategory::Host) => 4,
        None => 1,
    }
}
