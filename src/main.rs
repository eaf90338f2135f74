// clamav-scan：单文件扫描命令行入口
//
// 用法：clamav-scan <file>
// 退出码：0 = 干净，1 = 检出病毒，2 = 参数错误

mod clamav;

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clamav::Scanner;

fn main() -> anyhow::Result<ExitCode> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clamav_ffi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 参数校验在触碰引擎之前完成
    let mut args = std::env::args().skip(1);
    let file_path = match (args.next(), args.next()) {
        (Some(path), None) => PathBuf::from(path),
        _ => {
            eprintln!("Usage: clamav-scan <file>");
            return Ok(ExitCode::from(2));
        }
    };

    let mut scanner = Scanner::new(None)?;
    scanner.load()?;

    let outcome = scanner.scan_file(&file_path)?;
    scanner.free()?;

    if outcome.infected {
        println!(
            "File infected: {}",
            outcome.virus_name.as_deref().unwrap_or("Unknown")
        );
        Ok(ExitCode::from(1))
    } else {
        println!("File not infected");
        Ok(ExitCode::SUCCESS)
    }
}
