// src/lib.rs
//
// 模块声明，导出 ClamAV 绑定

pub mod clamav;

// 重新导出常用类型
pub use clamav::{
    parse_version, ClamAvError, EngineVersion, LibClamav, ScanDisposition, ScanOptions,
    ScanOutcome, Scanner, StatusCode,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
