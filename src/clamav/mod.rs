// ClamAV FFI 模块
//
// 此模块提供 libclamav 的 Rust FFI 绑定，包括：
// - 共享库动态加载与符号解析
// - 引擎生命周期管理（初始化 / 加载 / 释放）
// - 文件与描述符扫描
// - 状态码翻译

pub mod error;
pub mod ffi;
pub mod loader;
pub mod scanner;
pub mod status;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ClamAvError;
pub use loader::LibClamav;
pub use scanner::Scanner;
pub use status::{ScanDisposition, StatusCode};
pub use types::{parse_version, EngineVersion, ScanOptions, ScanOutcome};
