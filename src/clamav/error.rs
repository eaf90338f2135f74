// ClamAV 错误类型
//
// 错误分三类：
// - 资源错误：库或符号找不到（构造期致命）
// - 误用错误：生命周期顺序错误（未加载就扫描等）
// - 外部调用错误：非成功/非检出状态，携带操作名、状态码和诊断消息

use std::fmt;

use super::status::StatusCode;

/// ClamAV 绑定错误类型
#[derive(Debug, Clone)]
pub enum ClamAvError {
    /// 平台标准搜索路径下找不到 libclamav
    LibraryNotFound(String),
    /// 库已加载但某个必需入口点解析失败
    SymbolNotFound { symbol: String, reason: String },
    /// cl_engine_new 返回空指针
    EngineAllocFailed,
    /// 引擎未加载（或已释放）时调用了扫描操作
    NotLoaded,
    /// 外部调用返回了非成功状态
    Native {
        op: &'static str,
        status: StatusCode,
        message: String,
    },
    /// cl_retver 返回的版本字符串不是 major.minor.build 形式
    VersionParse(String),
    /// 路径含内嵌 NUL，无法传入 C API
    InvalidPath(String),
}

impl ClamAvError {
    /// 外部调用失败对应的状态码（其它错误类别返回 None）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClamAvError::Native { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClamAvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClamAvError::LibraryNotFound(msg) => write!(f, "Not found libclamav: {}", msg),
            ClamAvError::SymbolNotFound { symbol, reason } => {
                write!(f, "Symbol '{}' not found in libclamav: {}", symbol, reason)
            }
            ClamAvError::EngineAllocFailed => write!(f, "cl_engine_new returned null"),
            ClamAvError::NotLoaded => write!(f, "No lib loaded"),
            ClamAvError::Native { message, .. } => write!(f, "{}", message),
            ClamAvError::VersionParse(raw) => {
                write!(f, "Cannot parse libclamav version string: '{}'", raw)
            }
            ClamAvError::InvalidPath(path) => write!(f, "Invalid path: {}", path),
        }
    }
}

impl std::error::Error for ClamAvError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClamAvError::NotLoaded;
        assert_eq!(format!("{}", err), "No lib loaded");

        let err = ClamAvError::Native {
            op: "cl_load",
            status: StatusCode::ClEopen,
            message: "Error cl_load(): Can't open file or directory / ClEopen".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Error cl_load(): Can't open file or directory / ClEopen"
        );
    }

    #[test]
    fn test_error_status_accessor() {
        let err = ClamAvError::Native {
            op: "cl_engine_free",
            status: StatusCode::ClEarg,
            message: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::ClEarg));
        assert_eq!(ClamAvError::NotLoaded.status(), None);
    }
}
