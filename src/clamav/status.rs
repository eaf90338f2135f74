// ClamAV 状态码翻译层
//
// 所有外部调用的原始返回值必须先经过 StatusCode::from_raw 翻译，
// 再进入任何判断逻辑。未知整数视为绑定缺陷（panic），不做运行时恢复。

use std::fmt;

/// ClamAV 原生状态码（封闭枚举，与 clamav.h 的 cl_error_t 一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    ClSuccess = 0,
    ClVirus = 1,
    ClEnullarg = 2,
    ClEarg = 3,
    ClEmalfdb = 4,
    ClEcvd = 5,
    ClEverify = 6,
    ClEunpack = 7,
    ClEopen = 8,
    ClEcreat = 9,
    ClEunlink = 10,
    ClEstat = 11,
    ClEread = 12,
    ClEseek = 13,
    ClEwrite = 14,
    ClEdup = 15,
    ClEacces = 16,
    ClEtmpfile = 17,
    ClEtmpdir = 18,
    ClEmap = 19,
    ClEmem = 20,
    ClEtimeout = 21,
    ClBreak = 22,
    ClEmaxrec = 23,
    ClEmaxsize = 24,
    ClEmaxfiles = 25,
    ClEformat = 26,
    ClEparse = 27,
    ClEbytecode = 28,
    ClEbytecodeTestfail = 29,
    ClElock = 30,
    ClEbusy = 31,
    ClEstate = 32,
    ClElastError = 33,
}

/// 全部状态码，按原始值升序（用于翻译和回环测试）
pub const ALL_STATUS_CODES: [StatusCode; 34] = [
    StatusCode::ClSuccess,
    StatusCode::ClVirus,
    StatusCode::ClEnullarg,
    StatusCode::ClEarg,
    StatusCode::ClEmalfdb,
    StatusCode::ClEcvd,
    StatusCode::ClEverify,
    StatusCode::ClEunpack,
    StatusCode::ClEopen,
    StatusCode::ClEcreat,
    StatusCode::ClEunlink,
    StatusCode::ClEstat,
    StatusCode::ClEread,
    StatusCode::ClEseek,
    StatusCode::ClEwrite,
    StatusCode::ClEdup,
    StatusCode::ClEacces,
    StatusCode::ClEtmpfile,
    StatusCode::ClEtmpdir,
    StatusCode::ClEmap,
    StatusCode::ClEmem,
    StatusCode::ClEtimeout,
    StatusCode::ClBreak,
    StatusCode::ClEmaxrec,
    StatusCode::ClEmaxsize,
    StatusCode::ClEmaxfiles,
    StatusCode::ClEformat,
    StatusCode::ClEparse,
    StatusCode::ClEbytecode,
    StatusCode::ClEbytecodeTestfail,
    StatusCode::ClElock,
    StatusCode::ClEbusy,
    StatusCode::ClEstate,
    StatusCode::ClElastError,
];

impl StatusCode {
    /// 把原始整数返回值翻译为状态码
    ///
    /// # Panics
    /// 遇到枚举之外的整数时 panic：说明绑定与所装载的 libclamav
    /// 版本不匹配，属于绑定缺陷而非可恢复错误。
    pub fn from_raw(raw: i32) -> Self {
        match ALL_STATUS_CODES.get(raw as usize) {
            Some(code) if code.as_raw() == raw => *code,
            _ => panic!("unknown libclamav status code: {}", raw),
        }
    }

    /// 状态码对应的原始整数值
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// 按扫描语义分类：干净 / 检出 / 错误
    pub fn disposition(self) -> ScanDisposition {
        match self {
            StatusCode::ClSuccess => ScanDisposition::Clean,
            StatusCode::ClVirus => ScanDisposition::Infected,
            other => ScanDisposition::Error(other),
        }
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::ClSuccess
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 扫描结果分类
///
/// 检出（Infected）不是错误，是与成功并列的正常结果；
/// 其余所有状态统一归为错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDisposition {
    Clean,
    Infected,
    Error(StatusCode),
}

/// 构造外部调用失败的诊断消息
///
/// 格式沿用 `Error {op}(): {strerror 文本} / {状态码}`，
/// strerror 文本由调用方通过 cl_strerror 取得（可能为空）。
pub fn diagnostic(op: &str, strerror: Option<&str>, status: StatusCode) -> String {
    format!(
        "Error {}(): {} / {:?}",
        op,
        strerror.unwrap_or("None"),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // 每个枚举值 整数 -> StatusCode -> 整数 回环稳定
    #[test]
    fn test_status_round_trip() {
        for code in ALL_STATUS_CODES {
            assert_eq!(StatusCode::from_raw(code.as_raw()), code);
        }
    }

    #[test]
    fn test_from_raw_known_values() {
        assert_eq!(StatusCode::from_raw(0), StatusCode::ClSuccess);
        assert_eq!(StatusCode::from_raw(1), StatusCode::ClVirus);
        assert_eq!(StatusCode::from_raw(20), StatusCode::ClEmem);
        assert_eq!(StatusCode::from_raw(33), StatusCode::ClElastError);
    }

    #[test]
    #[should_panic(expected = "unknown libclamav status code")]
    fn test_from_raw_unknown_panics() {
        StatusCode::from_raw(34);
    }

    #[test]
    #[should_panic(expected = "unknown libclamav status code")]
    fn test_from_raw_negative_panics() {
        StatusCode::from_raw(-1);
    }

    #[test]
    fn test_disposition() {
        assert_eq!(StatusCode::ClSuccess.disposition(), ScanDisposition::Clean);
        assert_eq!(StatusCode::ClVirus.disposition(), ScanDisposition::Infected);
        assert_eq!(
            StatusCode::ClEopen.disposition(),
            ScanDisposition::Error(StatusCode::ClEopen)
        );
    }

    #[test]
    fn test_diagnostic_format() {
        let msg = diagnostic("cl_load", Some("Can't open file or directory"), StatusCode::ClEopen);
        assert_eq!(msg, "Error cl_load(): Can't open file or directory / ClEopen");

        let msg = diagnostic("cl_init", None, StatusCode::ClEmem);
        assert_eq!(msg, "Error cl_init(): None / ClEmem");
    }
}
