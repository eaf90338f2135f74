// ClamAV 绑定公共数据类型
//
// 外部 API 使用的扫描选项、扫描结果和版本信息都在这里定义，
// out 参数约定统一翻译成带可选字段的普通返回值结构。

use std::fmt;

use super::error::ClamAvError;
use super::ffi::{
    cl_scan_options, CL_SCAN_GENERAL_HEURISTICS, CL_SCAN_PARSE_ARCHIVE, CL_SCAN_PARSE_ELF,
    CL_SCAN_PARSE_MAIL, CL_SCAN_PARSE_PDF,
};

/// 扫描选项
///
/// 默认全部关闭，对应全零的 cl_scan_options（引擎按签名库原样匹配，
/// 不展开归档、不跑启发式）。每次扫描调用都会降级成一个新的原始记录。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub scan_archive: bool,
    pub scan_elf: bool,
    pub scan_pdf: bool,
    pub scan_mail: bool,
    pub heuristics: bool,
}

impl ScanOptions {
    /// 降级为 C API 的 cl_scan_options 记录
    pub(crate) fn to_raw(self) -> cl_scan_options {
        let mut raw = cl_scan_options::default();

        if self.scan_archive {
            raw.parse |= CL_SCAN_PARSE_ARCHIVE;
        }
        if self.scan_elf {
            raw.parse |= CL_SCAN_PARSE_ELF;
        }
        if self.scan_pdf {
            raw.parse |= CL_SCAN_PARSE_PDF;
        }
        if self.scan_mail {
            raw.parse |= CL_SCAN_PARSE_MAIL;
        }
        if self.heuristics {
            raw.general |= CL_SCAN_GENERAL_HEURISTICS;
        }

        raw
    }
}

/// 单次扫描结果
///
/// virus_name 当且仅当 infected 为真时存在。每次扫描调用新建，
/// 不持有引擎内部字符串的所有权（已拷贝）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub infected: bool,
    pub virus_name: Option<String>,
}

impl ScanOutcome {
    pub fn clean() -> Self {
        Self {
            infected: false,
            virus_name: None,
        }
    }

    pub fn infected(virus_name: Option<String>) -> Self {
        Self {
            infected: true,
            virus_name,
        }
    }
}

/// libclamav 版本号三元组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// 解析 cl_retver 返回的点分版本字符串
///
/// 必须恰好是三段非负整数（major.minor.build），否则报解析错误。
pub fn parse_version(raw: &str) -> Result<EngineVersion, ClamAvError> {
    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() != 3 {
        return Err(ClamAvError::VersionParse(raw.to_string()));
    }

    let parse_part =
        |s: &str| s.parse::<u32>().map_err(|_| ClamAvError::VersionParse(raw.to_string()));

    Ok(EngineVersion {
        major: parse_part(parts[0])?,
        minor: parse_part(parts[1])?,
        build: parse_part(parts[2])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_default_is_zero() {
        let raw = ScanOptions::default().to_raw();
        assert_eq!(raw.general, 0);
        assert_eq!(raw.parse, 0);
        assert_eq!(raw.heuristic, 0);
        assert_eq!(raw.mail, 0);
        assert_eq!(raw.dev, 0);
    }

    #[test]
    fn test_scan_options_to_raw_bits() {
        let opts = ScanOptions {
            scan_archive: true,
            scan_elf: true,
            heuristics: true,
            ..Default::default()
        };
        let raw = opts.to_raw();
        assert_eq!(raw.parse, CL_SCAN_PARSE_ARCHIVE | CL_SCAN_PARSE_ELF);
        assert_eq!(raw.general, CL_SCAN_GENERAL_HEURISTICS);
        assert_eq!(raw.mail, 0);
    }

    #[test]
    fn test_parse_version_ok() {
        let ver = parse_version("1.4.3").unwrap();
        assert_eq!(
            ver,
            EngineVersion {
                major: 1,
                minor: 4,
                build: 3
            }
        );
        assert_eq!(format!("{}", ver), "1.4.3");
    }

    #[test]
    fn test_parse_version_rejects_bad_shapes() {
        assert!(parse_version("1.4").is_err());
        assert!(parse_version("1.4.3.7").is_err());
        assert!(parse_version("1.4.x").is_err());
        assert!(parse_version("").is_err());
        assert!(parse_version("1.-4.3").is_err());
    }

    #[test]
    fn test_outcome_constructors() {
        let clean = ScanOutcome::clean();
        assert!(!clean.infected);
        assert!(clean.virus_name.is_none());

        let hit = ScanOutcome::infected(Some("Win.Test.EICAR_HDB-1".to_string()));
        assert!(hit.infected);
        assert_eq!(hit.virus_name.as_deref(), Some("Win.Test.EICAR_HDB-1"));
    }
}
