// ClamAV 扫描器：引擎生命周期管理 + 扫描分发
//
// 生命周期状态机：
//   Unloaded -> Loaded -> Freed（Unloaded -> Freed 也合法）
// Freed 之后不能回到 Loaded；只有 Loaded 状态允许扫描。
//
// 资源保证：引擎句柄由单个 Scanner 值独占，cl_engine_free 在任何
// 退出路径上恰好执行一次（显式 free 或 Drop 兜底）。
//
// 并发约定：所有外部调用都是阻塞的同步调用；单个引擎句柄的并发
// 访问必须由调用方自行串行化（Scanner 持有原生指针，非 Send/Sync）。

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint, c_ulong};
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::OnceLock;

use super::error::ClamAvError;
use super::ffi::{cl_engine, CL_DB_STDOPT, CL_INIT_DEFAULT};
use super::loader::LibClamav;
use super::status::{diagnostic, ScanDisposition, StatusCode};
use super::types::{parse_version, EngineVersion, ScanOptions, ScanOutcome};

/// cl_init 的进程级结果缓存
///
/// 原生运行时初始化是进程级共享资源，与 Scanner 实例数量无关，
/// 只允许调用一次；后续 Scanner 复用首次调用的状态。
static RUNTIME_INIT: OnceLock<i32> = OnceLock::new();

/// LibClamAV 文件扫描器
///
/// 构造时绑定共享库、初始化全局运行时并分配引擎句柄（Unloaded），
/// load 加载并编译签名库（Loaded），之后可重复扫描，free 释放句柄。
pub struct Scanner {
    lib: LibClamav,
    engine: *mut cl_engine,
    loaded: bool,
    db_dir: Option<PathBuf>,
    signatures: u32,
}

impl Scanner {
    /// 按平台标准搜索定位 libclamav 并创建扫描器
    ///
    /// db_dir 为空时，load 阶段使用 cl_retdbdir 返回的默认数据库目录。
    pub fn new(db_dir: Option<PathBuf>) -> Result<Self, ClamAvError> {
        let lib = LibClamav::open()?;
        Self::with_library(lib, db_dir)
    }

    /// 用已绑定的库创建扫描器（用于显式库路径，见 LibClamav::open_at）
    pub fn with_library(lib: LibClamav, db_dir: Option<PathBuf>) -> Result<Self, ClamAvError> {
        // 进程级一次性初始化
        let raw = *RUNTIME_INIT.get_or_init(|| unsafe { (lib.cl_init)(CL_INIT_DEFAULT) });
        let status = StatusCode::from_raw(raw);
        if !status.is_success() {
            return Err(native_err(&lib, "cl_init", status));
        }

        let engine = unsafe { (lib.cl_engine_new)() };
        if engine.is_null() {
            tracing::error!("cl_engine_new returned null");
            return Err(ClamAvError::EngineAllocFailed);
        }

        Ok(Self {
            lib,
            engine,
            loaded: false,
            db_dir,
            signatures: 0,
        })
    }

    /// 加载并编译病毒签名库
    ///
    /// 加载失败和编译失败是两类不同的致命错误；编译失败后引擎
    /// 不进入 Loaded 状态（已加载但不可用的引擎不允许扫描）。
    pub fn load(&mut self) -> Result<(), ClamAvError> {
        if self.engine.is_null() {
            return Err(ClamAvError::NotLoaded);
        }

        let db_dir = match &self.db_dir {
            Some(path) => path_cstring(path)?,
            None => {
                // 原生库自带的默认数据库目录
                let ptr = unsafe { (self.lib.cl_retdbdir)() };
                unsafe { CStr::from_ptr(ptr) }.to_owned()
            }
        };

        tracing::info!(
            "Loading virus database from: {}",
            db_dir.to_string_lossy()
        );

        let mut signo: c_uint = 0;
        let status = StatusCode::from_raw(unsafe {
            (self.lib.cl_load)(db_dir.as_ptr(), self.engine, &mut signo, CL_DB_STDOPT)
        });
        if !status.is_success() {
            return Err(native_err(&self.lib, "cl_load", status));
        }
        self.signatures = signo;
        tracing::info!("Loaded {} signatures from database", signo);

        let status =
            StatusCode::from_raw(unsafe { (self.lib.cl_engine_compile)(self.engine) });
        if !status.is_success() {
            tracing::error!("Engine compile failed after successful load");
            return Err(native_err(&self.lib, "cl_engine_compile", status));
        }

        self.loaded = true;
        tracing::info!("ClamAV engine compiled successfully");
        Ok(())
    }

    /// 已加载的签名数量（load 成功前为 0）
    pub fn signature_count(&self) -> u32 {
        self.signatures
    }

    /// 扫描器是否处于可扫描（Loaded）状态
    pub fn is_loaded(&self) -> bool {
        self.loaded && !self.engine.is_null()
    }

    /// 按路径扫描文件（默认全零扫描选项）
    pub fn scan_file<P: AsRef<Path>>(&self, path: P) -> Result<ScanOutcome, ClamAvError> {
        self.scan_file_with(path, ScanOptions::default())
    }

    /// 按路径扫描文件，指定扫描选项
    pub fn scan_file_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: ScanOptions,
    ) -> Result<ScanOutcome, ClamAvError> {
        if !self.is_loaded() {
            return Err(ClamAvError::NotLoaded);
        }

        let path = path.as_ref();
        let path_cstr = path_cstring(path)?;
        let raw_options = options.to_raw();

        let mut virname: *const c_char = ptr::null();
        let mut scanned: c_ulong = 0;

        tracing::debug!("Scanning file: {}", path.display());

        let status = StatusCode::from_raw(unsafe {
            (self.lib.cl_scanfile)(
                path_cstr.as_ptr(),
                &mut virname,
                &mut scanned,
                self.engine,
                &raw_options,
            )
        });

        self.decode_scan("cl_scanfile", status, virname, scanned)
    }

    /// 扫描已打开的文件描述符（默认全零扫描选项）
    ///
    /// path 仅作为原生库日志/类型启发式的提示，不影响扫描内容；
    /// 扫描从描述符当前读位置开始，调用后描述符既不回卷也不关闭。
    pub fn scan_descriptor(
        &self,
        fd: RawFd,
        path: Option<&Path>,
    ) -> Result<ScanOutcome, ClamAvError> {
        self.scan_descriptor_with(fd, path, ScanOptions::default())
    }

    /// 扫描已打开的文件描述符，指定扫描选项
    pub fn scan_descriptor_with(
        &self,
        fd: RawFd,
        path: Option<&Path>,
        options: ScanOptions,
    ) -> Result<ScanOutcome, ClamAvError> {
        if !self.is_loaded() {
            return Err(ClamAvError::NotLoaded);
        }

        let advisory = match path {
            Some(p) => Some(path_cstring(p)?),
            None => None,
        };
        let raw_options = options.to_raw();

        let mut virname: *const c_char = ptr::null();
        let mut scanned: c_ulong = 0;

        tracing::debug!("Scanning descriptor: fd={}", fd);

        let status = StatusCode::from_raw(unsafe {
            (self.lib.cl_scandesc)(
                fd,
                advisory.as_ref().map_or(ptr::null(), |p| p.as_ptr()),
                &mut virname,
                &mut scanned,
                self.engine,
                &raw_options,
            )
        });

        self.decode_scan("cl_scandesc", status, virname, scanned)
    }

    /// libclamav 版本号（major.minor.build 三元组）
    pub fn version(&self) -> Result<EngineVersion, ClamAvError> {
        let ptr = unsafe { (self.lib.cl_retver)() };
        if ptr.is_null() {
            return Err(ClamAvError::VersionParse("<null>".to_string()));
        }
        let raw = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
        parse_version(&raw)
    }

    /// 释放引擎句柄（幂等）
    ///
    /// 句柄已释放（或从未分配）时是 no-op；释放后扫描器不可再用，
    /// 任何扫描调用都会报 NotLoaded。
    pub fn free(&mut self) -> Result<(), ClamAvError> {
        self.loaded = false;

        if self.engine.is_null() {
            return Ok(());
        }

        // 先置空再释放，保证恰好释放一次（即使 free 报错也不会重试）
        let engine = std::mem::replace(&mut self.engine, ptr::null_mut());
        let status = StatusCode::from_raw(unsafe { (self.lib.cl_engine_free)(engine) });
        if !status.is_success() {
            return Err(native_err(&self.lib, "cl_engine_free", status));
        }

        tracing::debug!("ClamAV engine freed");
        Ok(())
    }

    /// 翻译扫描调用的状态和 out 参数
    fn decode_scan(
        &self,
        op: &'static str,
        status: StatusCode,
        virname: *const c_char,
        scanned: c_ulong,
    ) -> Result<ScanOutcome, ClamAvError> {
        match status.disposition() {
            ScanDisposition::Clean => {
                tracing::debug!("{}: clean, {} data blocks scanned", op, scanned);
                Ok(ScanOutcome::clean())
            }
            ScanDisposition::Infected => {
                // 病毒名是引擎持有的静态字符串，拷贝后立即脱离原生内存
                let name = if virname.is_null() {
                    None
                } else {
                    Some(unsafe { CStr::from_ptr(virname) }.to_string_lossy().into_owned())
                };
                tracing::warn!("{}: VIRUS FOUND: {:?}", op, name);
                Ok(ScanOutcome::infected(name))
            }
            ScanDisposition::Error(status) => Err(native_err(&self.lib, op, status)),
        }
    }
}

// 兜底释放：Scanner 离开作用域而未显式 free 时也保证句柄回收。
// Drop 内不传播错误，释放失败只记日志。
impl Drop for Scanner {
    fn drop(&mut self) {
        if !self.engine.is_null() {
            if let Err(e) = self.free() {
                tracing::warn!("cl_engine_free failed in drop: {}", e);
            }
        }
    }
}

/// 构造外部调用错误，诊断消息带 cl_strerror 文本
fn native_err(lib: &LibClamav, op: &'static str, status: StatusCode) -> ClamAvError {
    let text = unsafe {
        let ptr = (lib.cl_strerror)(status.as_raw());
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    };

    let message = diagnostic(op, text.as_deref(), status);
    tracing::error!("{}", message);
    ClamAvError::Native {
        op,
        status,
        message,
    }
}

/// 路径转 C 字符串（内嵌 NUL 视为非法路径）
fn path_cstring(path: &Path) -> Result<CString, ClamAvError> {
    CString::new(path.to_string_lossy().into_owned())
        .map_err(|_| ClamAvError::InvalidPath(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_cstring_rejects_embedded_nul() {
        let path = PathBuf::from("bad\0path");
        assert!(matches!(
            path_cstring(&path),
            Err(ClamAvError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_path_cstring_plain_path() {
        let cstr = path_cstring(Path::new("/tmp/sample.bin")).unwrap();
        assert_eq!(cstr.to_bytes(), b"/tmp/sample.bin");
    }
}
