// libclamav 动态加载层
//
// 按平台标准命名约定定位共享库，并在首次使用前逐个解析必需入口点。
// 任一符号解析失败即构造失败（SymbolNotFound），不留半绑定状态。
// 加载本身除把库映射进进程外没有其它全局副作用。

use std::path::Path;

use libloading::Library;

use super::error::ClamAvError;
use super::ffi::*;

/// 已绑定的 libclamav 符号表
///
/// 函数指针在 open 时一次性解析并拷贝出来，生命周期由同一结构体中的
/// `_lib` 保证：库在符号表存活期间不会被卸载。
pub struct LibClamav {
    // 保持库映射存活，字段顺序无关（fn 指针不借用 Library）
    _lib: Library,
    pub(crate) cl_init: ClInitFn,
    pub(crate) cl_engine_new: ClEngineNewFn,
    pub(crate) cl_load: ClLoadFn,
    pub(crate) cl_engine_compile: ClEngineCompileFn,
    pub(crate) cl_scanfile: ClScanfileFn,
    pub(crate) cl_scandesc: ClScandescFn,
    pub(crate) cl_engine_free: ClEngineFreeFn,
    pub(crate) cl_strerror: ClStrerrorFn,
    pub(crate) cl_retdbdir: ClRetdbdirFn,
    pub(crate) cl_retver: ClRetverFn,
}

/// 平台标准库文件名候选，按优先级排列
#[cfg(target_os = "linux")]
const LIBRARY_CANDIDATES: &[&str] = &[
    "libclamav.so",
    "libclamav.so.12",
    "libclamav.so.11",
    "libclamav.so.9",
];

#[cfg(target_os = "macos")]
const LIBRARY_CANDIDATES: &[&str] = &["libclamav.dylib", "libclamav.12.dylib"];

#[cfg(target_os = "windows")]
const LIBRARY_CANDIDATES: &[&str] = &["libclamav.dll", "clamav.dll"];

impl LibClamav {
    /// 按平台标准搜索路径定位并绑定 libclamav
    pub fn open() -> Result<Self, ClamAvError> {
        let mut last_err = String::new();

        for name in LIBRARY_CANDIDATES {
            // Library::new 按动态链接器的标准搜索路径查找
            match unsafe { Library::new(name) } {
                Ok(lib) => {
                    tracing::debug!("Loaded {} successfully", name);
                    return Self::bind(lib);
                }
                Err(e) => {
                    tracing::trace!("Candidate {} not loadable: {}", name, e);
                    last_err = e.to_string();
                }
            }
        }

        Err(ClamAvError::LibraryNotFound(last_err))
    }

    /// 绑定指定路径的 libclamav（跳过标准搜索）
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, ClamAvError> {
        let path = path.as_ref();
        let lib = unsafe { Library::new(path) }
            .map_err(|e| ClamAvError::LibraryNotFound(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded libclamav from {}", path.display());
        Self::bind(lib)
    }

    /// 解析全部必需入口点
    fn bind(lib: Library) -> Result<Self, ClamAvError> {
        unsafe {
            let cl_init = resolve::<ClInitFn>(&lib, "cl_init")?;
            let cl_engine_new = resolve::<ClEngineNewFn>(&lib, "cl_engine_new")?;
            let cl_load = resolve::<ClLoadFn>(&lib, "cl_load")?;
            let cl_engine_compile = resolve::<ClEngineCompileFn>(&lib, "cl_engine_compile")?;
            let cl_scanfile = resolve::<ClScanfileFn>(&lib, "cl_scanfile")?;
            let cl_scandesc = resolve::<ClScandescFn>(&lib, "cl_scandesc")?;
            let cl_engine_free = resolve::<ClEngineFreeFn>(&lib, "cl_engine_free")?;
            let cl_strerror = resolve::<ClStrerrorFn>(&lib, "cl_strerror")?;
            let cl_retdbdir = resolve::<ClRetdbdirFn>(&lib, "cl_retdbdir")?;
            let cl_retver = resolve::<ClRetverFn>(&lib, "cl_retver")?;

            Ok(Self {
                _lib: lib,
                cl_init,
                cl_engine_new,
                cl_load,
                cl_engine_compile,
                cl_scanfile,
                cl_scandesc,
                cl_engine_free,
                cl_strerror,
                cl_retdbdir,
                cl_retver,
            })
        }
    }
}

/// 解析单个符号并拷贝出函数指针
unsafe fn resolve<T: Copy>(lib: &Library, symbol: &str) -> Result<T, ClamAvError> {
    let name = format!("{}\0", symbol);
    match lib.get::<T>(name.as_bytes()) {
        Ok(sym) => Ok(*sym),
        Err(e) => Err(ClamAvError::SymbolNotFound {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_at_nonexistent_path() {
        let result = LibClamav::open_at("/nonexistent/libclamav.so");
        assert!(matches!(result, Err(ClamAvError::LibraryNotFound(_))));
    }
}
