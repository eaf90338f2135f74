// ClamAV C API 类型绑定层
//
// 此文件只定义与 libclamav C API 对齐的原始类型、常量和函数指针签名，
// 不包含任何调用逻辑。符号解析见 loader.rs，状态码翻译见 status.rs。

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_uint, c_ulong};

/// ClamAV 错误码类型
pub type cl_error_t = c_int;

/// ClamAV 引擎结构体 (opaque pointer)
#[repr(C)]
pub struct cl_engine {
    _private: [u8; 0],
}

/// 扫描选项结构体
/// 与 ClamAV C API 完全对齐（5个字段，全部 u32）
#[repr(C)]
#[derive(Debug, Copy, Clone, Default)]
pub struct cl_scan_options {
    pub general: u32,
    pub parse: u32,
    pub heuristic: u32,
    pub mail: u32,
    pub dev: u32,
}

// ============ 扫描选项常量 ============

// general 字段
pub const CL_SCAN_GENERAL_ALLMATCHES: u32 = 0x1;
pub const CL_SCAN_GENERAL_COLLECT_METADATA: u32 = 0x2;
pub const CL_SCAN_GENERAL_HEURISTICS: u32 = 0x4;

// parse 字段
pub const CL_SCAN_PARSE_ARCHIVE: u32 = 0x1;
pub const CL_SCAN_PARSE_ELF: u32 = 0x2;
pub const CL_SCAN_PARSE_PDF: u32 = 0x4;
pub const CL_SCAN_PARSE_SWF: u32 = 0x8;
pub const CL_SCAN_PARSE_HWP: u32 = 0x10;
pub const CL_SCAN_PARSE_XMLDOCS: u32 = 0x20;
pub const CL_SCAN_PARSE_MAIL: u32 = 0x40;
pub const CL_SCAN_PARSE_OLE2: u32 = 0x80;
pub const CL_SCAN_PARSE_HTML: u32 = 0x100;
pub const CL_SCAN_PARSE_PE: u32 = 0x200;

/// cl_init 默认初始化选项
pub const CL_INIT_DEFAULT: c_uint = 0;

// 数据库选项常量
pub const CL_DB_PHISHING: c_uint = 0x2;
pub const CL_DB_PHISHING_URLS: c_uint = 0x8;
pub const CL_DB_BYTECODE: c_uint = 0x2000;
pub const CL_DB_STDOPT: c_uint = CL_DB_PHISHING | CL_DB_PHISHING_URLS | CL_DB_BYTECODE;

// ============ 函数指针签名 ============
//
// 每个入口点的调用签名在加载时显式建立（见 loader.rs），
// 与 clamav.h 中的声明一一对应。

/// cl_init(initoptions) -> cl_error_t
pub type ClInitFn = unsafe extern "C" fn(initoptions: c_uint) -> cl_error_t;

/// cl_engine_new() -> *mut cl_engine
pub type ClEngineNewFn = unsafe extern "C" fn() -> *mut cl_engine;

/// cl_load(path, engine, signo, dboptions) -> cl_error_t
pub type ClLoadFn = unsafe extern "C" fn(
    path: *const c_char,
    engine: *mut cl_engine,
    signo: *mut c_uint,
    dboptions: c_uint,
) -> cl_error_t;

/// cl_engine_compile(engine) -> cl_error_t
pub type ClEngineCompileFn = unsafe extern "C" fn(engine: *mut cl_engine) -> cl_error_t;

/// cl_scanfile(filename, virname, scanned, engine, scanoptions) -> cl_error_t
pub type ClScanfileFn = unsafe extern "C" fn(
    filename: *const c_char,
    virname: *mut *const c_char,
    scanned: *mut c_ulong,
    engine: *const cl_engine,
    scanoptions: *const cl_scan_options,
) -> cl_error_t;

/// cl_scandesc(desc, filename, virname, scanned, engine, scanoptions) -> cl_error_t
///
/// filename 仅作为日志/启发式提示，实际扫描内容由描述符当前读位置决定。
pub type ClScandescFn = unsafe extern "C" fn(
    desc: c_int,
    filename: *const c_char,
    virname: *mut *const c_char,
    scanned: *mut c_ulong,
    engine: *const cl_engine,
    scanoptions: *const cl_scan_options,
) -> cl_error_t;

/// cl_engine_free(engine) -> cl_error_t
pub type ClEngineFreeFn = unsafe extern "C" fn(engine: *mut cl_engine) -> cl_error_t;

/// cl_strerror(clerror) -> *const c_char
pub type ClStrerrorFn = unsafe extern "C" fn(clerror: c_int) -> *const c_char;

/// cl_retdbdir() -> *const c_char
pub type ClRetdbdirFn = unsafe extern "C" fn() -> *const c_char;

/// cl_retver() -> *const c_char
pub type ClRetverFn = unsafe extern "C" fn() -> *const c_char;
