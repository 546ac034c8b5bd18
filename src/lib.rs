// ==========================================
// CNC 切割清单 - 核心库
// ==========================================
// 流程: Excel/CSV 切割清单 → 校验 → CNC 程序 / CSV / JSON
// 架构: 单线程同步批处理，无持久化
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 读取 / 映射 / 校验
pub mod importer;

// 配置层 - 机床参数 / 型材映射表
pub mod config;

// 引擎层 - 分组 / G-code / 编排
pub mod engine;

// 导出层 - 渲染 + 原子写入
pub mod exporter;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DqLevel, OutputFormat, Side};

// 领域实体
pub use domain::{CutListItem, DqReport, ExportRecord, Hole, ProfileSpec, Workbook};

// 配置
pub use config::{ConvertConfig, MachineSettings, ProfileMap};

// 引擎
pub use engine::{
    ConversionPipeline, ConversionReport, ConversionSummary, ConvertError, ConvertResult,
    InspectReport,
};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "cnc-cutlist";
