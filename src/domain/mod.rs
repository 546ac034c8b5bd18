// ==========================================
// CNC 切割清单 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件访问逻辑,不含引擎逻辑
// ==========================================

pub mod cutlist;
pub mod profile;
pub mod types;

// 重导出核心类型
pub use cutlist::{
    CellValue, CutListItem, DqReport, DqViolation, ExportRecord, Hole, RawRow, Workbook,
};
pub use profile::ProfileSpec;
pub use types::{DqLevel, OutputFormat, Side};
