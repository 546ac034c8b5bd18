// ==========================================
// CNC 切割清单 - 引擎层
// ==========================================
// 职责: 型材分组、钻孔循环、G-code 生成、转换编排
// 红线: 引擎不做文件 I/O（写入由导出层完成）
// ==========================================

pub mod drill_cycle;
pub mod error;
pub mod gcode;
pub mod orchestrator;
pub mod profile_grouper;
pub mod summary;

// 重导出核心引擎
pub use drill_cycle::slow_then_peck;
pub use error::{ConvertError, ConvertResult};
pub use gcode::ProgramBuilder;
pub use orchestrator::{ConversionPipeline, ConversionReport, InspectReport};
pub use profile_grouper::ProfileGrouper;
pub use summary::{ConversionSummary, LengthStats};
