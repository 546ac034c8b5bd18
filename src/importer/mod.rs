// ==========================================
// CNC 切割清单 - 导入层
// ==========================================
// 职责: 外部切割清单 → 已校验的 CutListItem
// 支持: Excel (xlsx/xlsm/xls/xlsb/ods), CSV
// ==========================================

// 模块声明
pub mod cutlist_importer;
pub mod cutlist_importer_trait;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod schema;

// 重导出核心类型
pub use cutlist_importer::{CutListImporter, ImportOutcome};
pub use data_cleaner::DataCleaner;
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportErrorKind, ImportResult};
pub use field_mapper::{CarryOver, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use schema::{Column, CutListSchema, ResolvedSchema};

// 重导出 Trait 接口
pub use cutlist_importer_trait::{DqValidator, FieldMapper, FileParser};
