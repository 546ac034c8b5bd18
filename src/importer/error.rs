// ==========================================
// CNC 切割清单 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 文件访问 / 表结构 / 字段解析 / 领域约束
// ==========================================

use thiserror::Error;

/// 导入错误分类（决定 CLI 退出码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    FileAccess,
    Schema,
    FieldParse,
    DomainConstraint,
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表结构错误 =====
    #[error("工作簿结构错误: {0}")]
    MalformedWorkbook(String),

    #[error("缺少必需列: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    // ===== 字段解析错误 =====
    #[error("字段解析失败 (行 {row}, 列 {column}): {message}（值: '{value}'）")]
    FieldParseError {
        row: usize,
        column: String,
        value: String,
        message: String,
    },

    // ===== 领域约束错误 =====
    #[error("领域约束违反 (行 {row}, 字段 {field}): {message}")]
    DomainConstraintError {
        row: usize,
        field: String,
        message: String,
    },
}

impl ImportError {
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::FileNotFound(_)
            | ImportError::UnsupportedFormat(_)
            | ImportError::FileReadError(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError(_) => ImportErrorKind::FileAccess,
            ImportError::MalformedWorkbook(_) | ImportError::MissingColumns { .. } => {
                ImportErrorKind::Schema
            }
            ImportError::FieldParseError { .. } => ImportErrorKind::FieldParse,
            ImportError::DomainConstraintError { .. } => ImportErrorKind::DomainConstraint,
        }
    }

    /// 出错的行号（表结构/文件错误无行号）
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::FieldParseError { row, .. }
            | ImportError::DomainConstraintError { row, .. } => Some(*row),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ImportError::FileNotFound("a.xlsx".to_string()).kind(),
            ImportErrorKind::FileAccess
        );
        assert_eq!(
            ImportError::MissingColumns {
                missing: vec!["aantal".to_string()]
            }
            .kind(),
            ImportErrorKind::Schema
        );
        let err = ImportError::FieldParseError {
            row: 4,
            column: "lengte_mm".to_string(),
            value: "abc".to_string(),
            message: "无法解析为数值".to_string(),
        };
        assert_eq!(err.kind(), ImportErrorKind::FieldParse);
        assert_eq!(err.row(), Some(4));
    }

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = ImportError::MissingColumns {
            missing: vec!["lengte_mm".to_string(), "aantal".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("lengte_mm"));
        assert!(msg.contains("aantal"));
    }

    #[test]
    fn test_field_parse_message_names_column() {
        let err = ImportError::FieldParseError {
            row: 7,
            column: "aantal".to_string(),
            value: "2.5".to_string(),
            message: "数量必须为整数".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("行 7"));
        assert!(msg.contains("aantal"));
    }
}
