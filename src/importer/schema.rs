// ==========================================
// CNC 切割清单 - 表结构描述
// ==========================================
// 职责: 列名别名 → 标准列；加载时一次性校验必需列
// 红线: 缺列必须在处理任何数据行之前失败
// ==========================================

use crate::domain::cutlist::Workbook;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// Column - 标准列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    ProfileName,
    ProfileCode,
    Orientation,
    Length,
    Quantity,
    Side,
    Holes,
    Material,
    CutIndex,
}

impl Column {
    /// 全部标准列（即导出 CSV 的列顺序）
    pub const ALL: [Column; 9] = [
        Column::CutIndex,
        Column::ProfileName,
        Column::ProfileCode,
        Column::Orientation,
        Column::Length,
        Column::Quantity,
        Column::Side,
        Column::Holes,
        Column::Material,
    ];

    /// 标准列名
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Column::ProfileName => "profiel_naam",
            Column::ProfileCode => "profiel_type",
            Column::Orientation => "orientatie",
            Column::Length => "lengte_mm",
            Column::Quantity => "aantal",
            Column::Side => "zijde",
            Column::Holes => "gaten_x@d_mm",
            Column::Material => "materiaal",
            Column::CutIndex => "cut_index",
        }
    }

    /// 可识别的列名（已标准化）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::ProfileName => &["profiel_naam", "profiel", "profielnaam"],
            Column::ProfileCode => &["profiel_type", "type", "profielcode", "profiel_code"],
            Column::Orientation => &["orientatie"],
            Column::Length => &["lengte_mm", "lengte"],
            Column::Quantity => &["aantal"],
            Column::Side => &["zijde"],
            Column::Holes => &["gaten_x@d_mm", "gaten"],
            Column::Material => &["materiaal", "material"],
            Column::CutIndex => &["cut_index"],
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Column::ProfileName | Column::ProfileCode | Column::Length | Column::Quantity
        )
    }

    fn from_header(normalized: &str) -> Option<Column> {
        Column::ALL
            .iter()
            .copied()
            .find(|col| col.aliases().contains(&normalized))
    }
}

// ==========================================
// ResolvedSchema - 已解析的列位置
// ==========================================
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    indices: HashMap<Column, usize>,
    hole_columns: Vec<usize>,
    headers: Vec<String>,
}

impl ResolvedSchema {
    pub fn index(&self, column: Column) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    /// 所有孔位列（标准孔位列在前，其余含 '@' 的列按出现顺序）
    pub fn hole_columns(&self) -> &[usize] {
        &self.hole_columns
    }

    /// 原始表头（用于错误信息）
    pub fn header(&self, index: usize) -> &str {
        self.headers.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// 已识别的标准列（按表头顺序）
    pub fn recognized(&self) -> Vec<(usize, Column)> {
        let mut cols: Vec<_> = self.indices.iter().map(|(c, i)| (*i, *c)).collect();
        cols.sort_by_key(|(i, _)| *i);
        cols
    }
}

// ==========================================
// CutListSchema - 表结构描述
// ==========================================
pub struct CutListSchema {
    cleaner: DataCleaner,
}

impl Default for CutListSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl CutListSchema {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 将表头解析为标准列
    ///
    /// # 返回
    /// - Ok(ResolvedSchema): 全部必需列存在
    /// - Err(MissingColumns): 列出全部缺失的必需列
    pub fn resolve(&self, workbook: &Workbook) -> ImportResult<ResolvedSchema> {
        let mut indices = HashMap::new();
        let mut unknown = Vec::new();

        for (idx, header) in workbook.headers.iter().enumerate() {
            let normalized = self.cleaner.normalize_header(header);
            match Column::from_header(&normalized) {
                // 重复列只取第一列
                Some(col) if !indices.contains_key(&col) => {
                    indices.insert(col, idx);
                }
                Some(col) => {
                    debug!(column = col.canonical_name(), index = idx, "忽略重复列");
                }
                None => unknown.push(idx),
            }
        }

        let missing: Vec<String> = Column::ALL
            .iter()
            .filter(|col| col.is_required() && !indices.contains_key(col))
            .map(|col| col.canonical_name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns { missing });
        }

        // 未识别但含 '@' 的列视为额外孔位列
        let mut hole_columns: Vec<usize> = indices.get(&Column::Holes).copied().into_iter().collect();
        for idx in unknown {
            let has_hole_marker = workbook.rows.iter().any(|row| {
                self.cleaner
                    .text(row.cell(idx))
                    .map(|t| t.contains('@'))
                    .unwrap_or(false)
            });
            if has_hole_marker {
                debug!(header = %workbook.headers[idx], "额外孔位列");
                hole_columns.push(idx);
            }
        }

        Ok(ResolvedSchema {
            indices,
            hole_columns,
            headers: workbook.headers.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cutlist::{CellValue, RawRow};

    fn workbook(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Workbook {
        Workbook {
            source: "test.xlsx".to_string(),
            sheet: "Blad1".to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| RawRow {
                    row_number: i + 2,
                    cells,
                })
                .collect(),
        }
    }

    #[test]
    fn test_resolve_aliases() {
        let wb = workbook(&["Profiel", "Type", "Lengte", "Aantal", "Oriëntatie"], vec![]);
        let schema = CutListSchema::new().resolve(&wb).unwrap();
        assert_eq!(schema.index(Column::ProfileName), Some(0));
        assert_eq!(schema.index(Column::ProfileCode), Some(1));
        assert_eq!(schema.index(Column::Length), Some(2));
        assert_eq!(schema.index(Column::Quantity), Some(3));
        assert_eq!(schema.index(Column::Orientation), Some(4));
        assert_eq!(schema.index(Column::Side), None);
    }

    #[test]
    fn test_missing_required_columns_reported_together() {
        let wb = workbook(&["profiel_naam", "profiel_type"], vec![]);
        let err = CutListSchema::new().resolve(&wb).unwrap_err();
        match err {
            ImportError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["lengte_mm".to_string(), "aantal".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extra_hole_columns_detected() {
        let wb = workbook(
            &["profiel_naam", "profiel_type", "lengte_mm", "aantal", "gaten", "", "opmerking"],
            vec![vec![
                CellValue::Text("P1".to_string()),
                CellValue::Text("20x40".to_string()),
                CellValue::Number(1000.0),
                CellValue::Number(1.0),
                CellValue::Text("10@5".to_string()),
                CellValue::Text("50@5".to_string()),
                CellValue::Text("let op".to_string()),
            ]],
        );
        let schema = CutListSchema::new().resolve(&wb).unwrap();
        assert_eq!(schema.hole_columns(), &[4, 5]);
    }

    #[test]
    fn test_duplicate_column_first_wins() {
        let wb = workbook(&["profiel", "profiel_naam", "type", "lengte", "aantal"], vec![]);
        let schema = CutListSchema::new().resolve(&wb).unwrap();
        assert_eq!(schema.index(Column::ProfileName), Some(0));
    }
}
