// ==========================================
// CNC 切割清单 - 清单实体
// ==========================================
// 职责: 原始工作簿快照、标准化清单条目、导出记录、DQ 报告
// 生命周期: Workbook 每次运行读取一次（只读快照）；
//           CutListItem 在标准化阶段创建，导出后丢弃
// ==========================================

use crate::domain::types::{DqLevel, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 原始单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Blank => Ok(()),
        }
    }
}

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,     // 原始文件行号（1 起，含表头）
    pub cells: Vec<CellValue>, // 按表头列顺序
}

impl RawRow {
    /// 按列序号取值，越界视为空白
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&CellValue::Blank)
    }
}

// ==========================================
// Workbook - 工作簿快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub source: String,       // 源文件路径
    pub sheet: String,        // 工作表名（CSV 为文件名）
    pub headers: Vec<String>, // 原始表头（未标准化）
    pub rows: Vec<RawRow>,    // 数据行（不含表头，已去除全空行）
}

impl Workbook {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

// ==========================================
// Hole - 孔位 (x@d)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub x_mm: f64,        // 距型材起点的 X 位置
    pub diameter_mm: f64, // 孔径
}

impl fmt::Display for Hole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.x_mm, self.diameter_mm)
    }
}

// ==========================================
// CutListItem - 标准化清单条目
// ==========================================
// 不变量（由 DqValidator 保证）:
// - length_mm > 0
// - quantity >= 1
// - profile_code 非空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutListItem {
    pub row_number: usize,
    pub profile_name: String,        // 型材名称，如 "Profiel 3"
    pub profile_code: String,        // 截面型号，如 "20x40"
    pub orientation: Option<String>, // 朝向（原样保留）
    pub length_mm: f64,
    pub quantity: u32,
    pub material: String,
    pub side: Side,
    pub holes: Vec<Hole>,
}

// ==========================================
// ExportRecord - 导出记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub cut_index: usize, // 切割顺序（1 起，保持输入顺序）
    pub item: CutListItem,
}

impl ExportRecord {
    /// 按输入顺序编号
    pub fn from_items(items: Vec<CutListItem>) -> Vec<ExportRecord> {
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| ExportRecord {
                cut_index: idx + 1,
                item,
            })
            .collect()
    }
}

// ==========================================
// DqViolation - 数据质量发现（非阻断）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,            // 原始文件行号
    pub profile_name: Option<String>, // 型材名称（如果可解析）
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DqReport {
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn warning_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| matches!(v.level, DqLevel::Warning))
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| matches!(v.level, DqLevel::Info))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
