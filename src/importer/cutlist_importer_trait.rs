// ==========================================
// CNC 切割清单 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 读取 → 标准化 → 校验
// ==========================================

use crate::domain::cutlist::{CutListItem, DqReport, RawRow, Workbook};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::CarryOver;
use crate::importer::schema::ResolvedSchema;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0: Loader）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为工作簿快照
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 工作表名（None = 第一个工作表）
    ///
    /// # 返回
    /// - Ok(Workbook): 表头 + 数据行（已去除全空行）
    /// - Err: FileNotFound / UnsupportedFormat / MalformedWorkbook 等
    fn parse_workbook(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Workbook>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1: Normalizer）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为清单条目
    ///
    /// # 参数
    /// - row: 原始数据行
    /// - schema: 已解析的列位置
    /// - carry: 续行状态（空白字段沿用上一行的值）
    ///
    /// # 返回
    /// - Ok(CutListItem): 标准化条目（尚未做领域校验）
    /// - Err(FieldParseError): 指明出错的列
    fn map_row(
        &self,
        row: &RawRow,
        schema: &ResolvedSchema,
        carry: &mut CarryOver,
    ) -> ImportResult<CutListItem>;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 领域约束校验接口（阶段 2: Validator）
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 校验单个条目，成功时原样返回
    ///
    /// # 红线
    /// - 不得修正数据
    fn validate_item(&self, item: CutListItem) -> ImportResult<CutListItem>;

    /// 校验同名型材之间的一致性（型号/长度/数量）
    fn validate_batch(&self, items: &[CutListItem]) -> ImportResult<()>;

    /// 生成非阻断 DQ 报告（警告/提示）
    fn inspect(&self, items: &[CutListItem]) -> DqReport;
}
