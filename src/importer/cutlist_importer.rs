// ==========================================
// CNC 切割清单 - 导入器
// ==========================================
// 职责: 串联导入阶段，从文件到已校验条目
// 流程: 解析 → 列解析 → 映射 → 单条校验 → 批次校验 → DQ 报告
// ==========================================

use crate::domain::cutlist::{CutListItem, DqReport, Workbook};
use crate::importer::cutlist_importer_trait::{DqValidator, FileParser};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::schema::{CutListSchema, ResolvedSchema};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub workbook: Workbook,
    pub schema: ResolvedSchema,
    pub items: Vec<CutListItem>,
    pub dq_report: DqReport,
}

pub struct CutListImporter {
    file_parser: Box<dyn FileParser>,
    schema: CutListSchema,
    field_mapper: FieldMapper,
    dq_validator: Box<dyn DqValidator>,
}

impl CutListImporter {
    pub fn new(
        file_parser: Box<dyn FileParser>,
        field_mapper: FieldMapper,
        dq_validator: Box<dyn DqValidator>,
    ) -> Self {
        Self {
            file_parser,
            schema: CutListSchema::new(),
            field_mapper,
            dq_validator,
        }
    }

    /// 读取工作簿并解析列（不处理数据行）
    pub fn load(&self, path: &Path, sheet: Option<&str>) -> ImportResult<(Workbook, ResolvedSchema)> {
        let workbook = self.file_parser.parse_workbook(path, sheet)?;
        // 缺列时在处理任何数据行之前失败
        let schema = self.schema.resolve(&workbook)?;
        Ok((workbook, schema))
    }

    /// 完整导入
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 条目按输入顺序排列，均已通过校验
    /// - Err: 第一个阻断性错误（带行号/列名）
    #[instrument(skip(self, sheet), fields(path = %path.display()))]
    pub fn import(&self, path: &Path, sheet: Option<&str>) -> ImportResult<ImportOutcome> {
        let (workbook, schema) = self.load(path, sheet)?;
        info!(
            sheet = %workbook.sheet,
            rows = workbook.row_count(),
            columns = workbook.column_count(),
            "工作簿读取完成"
        );

        let mapped = self
            .field_mapper
            .map_workbook(&workbook, &schema)
            .map_err(log_rejection)?;
        debug!(items = mapped.len(), "字段映射完成");

        let items = mapped
            .into_iter()
            .map(|item| self.dq_validator.validate_item(item))
            .collect::<ImportResult<Vec<_>>>()
            .map_err(log_rejection)?;
        self.dq_validator
            .validate_batch(&items)
            .map_err(log_rejection)?;

        let dq_report = self.dq_validator.inspect(&items);
        for v in &dq_report.violations {
            warn!(
                row = v.row_number,
                level = ?v.level,
                field = %v.field,
                "{}",
                v.message
            );
        }

        info!(
            items = items.len(),
            warnings = dq_report.warning_count(),
            "导入校验完成"
        );

        Ok(ImportOutcome {
            workbook,
            schema,
            items,
            dq_report,
        })
    }
}

/// 记录阻断性错误的行号与类别后原样返回
fn log_rejection(err: ImportError) -> ImportError {
    warn!(row = ?err.row(), kind = ?err.kind(), "导入中止: {}", err);
    err
}
