// ==========================================
// CNC 切割清单 - 转换编排器
// ==========================================
// 流程: Loader → Normalizer → Validator → 分组 → Exporter（渲染 → 原子写入）
// 红线: 任何错误或超时都发生在写入之前，失败时不留下输出文件
// ==========================================

use crate::config::ConvertConfig;
use crate::domain::cutlist::{DqReport, ExportRecord, RawRow};
use crate::domain::types::OutputFormat;
use crate::engine::error::{ConvertError, ConvertResult};
use crate::engine::profile_grouper::ProfileGrouper;
use crate::engine::summary::ConversionSummary;
use crate::exporter::{exporter_for, write_atomic};
use crate::importer::{
    Column, CutListImporter, DqValidatorImpl, FieldMapperImpl, ImportOutcome,
    UniversalFileParser,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, info_span};
use uuid::Uuid;

// ==========================================
// ConversionReport - 转换结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub records: usize,
    pub bytes: usize,
    pub written: bool, // dry-run 时为 false
    pub summary: ConversionSummary,
    pub dq_report: DqReport,
}

// ==========================================
// InspectReport - 预览结果
// ==========================================
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub sheet: String,
    pub headers: Vec<String>,
    /// (表头, 识别出的标准列名)，未识别为 None
    pub columns: Vec<(String, Option<&'static str>)>,
    pub preview: Vec<RawRow>,
    pub summary: ConversionSummary,
    pub dq_report: DqReport,
}

pub struct ConversionPipeline<'a> {
    config: &'a ConvertConfig,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }

    fn importer(&self) -> CutListImporter {
        CutListImporter::new(
            Box::new(UniversalFileParser),
            FieldMapperImpl::new(
                self.config.profile_map.clone(),
                self.config.default_material.clone(),
            ),
            Box::new(DqValidatorImpl::new(
                self.config.profile_map.clone(),
                self.config.settings.tool_diam,
            )),
        )
    }

    fn import(&self) -> ConvertResult<ImportOutcome> {
        let outcome = self
            .importer()
            .import(&self.config.input, self.config.sheet.as_deref())?;
        Ok(outcome)
    }

    fn check_deadline(&self, started: Instant, stage: &'static str) -> ConvertResult<()> {
        if let Some(deadline) = self.config.deadline {
            let elapsed = started.elapsed();
            if elapsed > deadline {
                return Err(ConvertError::DeadlineExceeded {
                    stage,
                    elapsed_ms: elapsed.as_millis(),
                });
            }
        }
        Ok(())
    }

    /// 执行一次完整转换
    ///
    /// # 返回
    /// - Ok(ConversionReport): 已写入（或 dry-run 仅渲染）
    /// - Err(ConvertError): 第一个错误；此时目标文件未被修改
    pub fn run(&self) -> ConvertResult<ConversionReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("convert", run_id = %run_id, input = %self.config.input.display());
        let _guard = span.enter();
        let started = Instant::now();

        self.config.validate()?;
        let format = self.config.resolve_format()?;
        let output = self.config.resolve_output_path(format)?;
        info!(format = %format, output = %output.display(), dry_run = self.config.dry_run, "开始转换");

        // === 阶段 0-2: 读取 / 映射 / 校验 ===
        let outcome = self.import()?;
        self.check_deadline(started, "import")?;

        // === 分组 + 摘要 ===
        let profiles = ProfileGrouper::new(&self.config.profile_map, self.config.settings.tool_diam)
            .group(&outcome.items);
        let summary = ConversionSummary::build(&outcome.workbook, &outcome.items, &profiles);
        let records = ExportRecord::from_items(outcome.items);

        // === 阶段 3: 渲染 ===
        let exporter = exporter_for(format, &self.config.settings, &self.config.profile_map);
        let bytes = exporter.render(&records, &profiles)?;
        debug!(bytes = bytes.len(), profiles = profiles.len(), "渲染完成");
        self.check_deadline(started, "render")?;

        // === 提交 ===
        let written = if self.config.dry_run {
            info!("dry-run: 跳过写入");
            false
        } else {
            self.check_deadline(started, "commit")?;
            write_atomic(&output, &bytes)?;
            true
        };

        info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            written,
            "转换完成"
        );

        Ok(ConversionReport {
            input: self.config.input.clone(),
            output,
            format,
            records: records.len(),
            bytes: bytes.len(),
            written,
            summary,
            dq_report: outcome.dq_report,
        })
    }

    /// 预览: 列识别结果 + 前 limit 行 + 摘要（不写文件）
    pub fn inspect(&self, limit: usize) -> ConvertResult<InspectReport> {
        let outcome = self.import()?;

        let recognized = outcome.schema.recognized();
        let columns = outcome
            .workbook
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let canonical = recognized
                    .iter()
                    .find(|(i, _)| *i == idx)
                    .map(|(_, col)| col.canonical_name())
                    .or_else(|| {
                        // 额外孔位列
                        outcome
                            .schema
                            .hole_columns()
                            .contains(&idx)
                            .then_some(Column::Holes.canonical_name())
                    });
                (header.clone(), canonical)
            })
            .collect();

        let profiles = ProfileGrouper::new(&self.config.profile_map, self.config.settings.tool_diam)
            .group(&outcome.items);
        let summary = ConversionSummary::build(&outcome.workbook, &outcome.items, &profiles);

        Ok(InspectReport {
            sheet: outcome.workbook.sheet.clone(),
            headers: outcome.workbook.headers.clone(),
            columns,
            preview: outcome.workbook.rows.iter().take(limit).cloned().collect(),
            summary,
            dq_report: outcome.dq_report,
        })
    }
}
