// ==========================================
// CNC 切割清单 - 导出层
// ==========================================
// 职责: 已校验条目 → 目标文件（tap / csv / json）
// 流程: 内存渲染 → 原子写入
// ==========================================

pub mod atomic_writer;
pub mod csv_exporter;
pub mod error;
pub mod gcode_exporter;
pub mod json_exporter;

pub use atomic_writer::write_atomic;
pub use csv_exporter::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use gcode_exporter::GcodeExporter;
pub use json_exporter::JsonExporter;

use crate::config::profile_map::ProfileMap;
use crate::config::settings::MachineSettings;
use crate::domain::cutlist::ExportRecord;
use crate::domain::profile::ProfileSpec;
use crate::domain::types::OutputFormat;

// ==========================================
// Exporter Trait
// ==========================================
// 实现者: GcodeExporter, CsvExporter, JsonExporter
pub trait Exporter: Send + Sync {
    fn format(&self) -> OutputFormat;

    /// 渲染完整文件内容（保持输入顺序）
    ///
    /// # 参数
    /// - records: 按输入顺序编号的条目
    /// - profiles: 按型材分组后的规格
    fn render(&self, records: &[ExportRecord], profiles: &[ProfileSpec]) -> ExportResult<Vec<u8>>;
}

/// 按格式选择导出器
pub fn exporter_for<'a>(
    format: OutputFormat,
    settings: &'a MachineSettings,
    profile_map: &'a ProfileMap,
) -> Box<dyn Exporter + 'a> {
    match format {
        OutputFormat::Tap => Box::new(GcodeExporter::new(settings, profile_map)),
        OutputFormat::Csv => Box::new(CsvExporter),
        OutputFormat::Json => Box::new(JsonExporter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exporter_for_each_format() {
        let settings = MachineSettings::default();
        let map = ProfileMap::builtin();
        for format in [OutputFormat::Tap, OutputFormat::Csv, OutputFormat::Json] {
            assert_eq!(exporter_for(format, &settings, &map).format(), format);
        }
    }
}
