// ==========================================
// CNC 切割清单 - G-code 导出
// ==========================================

use crate::config::profile_map::ProfileMap;
use crate::config::settings::MachineSettings;
use crate::domain::cutlist::ExportRecord;
use crate::domain::profile::ProfileSpec;
use crate::domain::types::OutputFormat;
use crate::engine::gcode::ProgramBuilder;
use crate::exporter::error::ExportResult;
use crate::exporter::Exporter;

pub struct GcodeExporter<'a> {
    settings: &'a MachineSettings,
    profile_map: &'a ProfileMap,
}

impl<'a> GcodeExporter<'a> {
    pub fn new(settings: &'a MachineSettings, profile_map: &'a ProfileMap) -> Self {
        Self {
            settings,
            profile_map,
        }
    }
}

impl Exporter for GcodeExporter<'_> {
    fn format(&self) -> OutputFormat {
        OutputFormat::Tap
    }

    fn render(&self, _records: &[ExportRecord], profiles: &[ProfileSpec]) -> ExportResult<Vec<u8>> {
        let program = ProgramBuilder::new(self.settings, self.profile_map).build(profiles);
        Ok(program.into_bytes())
    }
}
