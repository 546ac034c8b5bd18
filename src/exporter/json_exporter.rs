// ==========================================
// CNC 切割清单 - JSON 导出
// ==========================================
// 格式: {"profiles": [ProfileSpec, ...]}（缩进排版，换行结尾）
// ==========================================

use crate::domain::cutlist::ExportRecord;
use crate::domain::profile::ProfileSpec;
use crate::domain::types::OutputFormat;
use crate::exporter::error::ExportResult;
use crate::exporter::Exporter;
use serde::Serialize;

#[derive(Serialize)]
struct ProfilesDocument<'a> {
    profiles: &'a [ProfileSpec],
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, _records: &[ExportRecord], profiles: &[ProfileSpec]) -> ExportResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(&ProfilesDocument { profiles })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Side;
    use std::collections::BTreeMap;

    #[test]
    fn test_sections_keyed_by_side_text() {
        let mut sections = BTreeMap::new();
        sections.insert(Side::Top, vec![10.0]);
        sections.insert(Side::SideY(30), vec![250.0, 500.0]);
        let spec = ProfileSpec {
            name: "Profiel 1".to_string(),
            profile_code: "20x40".to_string(),
            length_mm: 1000.0,
            quantity: 1,
            material: "ALU".to_string(),
            tool_diam: 4.0,
            sections,
        };

        let bytes = JsonExporter.render(&[], &[spec.clone()]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["profiles"][0]["name"], "Profiel 1");
        assert_eq!(value["profiles"][0]["sections"]["BOVENKANT"][0], 10.0);
        assert_eq!(value["profiles"][0]["sections"]["ZIJKANT Y30"][1], 500.0);

        // 可反序列化回 ProfileSpec
        let back: ProfileSpec = serde_json::from_value(value["profiles"][0].clone()).unwrap();
        assert_eq!(back, spec);
    }
}
