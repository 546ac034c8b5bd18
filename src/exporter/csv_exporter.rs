// ==========================================
// CNC 切割清单 - CSV 导出
// ==========================================
// 格式: 标准列名表头，每条 ExportRecord 一行，cut_index 在首列
// 可被导入器重新读取
// ==========================================

use crate::domain::cutlist::ExportRecord;
use crate::domain::profile::ProfileSpec;
use crate::domain::types::OutputFormat;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::Exporter;
use crate::importer::schema::Column;

pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn render(&self, records: &[ExportRecord], _profiles: &[ProfileSpec]) -> ExportResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(Column::ALL.iter().map(|c| c.canonical_name()))?;

        for record in records {
            let row: Vec<String> = Column::ALL
                .iter()
                .map(|column| field(record, *column))
                .collect();
            writer.write_record(&row)?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Serialize(e.to_string()))
    }
}

fn field(record: &ExportRecord, column: Column) -> String {
    let item = &record.item;
    match column {
        Column::CutIndex => record.cut_index.to_string(),
        Column::ProfileName => item.profile_name.clone(),
        Column::ProfileCode => item.profile_code.clone(),
        Column::Orientation => item.orientation.clone().unwrap_or_default(),
        Column::Length => item.length_mm.to_string(),
        Column::Quantity => item.quantity.to_string(),
        Column::Side => item.side.to_string(),
        Column::Holes => item
            .holes
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join("|"),
        Column::Material => item.material.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cutlist::{CutListItem, Hole};
    use crate::domain::types::Side;

    #[test]
    fn test_render_header_and_rows() {
        let item = CutListItem {
            row_number: 2,
            profile_name: "Profiel 1".to_string(),
            profile_code: "20x40".to_string(),
            orientation: Some("liggend".to_string()),
            length_mm: 1250.5,
            quantity: 2,
            material: "ALU".to_string(),
            side: Side::SlotB,
            holes: vec![
                Hole {
                    x_mm: 10.0,
                    diameter_mm: 4.0,
                },
                Hole {
                    x_mm: 620.25,
                    diameter_mm: 4.0,
                },
            ],
        };
        let records = ExportRecord::from_items(vec![item]);

        let bytes = CsvExporter.render(&records, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "cut_index,profiel_naam,profiel_type,orientatie,lengte_mm,aantal,zijde,gaten_x@d_mm,materiaal"
        );
        assert_eq!(
            lines[1],
            "1,Profiel 1,20x40,liggend,1250.5,2,ZIJKANT T-slot B,10@4|620.25@4,ALU"
        );
    }
}
