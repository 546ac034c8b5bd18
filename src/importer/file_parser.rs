// ==========================================
// CNC 切割清单 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析（Loader）
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::domain::cutlist::{CellValue, RawRow, Workbook};
use crate::importer::cutlist_importer_trait::FileParser;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, instrument};

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    #[instrument(skip(self, sheet), fields(path = %file_path.display()))]
    fn parse_workbook(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Workbook> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        if let Some(name) = sheet {
            debug!(sheet = name, "CSV 文件忽略工作表参数");
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        CellValue::Blank
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect();
            grid.push(cells);
        }

        let sheet_name = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();
        build_workbook(file_path, sheet_name, grid, 0)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    #[instrument(skip(self), fields(path = %file_path.display()))]
    fn parse_workbook(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Workbook> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件（按扩展名自动选择格式）
        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) => sheet_names
                .iter()
                .find(|s| s.as_str() == name)
                .cloned()
                .ok_or_else(|| {
                    ImportError::MalformedWorkbook(format!(
                        "工作表不存在: {}（可用: {}）",
                        name,
                        sheet_names.join(", ")
                    ))
                })?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::MalformedWorkbook("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let row_offset = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        build_workbook(file_path, sheet_name, grid, row_offset)
    }
}

/// calamine 单元格 → CellValue
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Blank,
        Data::String(s) if s.trim().is_empty() => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        other => CellValue::Text(other.to_string()),
    }
}

fn blank_row(cells: &[CellValue]) -> bool {
    cells.iter().all(|c| DataCleaner.is_blank(c))
}

/// 由单元格网格构建工作簿快照
///
/// # 规则
/// - 第一个非空行为表头，之前的空行跳过
/// - 完全空白的数据行丢弃（NULL 标记视为空白）
/// - 表头为空且整列为空的列丢弃
/// - row_number 为文件中的 1 起行号
fn build_workbook(
    file_path: &Path,
    sheet: String,
    grid: Vec<Vec<CellValue>>,
    row_offset: usize,
) -> ImportResult<Workbook> {
    let mut rows = grid
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| (row_offset + idx + 1, cells))
        .skip_while(|(_, cells)| blank_row(cells));

    let (header_row_number, header_cells) = rows.next().ok_or_else(|| {
        ImportError::MalformedWorkbook(format!("工作表 '{}' 无表头行", sheet))
    })?;

    let data: Vec<(usize, Vec<CellValue>)> = rows
        .filter(|(_, cells)| !blank_row(cells))
        .collect();

    let width = data
        .iter()
        .map(|(_, cells)| cells.len())
        .chain(std::iter::once(header_cells.len()))
        .max()
        .unwrap_or(0);

    let mut headers: Vec<String> = header_cells
        .iter()
        .map(|c| c.to_string().trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    headers.resize(width, String::new());

    // 保留有表头或有数据的列
    let keep: Vec<usize> = (0..width)
        .filter(|&idx| {
            !headers[idx].is_empty()
                || data
                    .iter()
                    .any(|(_, cells)| cells.get(idx).map(|c| !DataCleaner.is_blank(c)).unwrap_or(false))
        })
        .collect();

    let headers: Vec<String> = keep.iter().map(|&idx| headers[idx].clone()).collect();
    let rows: Vec<RawRow> = data
        .into_iter()
        .map(|(row_number, cells)| RawRow {
            row_number,
            cells: keep
                .iter()
                .map(|&idx| cells.get(idx).cloned().unwrap_or(CellValue::Blank))
                .collect(),
        })
        .collect();

    debug!(
        header_row = header_row_number,
        columns = headers.len(),
        rows = rows.len(),
        "工作表解析完成"
    );

    Ok(Workbook {
        source: file_path.display().to_string(),
        sheet,
        headers,
        rows,
    })
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_workbook(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Workbook> {
        let ext = extension_of(file_path);
        match ext.as_str() {
            "csv" => CsvParser.parse_workbook(file_path, sheet),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_workbook(file_path, sheet),
            _ => {
                ensure_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(ext))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&[
            "profiel_naam,profiel_type,lengte_mm,aantal",
            "Profiel 1,20x40,1000,2",
            "Profiel 2,20x20,500,1",
        ]);

        let wb = CsvParser.parse_workbook(file.path(), None).unwrap();

        assert_eq!(wb.headers, vec!["profiel_naam", "profiel_type", "lengte_mm", "aantal"]);
        assert_eq!(wb.row_count(), 2);
        assert_eq!(wb.rows[0].row_number, 2);
        assert_eq!(wb.rows[0].cell(0), &CellValue::Text("Profiel 1".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_workbook(Path::new("non_existent.csv"), None);
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_and_leading_blank_lines() {
        let file = csv_file(&[
            ",,",
            "profiel_naam,lengte_mm,aantal",
            "P1,1000,1",
            ",,",
            "P2,500,1",
        ]);

        let wb = CsvParser.parse_workbook(file.path(), None).unwrap();

        assert_eq!(wb.headers[0], "profiel_naam");
        assert_eq!(wb.row_count(), 2);
        assert_eq!(wb.rows[1].row_number, 5);
    }

    #[test]
    fn test_csv_parser_drops_rows_of_null_tokens() {
        let file = csv_file(&[
            "profiel_naam,profiel_type,lengte_mm,aantal",
            "P1,20x40,1000,1",
            "nan,nan,nan,nan",
            "None,NULL, ,",
            "P2,20x20,500,1",
        ]);

        let wb = CsvParser.parse_workbook(file.path(), None).unwrap();

        assert_eq!(wb.row_count(), 2);
        assert_eq!(wb.rows[1].row_number, 5);
    }

    #[test]
    fn test_csv_parser_drops_empty_unnamed_columns() {
        let file = csv_file(&["profiel_naam,,lengte_mm,", "P1,,1000,", "P2,,500,10@5"]);

        let wb = CsvParser.parse_workbook(file.path(), None).unwrap();

        // 第 2 列为空被丢弃；第 4 列无表头但有数据，保留
        assert_eq!(wb.headers, vec!["profiel_naam", "lengte_mm", ""]);
        assert_eq!(wb.rows[1].cell(2), &CellValue::Text("10@5".to_string()));
    }

    #[test]
    fn test_csv_parser_header_only_has_no_rows() {
        let file = csv_file(&["profiel_naam,lengte_mm"]);
        let wb = CsvParser.parse_workbook(file.path(), None).unwrap();
        assert_eq!(wb.row_count(), 0);
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let file = csv_file(&[]);
        let result = CsvParser.parse_workbook(file.path(), None);
        assert!(matches!(result, Err(ImportError::MalformedWorkbook(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "x").unwrap();
        let result = UniversalFileParser.parse_workbook(file.path(), None);
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
