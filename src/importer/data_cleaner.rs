// ==========================================
// CNC 切割清单 - 数据清洗器实现
// ==========================================
// 职责: 表头标准化 / TRIM / NULL 标准化 / 数值与计数转换
// 红线: 只做格式层面的转换，不修正业务数据
// ==========================================

use crate::domain::cutlist::CellValue;

/// 视为空白的文本（来自其他工具导出的空值）
const NULL_TOKENS: &[&str] = &["nan", "none", "null", "n/a"];

pub struct DataCleaner;

impl DataCleaner {
    /// 表头标准化: 去空白、小写、空格/横线 → 下划线、去重音
    pub fn normalize_header(&self, header: &str) -> String {
        header
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                'ë' | 'è' | 'é' | 'ê' => 'e',
                'ï' | 'í' => 'i',
                'ö' | 'ó' => 'o',
                'ü' | 'ú' => 'u',
                other => other,
            })
            .collect()
    }

    /// 单元格转文本，空白与 NULL 标记返回 None
    pub fn text(&self, cell: &CellValue) -> Option<String> {
        match cell {
            CellValue::Blank => None,
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    /// 单元格是否为空（含 NULL 标记 nan/None/NULL）
    pub fn is_blank(&self, cell: &CellValue) -> bool {
        self.text(cell).is_none()
    }

    /// 解析小数
    ///
    /// # 返回
    /// - Ok(None): 空白
    /// - Ok(Some(f64)): 数值
    /// - Err(String): 无法解析的原因
    pub fn parse_decimal(&self, cell: &CellValue) -> Result<Option<f64>, String> {
        match cell {
            CellValue::Number(n) => {
                if n.is_finite() {
                    Ok(Some(*n))
                } else {
                    Err("数值无效".to_string())
                }
            }
            _ => match self.text(cell) {
                None => Ok(None),
                Some(text) => parse_decimal_text(&text)
                    .map(Some)
                    .ok_or_else(|| "无法解析为数值".to_string()),
            },
        }
    }

    /// 解析数量（非负整数；2 与 2.0 均可）
    pub fn parse_count(&self, cell: &CellValue) -> Result<Option<u32>, String> {
        let value = match self.parse_decimal(cell)? {
            None => return Ok(None),
            Some(v) => v,
        };
        if value.fract() != 0.0 {
            return Err("数量必须为整数".to_string());
        }
        if value < 0.0 || value > u32::MAX as f64 {
            return Err("数量超出范围".to_string());
        }
        Ok(Some(value as u32))
    }
}

/// 文本转小数，允许单个小数逗号（"12,5"）
pub(crate) fn parse_decimal_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

// 整数不带 ".0"（型号 2040 可能以数字形式存储）
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_normalize_header() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_header("  Profiel Naam "), "profiel_naam");
        assert_eq!(cleaner.normalize_header("Oriëntatie"), "orientatie");
        assert_eq!(cleaner.normalize_header("Grote-Kast"), "grote_kast");
        assert_eq!(cleaner.normalize_header("gaten_x@d_mm"), "gaten_x@d_mm");
    }

    #[test]
    fn test_text_null_tokens() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.text(&text("  nan ")), None);
        assert_eq!(cleaner.text(&text("None")), None);
        assert_eq!(cleaner.text(&CellValue::Blank), None);
        assert_eq!(cleaner.text(&text(" 20x40 ")), Some("20x40".to_string()));
        assert_eq!(cleaner.text(&CellValue::Number(2040.0)), Some("2040".to_string()));
        assert_eq!(cleaner.text(&CellValue::Number(12.5)), Some("12.5".to_string()));
    }

    #[test]
    fn test_parse_decimal() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal(&CellValue::Number(1000.0)), Ok(Some(1000.0)));
        assert_eq!(cleaner.parse_decimal(&text("12,5")), Ok(Some(12.5)));
        assert_eq!(cleaner.parse_decimal(&text(" 980.25 ")), Ok(Some(980.25)));
        assert_eq!(cleaner.parse_decimal(&text("")), Ok(None));
        assert!(cleaner.parse_decimal(&text("abc")).is_err());
        assert!(cleaner.parse_decimal(&text("1,000,5")).is_err());
    }

    #[test]
    fn test_parse_count() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_count(&CellValue::Number(2.0)), Ok(Some(2)));
        assert_eq!(cleaner.parse_count(&text("3")), Ok(Some(3)));
        assert_eq!(cleaner.parse_count(&CellValue::Blank), Ok(None));
        assert!(cleaner.parse_count(&text("2.5")).is_err());
        assert!(cleaner.parse_count(&CellValue::Number(-1.0)).is_err());
    }
}
