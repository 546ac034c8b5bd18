// ==========================================
// CNC 切割清单 - 数据质量校验器实现
// ==========================================
// 阶段 2: 领域约束校验（Validator）
// 职责: 阻断性约束 → DomainConstraintError；非阻断发现 → DqReport
// 红线: 校验通过时原样返回，绝不修正数据
// ==========================================

use crate::config::profile_map::ProfileMap;
use crate::domain::cutlist::{CutListItem, DqReport, DqViolation};
use crate::domain::types::{DqLevel, Side};
use crate::importer::cutlist_importer_trait::DqValidator as DqValidatorTrait;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::Column;
use std::collections::{HashMap, HashSet};

/// 孔径与钻头直径的比较容差（mm）
const DIAMETER_TOLERANCE: f64 = 1e-6;

/// 单个型材的最大件数（每件生成一段完整程序）
pub const MAX_QUANTITY: u32 = 10_000;

/// 名称/型号写入 G-code 注释 "( ... )"，括号与控制字符会提前结束注释
fn breaks_gcode_comment(text: &str) -> bool {
    text.chars().any(|c| c == '(' || c == ')' || c.is_control())
}

pub struct DqValidator {
    profile_map: ProfileMap,
    tool_diam: f64, // 默认钻头直径（映射表未指定时）
}

impl DqValidator {
    pub fn new(profile_map: ProfileMap, tool_diam: f64) -> Self {
        Self {
            profile_map,
            tool_diam,
        }
    }

    fn tool_diam_for(&self, code: &str) -> f64 {
        self.profile_map.tool_diam_for(code).unwrap_or(self.tool_diam)
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_item(&self, item: CutListItem) -> ImportResult<CutListItem> {
        let row = item.row_number;

        if item.profile_name.trim().is_empty() {
            return Err(violation(row, Column::ProfileName, "型材名称为空".to_string()));
        }
        if item.profile_code.trim().is_empty() {
            return Err(violation(row, Column::ProfileCode, "型号为空".to_string()));
        }
        if breaks_gcode_comment(&item.profile_name) {
            return Err(violation(
                row,
                Column::ProfileName,
                format!("型材名称含括号或控制字符: {:?}", item.profile_name),
            ));
        }
        if breaks_gcode_comment(&item.profile_code) {
            return Err(violation(
                row,
                Column::ProfileCode,
                format!("型号含括号或控制字符: {:?}", item.profile_code),
            ));
        }
        if !item.length_mm.is_finite() || item.length_mm <= 0.0 {
            return Err(violation(
                row,
                Column::Length,
                format!("长度必须大于 0: {}", item.length_mm),
            ));
        }
        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            return Err(violation(
                row,
                Column::Quantity,
                format!("数量必须在 1..={} 之间: {}", MAX_QUANTITY, item.quantity),
            ));
        }
        if self.profile_map.is_strict() && !self.profile_map.knows(&item.profile_code) {
            return Err(violation(
                row,
                Column::ProfileCode,
                format!("未知型号: {}（不在型材映射表中）", item.profile_code),
            ));
        }

        for hole in &item.holes {
            if !hole.x_mm.is_finite() || hole.x_mm < 0.0 || hole.x_mm > item.length_mm {
                return Err(violation(
                    row,
                    Column::Holes,
                    format!(
                        "孔位 X={} 超出型材长度 [0, {}]",
                        hole.x_mm, item.length_mm
                    ),
                ));
            }
            if !hole.diameter_mm.is_finite() || hole.diameter_mm <= 0.0 {
                return Err(violation(
                    row,
                    Column::Holes,
                    format!("孔径必须大于 0: {}", hole.diameter_mm),
                ));
            }
        }

        Ok(item)
    }

    fn validate_batch(&self, items: &[CutListItem]) -> ImportResult<()> {
        let mut first_by_name: HashMap<&str, &CutListItem> = HashMap::new();

        for item in items {
            let first = match first_by_name.get(item.profile_name.as_str()) {
                Some(first) => *first,
                None => {
                    first_by_name.insert(item.profile_name.as_str(), item);
                    continue;
                }
            };

            if first.profile_code != item.profile_code {
                return Err(violation(
                    item.row_number,
                    Column::ProfileCode,
                    format!(
                        "型材 '{}' 型号不一致: 行 {} 为 {}，本行为 {}",
                        item.profile_name, first.row_number, first.profile_code, item.profile_code
                    ),
                ));
            }
            if first.length_mm != item.length_mm {
                return Err(violation(
                    item.row_number,
                    Column::Length,
                    format!(
                        "型材 '{}' 长度不一致: 行 {} 为 {}，本行为 {}",
                        item.profile_name, first.row_number, first.length_mm, item.length_mm
                    ),
                ));
            }
            if first.quantity != item.quantity {
                return Err(violation(
                    item.row_number,
                    Column::Quantity,
                    format!(
                        "型材 '{}' 数量不一致: 行 {} 为 {}，本行为 {}",
                        item.profile_name, first.row_number, first.quantity, item.quantity
                    ),
                ));
            }
        }

        Ok(())
    }

    fn inspect(&self, items: &[CutListItem]) -> DqReport {
        let mut violations = Vec::new();
        let mut seen_sides: HashSet<(&str, Side)> = HashSet::new();
        let mut xs_by_side: HashMap<(&str, Side), Vec<f64>> = HashMap::new();

        for item in items {
            let tool = self.tool_diam_for(&item.profile_code);

            // 孔径与钻头不符（程序按钻头直径钻孔）
            for hole in &item.holes {
                if (hole.diameter_mm - tool).abs() > DIAMETER_TOLERANCE {
                    violations.push(DqViolation {
                        row_number: item.row_number,
                        profile_name: Some(item.profile_name.clone()),
                        level: DqLevel::Warning,
                        field: Column::Holes.canonical_name().to_string(),
                        message: format!(
                            "孔径 {} 与钻头直径 {} 不符（X={}）",
                            hole.diameter_mm, tool, hole.x_mm
                        ),
                    });
                }
            }

            // 同一加工面出现多行
            let key = (item.profile_name.as_str(), item.side);
            if !seen_sides.insert(key) {
                violations.push(DqViolation {
                    row_number: item.row_number,
                    profile_name: Some(item.profile_name.clone()),
                    level: DqLevel::Info,
                    field: Column::Side.canonical_name().to_string(),
                    message: format!("加工面 {} 出现多行，孔位将合并", item.side),
                });
            }

            // 孔距小于钻头直径
            let xs = xs_by_side.entry(key).or_default();
            for hole in &item.holes {
                if let Some(near) = xs.iter().find(|x| (*x - hole.x_mm).abs() < tool) {
                    violations.push(DqViolation {
                        row_number: item.row_number,
                        profile_name: Some(item.profile_name.clone()),
                        level: DqLevel::Warning,
                        field: Column::Holes.canonical_name().to_string(),
                        message: format!(
                            "孔位 X={} 与 X={} 间距小于钻头直径 {}",
                            hole.x_mm, near, tool
                        ),
                    });
                }
                xs.push(hole.x_mm);
            }
        }

        DqReport { violations }
    }
}

fn violation(row: usize, column: Column, message: String) -> ImportError {
    ImportError::DomainConstraintError {
        row,
        field: column.canonical_name().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cutlist::Hole;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_item(name: &str, row_number: usize) -> CutListItem {
        CutListItem {
            row_number,
            profile_name: name.to_string(),
            profile_code: "20x40".to_string(),
            orientation: None,
            length_mm: 1000.0,
            quantity: 1,
            material: "ALU".to_string(),
            side: Side::Top,
            holes: vec![Hole {
                x_mm: 10.0,
                diameter_mm: 4.0,
            }],
        }
    }

    fn validator() -> DqValidator {
        DqValidator::new(ProfileMap::builtin(), 4.0)
    }

    #[test]
    fn test_valid_item_returned_unchanged() {
        let item = create_test_item("P1", 2);
        let validated = validator().validate_item(item.clone()).unwrap();
        assert_eq!(validated, item);
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut item = create_test_item("P1", 3);
        item.length_mm = 0.0;
        item.holes.clear();

        match validator().validate_item(item).unwrap_err() {
            ImportError::DomainConstraintError { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "lengte_mm");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut item = create_test_item("P1", 2);
        item.quantity = 0;
        assert!(matches!(
            validator().validate_item(item),
            Err(ImportError::DomainConstraintError { ref field, .. }) if field == "aantal"
        ));
    }

    #[test]
    fn test_quantity_above_limit_rejected() {
        let mut item = create_test_item("P1", 4);
        item.quantity = MAX_QUANTITY;
        assert!(validator().validate_item(item.clone()).is_ok());

        item.quantity = 3_000_000_000;
        match validator().validate_item(item).unwrap_err() {
            ImportError::DomainConstraintError { row, field, .. } => {
                assert_eq!(row, 4);
                assert_eq!(field, "aantal");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_name_that_would_close_gcode_comment_rejected() {
        let item = create_test_item("P1)\nG1 Z-50 F9999\n(x", 2);
        assert!(matches!(
            validator().validate_item(item),
            Err(ImportError::DomainConstraintError { ref field, .. }) if field == "profiel_naam"
        ));

        let mut item = create_test_item("P1", 2);
        item.profile_code = "20x40\tG0".to_string();
        assert!(matches!(
            validator().validate_item(item),
            Err(ImportError::DomainConstraintError { ref field, .. }) if field == "profiel_type"
        ));
    }

    #[test]
    fn test_empty_profile_code_rejected() {
        let mut item = create_test_item("P1", 2);
        item.profile_code = String::new();
        assert!(matches!(
            validator().validate_item(item),
            Err(ImportError::DomainConstraintError { ref field, .. }) if field == "profiel_type"
        ));
    }

    #[test]
    fn test_hole_outside_profile_rejected() {
        let mut item = create_test_item("P1", 2);
        item.holes.push(Hole {
            x_mm: 1200.0,
            diameter_mm: 4.0,
        });
        assert!(matches!(
            validator().validate_item(item),
            Err(ImportError::DomainConstraintError { ref field, .. }) if field == "gaten_x@d_mm"
        ));
    }

    #[test]
    fn test_unknown_code_rejected_only_with_strict_map() {
        let mut item = create_test_item("P1", 2);
        item.profile_code = "99x99".to_string();
        assert!(validator().validate_item(item.clone()).is_ok());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"profiles": {{"20x40": {{"top_y": 10.0, "side_y": 10.0}}}}}}"#).unwrap();
        let strict = DqValidator::new(ProfileMap::load(file.path()).unwrap(), 4.0);
        assert!(strict.validate_item(item).is_err());
    }

    #[test]
    fn test_batch_conflicting_length_rejected() {
        let first = create_test_item("P1", 2);
        let mut second = create_test_item("P1", 3);
        second.side = Side::SlotA;
        second.length_mm = 900.0;

        match validator().validate_batch(&[first, second]).unwrap_err() {
            ImportError::DomainConstraintError { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "lengte_mm");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_batch_consistent_rows_pass() {
        let first = create_test_item("P1", 2);
        let mut second = create_test_item("P1", 3);
        second.side = Side::SlotB;
        let other = create_test_item("P2", 4);
        assert!(validator().validate_batch(&[first, second, other]).is_ok());
    }

    #[test]
    fn test_inspect_diameter_mismatch_warning() {
        let mut item = create_test_item("P1", 2);
        item.holes = vec![Hole {
            x_mm: 10.0,
            diameter_mm: 5.0,
        }];
        let report = validator().inspect(&[item]);
        assert_eq!(report.warning_count(), 1);
        assert!(report.violations[0].message.contains("钻头直径"));
    }

    #[test]
    fn test_inspect_close_holes_and_duplicate_side() {
        let first = create_test_item("P1", 2);
        let mut second = create_test_item("P1", 3);
        second.holes = vec![Hole {
            x_mm: 12.0,
            diameter_mm: 4.0,
        }];
        let report = validator().inspect(&[first, second]);
        assert_eq!(report.info_count(), 1);
        assert_eq!(report.warning_count(), 1);
    }
}
