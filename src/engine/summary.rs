// ==========================================
// CNC 切割清单 - 转换摘要
// ==========================================
// 职责: 行/列数、长度统计、按型号计数
// ==========================================

use crate::domain::cutlist::{CutListItem, Workbook};
use crate::domain::profile::ProfileSpec;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

// ==========================================
// ConversionSummary - 转换摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub rows: usize,
    pub cols: usize,
    pub lengte_mm: Option<LengthStats>, // 无条目时为 None
    pub by_profile_code: Vec<(String, usize)>, // 按行数降序，行数相同按型号
    pub profiles: usize,
    pub pieces: u64,
    pub holes: u64, // 含数量倍数
}

impl ConversionSummary {
    pub fn build(workbook: &Workbook, items: &[CutListItem], profiles: &[ProfileSpec]) -> Self {
        let lengte_mm = if items.is_empty() {
            None
        } else {
            let lengths: Vec<f64> = items.iter().map(|i| i.length_mm).collect();
            let sum: f64 = lengths.iter().sum();
            Some(LengthStats {
                count: lengths.len(),
                min: lengths.iter().copied().fold(f64::INFINITY, f64::min),
                max: lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                mean: sum / lengths.len() as f64,
            })
        };

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for item in items {
            *counts.entry(item.profile_code.as_str()).or_default() += 1;
        }
        let mut by_profile_code: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(code, n)| (code.to_string(), n))
            .collect();
        by_profile_code.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            rows: workbook.row_count(),
            cols: workbook.column_count(),
            lengte_mm,
            by_profile_code,
            profiles: profiles.len(),
            pieces: profiles.iter().map(|p| u64::from(p.quantity)).sum(),
            holes: profiles
                .iter()
                .map(|p| p.hole_count() as u64 * u64::from(p.quantity))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Side;

    fn item(code: &str, length_mm: f64) -> CutListItem {
        CutListItem {
            row_number: 2,
            profile_name: format!("P-{}", length_mm),
            profile_code: code.to_string(),
            orientation: None,
            length_mm,
            quantity: 1,
            material: "ALU".to_string(),
            side: Side::Top,
            holes: vec![],
        }
    }

    fn workbook(rows: usize) -> Workbook {
        Workbook {
            source: "lijst.csv".to_string(),
            sheet: "lijst".to_string(),
            headers: vec!["profiel_naam".to_string(), "lengte_mm".to_string()],
            rows: (0..rows)
                .map(|i| crate::domain::cutlist::RawRow {
                    row_number: i + 2,
                    cells: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_length_stats_and_code_counts() {
        let items = vec![
            item("20x40", 1000.0),
            item("20x20", 500.0),
            item("20x40", 600.0),
        ];
        let summary = ConversionSummary::build(&workbook(3), &items, &[]);

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.cols, 2);
        let stats = summary.lengte_mm.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 500.0);
        assert_eq!(stats.max, 1000.0);
        assert_eq!(stats.mean, 700.0);
        assert_eq!(
            summary.by_profile_code,
            vec![("20x40".to_string(), 2), ("20x20".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_input_has_no_length_stats() {
        let summary = ConversionSummary::build(&workbook(0), &[], &[]);
        assert!(summary.lengte_mm.is_none());
        assert!(summary.by_profile_code.is_empty());
        assert_eq!(summary.pieces, 0);
    }

    #[test]
    fn test_piece_totals_do_not_overflow_u32() {
        let profile = |name: &str| ProfileSpec {
            name: name.to_string(),
            profile_code: "20x40".to_string(),
            length_mm: 1000.0,
            quantity: 3_000_000_000,
            material: "ALU".to_string(),
            tool_diam: 4.0,
            sections: [(Side::Top, vec![10.0, 20.0])].into_iter().collect(),
        };
        let summary = ConversionSummary::build(&workbook(2), &[], &[profile("P1"), profile("P2")]);

        assert_eq!(summary.pieces, 6_000_000_000);
        assert_eq!(summary.holes, 12_000_000_000);
    }
}
