// ==========================================
// CNC 切割清单 - 字段映射器实现
// ==========================================
// 阶段 1: 原始行 → CutListItem（Normalizer）
// 职责: 标准列取值 + 类型转换 + 续行沿用
// ==========================================

use crate::config::profile_map::ProfileMap;
use crate::domain::cutlist::{CutListItem, Hole, RawRow, Workbook};
use crate::domain::types::Side;
use crate::importer::cutlist_importer_trait::FieldMapper as FieldMapperTrait;
use crate::importer::data_cleaner::{parse_decimal_text, DataCleaner};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::{Column, ResolvedSchema};
use tracing::trace;

// ==========================================
// CarryOver - 续行状态
// ==========================================
// 同一型材的后续行（每个加工面一行）常留空型材字段，
// 空白时沿用上一行的值
#[derive(Debug, Clone, Default)]
pub struct CarryOver {
    profile_name: Option<String>,
    profile_code: Option<String>,
    orientation: Option<String>,
    length_mm: Option<f64>,
    quantity: Option<u32>,
    material: Option<String>,
}

pub struct FieldMapper {
    cleaner: DataCleaner,
    profile_map: ProfileMap,
    default_material: String,
}

impl FieldMapperTrait for FieldMapper {
    fn map_row(
        &self,
        row: &RawRow,
        schema: &ResolvedSchema,
        carry: &mut CarryOver,
    ) -> ImportResult<CutListItem> {
        let own_name = self.get_text(row, schema, Column::ProfileName);
        if own_name.is_some() {
            // 新型材: 可选字段不沿用上一型材的值
            carry.orientation = None;
            carry.material = None;
        }
        let profile_name = carried(own_name, &mut carry.profile_name);
        let profile_code = carried(
            self.get_text(row, schema, Column::ProfileCode),
            &mut carry.profile_code,
        );
        let orientation = carried(
            self.get_text(row, schema, Column::Orientation),
            &mut carry.orientation,
        );
        let length_mm = carried(
            self.parse_decimal(row, schema, Column::Length)?,
            &mut carry.length_mm,
        )
        .ok_or_else(|| self.missing_value(row, schema, Column::Length))?;
        let quantity = carried(
            self.parse_count(row, schema, Column::Quantity)?,
            &mut carry.quantity,
        )
        .ok_or_else(|| self.missing_value(row, schema, Column::Quantity))?;

        let profile_code = profile_code.unwrap_or_default();
        let material = carried(
            self.get_text(row, schema, Column::Material),
            &mut carry.material,
        )
        .or_else(|| self.profile_map.material_for(&profile_code).map(String::from))
        .unwrap_or_else(|| self.default_material.clone());

        let item = CutListItem {
            row_number: row.row_number,
            profile_name: profile_name.unwrap_or_default(),
            profile_code,
            orientation,
            length_mm,
            quantity,
            material,
            side: self.parse_side(row, schema)?,
            holes: self.parse_holes(row, schema)?,
        };
        trace!(row = row.row_number, profile = %item.profile_name, "行映射完成");
        Ok(item)
    }
}

impl FieldMapper {
    pub fn new(profile_map: ProfileMap, default_material: impl Into<String>) -> Self {
        Self {
            cleaner: DataCleaner,
            profile_map,
            default_material: default_material.into(),
        }
    }

    /// 映射整张工作簿（保持行顺序，遇到第一个错误即停止）
    pub fn map_workbook(
        &self,
        workbook: &Workbook,
        schema: &ResolvedSchema,
    ) -> ImportResult<Vec<CutListItem>> {
        let mut carry = CarryOver::default();
        workbook
            .rows
            .iter()
            .map(|row| self.map_row(row, schema, &mut carry))
            .collect()
    }

    /// 提取文本字段（列不存在或空白返回 None）
    fn get_text(&self, row: &RawRow, schema: &ResolvedSchema, column: Column) -> Option<String> {
        schema
            .index(column)
            .and_then(|idx| self.cleaner.text(row.cell(idx)))
    }

    /// 解析小数字段
    fn parse_decimal(
        &self,
        row: &RawRow,
        schema: &ResolvedSchema,
        column: Column,
    ) -> ImportResult<Option<f64>> {
        let idx = match schema.index(column) {
            Some(idx) => idx,
            None => return Ok(None),
        };
        self.cleaner
            .parse_decimal(row.cell(idx))
            .map_err(|message| field_error(row, schema, idx, row.cell(idx).to_string(), message))
    }

    /// 解析数量字段
    fn parse_count(
        &self,
        row: &RawRow,
        schema: &ResolvedSchema,
        column: Column,
    ) -> ImportResult<Option<u32>> {
        let idx = match schema.index(column) {
            Some(idx) => idx,
            None => return Ok(None),
        };
        self.cleaner
            .parse_count(row.cell(idx))
            .map_err(|message| field_error(row, schema, idx, row.cell(idx).to_string(), message))
    }

    /// 解析加工面（空白 = 顶面）
    fn parse_side(&self, row: &RawRow, schema: &ResolvedSchema) -> ImportResult<Side> {
        let idx = match schema.index(Column::Side) {
            Some(idx) => idx,
            None => return Ok(Side::Top),
        };
        match self.cleaner.text(row.cell(idx)) {
            None => Ok(Side::Top),
            Some(value) => Side::parse(&value).ok_or_else(|| {
                field_error(
                    row,
                    schema,
                    idx,
                    value,
                    "未知加工面（应为 BOVENKANT / ZIJKANT ...）".to_string(),
                )
            }),
        }
    }

    /// 解析所有孔位列（"x@d"，以 | 或 ; 分隔）
    fn parse_holes(&self, row: &RawRow, schema: &ResolvedSchema) -> ImportResult<Vec<Hole>> {
        let mut holes = Vec::new();
        for &idx in schema.hole_columns() {
            let text = match self.cleaner.text(row.cell(idx)) {
                Some(t) => t,
                None => continue,
            };
            for token in text.split(['|', ';']).map(str::trim).filter(|t| !t.is_empty()) {
                let hole = parse_hole(token).ok_or_else(|| {
                    field_error(
                        row,
                        schema,
                        idx,
                        token.to_string(),
                        "孔位格式应为 x@d（如 25@5）".to_string(),
                    )
                })?;
                holes.push(hole);
            }
        }
        Ok(holes)
    }

    fn missing_value(&self, row: &RawRow, schema: &ResolvedSchema, column: Column) -> ImportError {
        let column_name = schema
            .index(column)
            .map(|idx| column_label(schema, idx))
            .unwrap_or_else(|| column.canonical_name().to_string());
        ImportError::FieldParseError {
            row: row.row_number,
            column: column_name,
            value: String::new(),
            message: "缺少数值且无可沿用的上一行".to_string(),
        }
    }
}

/// 有值时更新续行状态，空白时取续行状态
fn carried<T: Clone>(value: Option<T>, slot: &mut Option<T>) -> Option<T> {
    match value {
        Some(v) => {
            *slot = Some(v.clone());
            Some(v)
        }
        None => slot.clone(),
    }
}

fn parse_hole(token: &str) -> Option<Hole> {
    let (x, d) = token.split_once('@')?;
    Some(Hole {
        x_mm: parse_decimal_text(x)?,
        diameter_mm: parse_decimal_text(d)?,
    })
}

// 无表头的列用 "#<列号>" 表示
fn column_label(schema: &ResolvedSchema, idx: usize) -> String {
    let header = schema.header(idx);
    if header.is_empty() {
        format!("#{}", idx + 1)
    } else {
        header.to_string()
    }
}

fn field_error(
    row: &RawRow,
    schema: &ResolvedSchema,
    idx: usize,
    value: String,
    message: String,
) -> ImportError {
    ImportError::FieldParseError {
        row: row.row_number,
        column: column_label(schema, idx),
        value,
        message,
    }
}
