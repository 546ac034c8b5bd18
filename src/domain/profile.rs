// ==========================================
// CNC 切割清单 - 型材规格
// ==========================================
// 职责: 同名行汇总后的物理型材（一个型材 = 多个加工面）
// ==========================================

use crate::domain::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ProfileSpec - 型材规格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,         // 型材名称，如 "Profiel 1"
    pub profile_code: String, // 截面型号，如 "20x40"
    pub length_mm: f64,
    pub quantity: u32,
    pub material: String,
    pub tool_diam: f64,                    // 钻头直径
    pub sections: BTreeMap<Side, Vec<f64>>, // 每个加工面的孔位 X（mm）
}

impl ProfileSpec {
    pub fn hole_count(&self) -> usize {
        self.sections.values().map(|xs| xs.len()).sum()
    }
}
