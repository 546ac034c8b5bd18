// ==========================================
// CNC 切割清单 - 型材分组
// ==========================================
// 职责: 同名条目 → ProfileSpec（每个加工面一组孔位）
// 顺序: 型材按首次出现排序，加工面按 Side 排序，孔位保持输入顺序
// ==========================================

use crate::config::profile_map::ProfileMap;
use crate::domain::cutlist::CutListItem;
use crate::domain::profile::ProfileSpec;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub struct ProfileGrouper<'a> {
    profile_map: &'a ProfileMap,
    default_tool_diam: f64,
}

impl<'a> ProfileGrouper<'a> {
    pub fn new(profile_map: &'a ProfileMap, default_tool_diam: f64) -> Self {
        Self {
            profile_map,
            default_tool_diam,
        }
    }

    /// 分组
    ///
    /// 条目须已通过批次校验（同名条目型号/长度/数量一致），
    /// 因此型材属性取该型材的第一个条目
    pub fn group(&self, items: &[CutListItem]) -> Vec<ProfileSpec> {
        let mut specs: Vec<ProfileSpec> = Vec::new();
        let mut index_by_name: HashMap<&str, usize> = HashMap::new();

        for item in items {
            let idx = *index_by_name
                .entry(item.profile_name.as_str())
                .or_insert_with(|| {
                    specs.push(self.new_spec(item));
                    specs.len() - 1
                });

            // 无孔的加工面也保留（仍需放置提示）
            specs[idx]
                .sections
                .entry(item.side)
                .or_default()
                .extend(item.holes.iter().map(|h| h.x_mm));
        }

        debug!(items = items.len(), profiles = specs.len(), "型材分组完成");
        specs
    }

    fn new_spec(&self, item: &CutListItem) -> ProfileSpec {
        ProfileSpec {
            name: item.profile_name.clone(),
            profile_code: item.profile_code.clone(),
            length_mm: item.length_mm,
            quantity: item.quantity,
            material: item.material.clone(),
            tool_diam: self
                .profile_map
                .tool_diam_for(&item.profile_code)
                .unwrap_or(self.default_tool_diam),
            sections: BTreeMap::new(),
        }
    }
}
