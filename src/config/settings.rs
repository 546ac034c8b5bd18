// ==========================================
// CNC 切割清单 - 机床参数
// ==========================================
// 职责: 钻孔/安全位/主轴参数，JSON 文件加载（字段均可缺省）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 机床参数键名（与 JSON 字段一致，用于错误信息）
pub mod setting_keys {
    pub const SLOW_APPROACH: &str = "slow_approach";
    pub const PECK_STEP: &str = "peck_step";
    pub const PECK_RETRACT: &str = "peck_retract";
    pub const Z_SAFE: &str = "z_safe";
    pub const Z_CLEAR: &str = "z_clear";
    pub const Z_APPROACH: &str = "z_approach";
    pub const FINAL_DEPTH: &str = "final_depth";
    pub const SPINDLE_RPM: &str = "spindle_rpm";
    pub const FEED_DRILL: &str = "feed_drill";
    pub const FEED_APPROACH: &str = "feed_approach";
    pub const TOOL_DIAM: &str = "tool_diam";
}

/// 最小啄钻深度（mm）
pub const MIN_PECK_STEP: f64 = 0.1;

/// 每个孔的最大啄钻次数
pub const MAX_PECKS_PER_HOLE: f64 = 10_000.0;

// ==========================================
// MachineSettings - 机床参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// 慢速引钻深度（mm）
    pub slow_approach: f64,
    /// 每次啄钻深度（mm）
    pub peck_step: f64,
    /// 啄钻回退量（mm）
    pub peck_retract: f64,
    /// 安全高度 Z
    pub z_safe: f64,
    /// 孔间移动高度 Z
    pub z_clear: f64,
    /// 引钻起始高度 Z
    pub z_approach: f64,
    /// 最终深度 Z（型材底面以下）
    pub final_depth: f64,
    /// 停放位置 Y
    pub y_park: f64,
    pub spindle_rpm: u32,
    /// 钻孔进给（mm/min）
    pub feed_drill: u32,
    /// 引钻进给（mm/min）
    pub feed_approach: u32,
    /// 钻头直径（mm）
    pub tool_diam: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            slow_approach: 2.0,
            peck_step: 3.0,
            peck_retract: 0.5,
            z_safe: 85.0,
            z_clear: 55.0,
            z_approach: 45.0,
            final_depth: -2.0,
            y_park: 300.0,
            spindle_rpm: 11000,
            feed_drill: 250,
            feed_approach: 100,
            tool_diam: 4.0,
        }
    }
}

impl MachineSettings {
    /// 从 JSON 文件加载（缺省字段取默认值）并校验
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings: MachineSettings =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        debug!(path = %path.display(), "机床参数已加载");
        Ok(settings)
    }

    /// 校验参数一致性
    ///
    /// # 规则
    /// - peck_step >= MIN_PECK_STEP，每孔啄钻次数不超过 MAX_PECKS_PER_HOLE
    /// - slow_approach >= 0, 0 <= peck_retract < peck_step
    /// - final_depth < z_approach <= z_clear <= z_safe
    /// - tool_diam > 0, spindle_rpm/feed > 0
    pub fn validate(&self) -> ConfigResult<()> {
        use setting_keys::*;

        let all_finite = [
            self.slow_approach,
            self.peck_step,
            self.peck_retract,
            self.z_safe,
            self.z_clear,
            self.z_approach,
            self.final_depth,
            self.y_park,
            self.tool_diam,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(invalid("*", "参数必须为有限数值"));
        }

        if self.peck_step < MIN_PECK_STEP {
            return Err(invalid(PECK_STEP, "不能小于 0.1 mm"));
        }
        if self.slow_approach < 0.0 {
            return Err(invalid(SLOW_APPROACH, "不能为负数"));
        }
        if self.peck_retract < 0.0 || self.peck_retract >= self.peck_step {
            return Err(invalid(PECK_RETRACT, "必须在 [0, peck_step) 之间"));
        }
        if self.z_approach <= self.final_depth {
            return Err(invalid(Z_APPROACH, "必须高于 final_depth"));
        }
        if self.z_approach - self.slow_approach < self.final_depth {
            return Err(invalid(FINAL_DEPTH, "慢速引钻已越过最终深度"));
        }
        let pecks = (self.z_approach - self.slow_approach - self.final_depth) / self.peck_step;
        if pecks > MAX_PECKS_PER_HOLE {
            return Err(invalid(PECK_STEP, "每孔啄钻次数过多"));
        }
        if self.z_clear < self.z_approach {
            return Err(invalid(Z_CLEAR, "不能低于 z_approach"));
        }
        if self.z_safe < self.z_clear {
            return Err(invalid(Z_SAFE, "不能低于 z_clear"));
        }
        if self.tool_diam <= 0.0 {
            return Err(invalid(TOOL_DIAM, "必须大于 0"));
        }
        if self.spindle_rpm == 0 {
            return Err(invalid(SPINDLE_RPM, "必须大于 0"));
        }
        if self.feed_drill == 0 {
            return Err(invalid(FEED_DRILL, "必须大于 0"));
        }
        if self.feed_approach == 0 {
            return Err(invalid(FEED_APPROACH, "必须大于 0"));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.to_string(),
        message: message.to_string(),
    }
}
