// ==========================================
// CNC 切割清单 - 型材映射表
// ==========================================
// 职责: 型号 → 钻孔 Y 位置 / 材料 / 钻头直径
// 来源: --profile-map 指定文件 > 用户配置目录 profiles.json > 内置表
// 规则: 来自文件的映射表同时作为"已知型号"白名单
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 未知型号时使用的 Y 位置
const DEFAULT_Y: (f64, f64) = (10.0, 10.0);

// ==========================================
// ProfileType - 单个型号参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileType {
    /// 顶面钻孔 Y
    pub top_y: f64,
    /// 侧面（T 槽 A/B）钻孔 Y
    pub side_y: f64,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub tool_diam: Option<f64>,
}

impl ProfileType {
    fn builtin(top_y: f64, side_y: f64) -> Self {
        Self {
            top_y,
            side_y,
            material: None,
            tool_diam: None,
        }
    }
}

// ==========================================
// ProfileMap - 型材映射表
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileMap {
    #[serde(default)]
    profiles: BTreeMap<String, ProfileType>,

    /// 是否限制已知型号（仅文件来源）
    #[serde(skip)]
    strict: bool,
}

impl ProfileMap {
    /// 内置型号表（不限制已知型号）
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("20x20".to_string(), ProfileType::builtin(10.0, 10.0));
        profiles.insert("20x40".to_string(), ProfileType::builtin(10.0, 10.0));
        profiles.insert("30x30".to_string(), ProfileType::builtin(15.0, 15.0));
        profiles.insert("40x40".to_string(), ProfileType::builtin(20.0, 20.0));
        profiles.insert("40x80".to_string(), ProfileType::builtin(20.0, 20.0));
        Self {
            profiles,
            strict: false,
        }
    }

    /// 从 JSON 文件加载
    ///
    /// # 格式
    /// ```json
    /// {"profiles": {"20x40": {"top_y": 10.0, "side_y": 10.0, "material": "ALU"}}}
    /// ```
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let parsed: ProfileMap =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut profiles = BTreeMap::new();
        for (code, profile) in parsed.profiles {
            if !profile.top_y.is_finite() || !profile.side_y.is_finite() {
                return Err(ConfigError::InvalidSetting {
                    key: format!("profiles.{}", code),
                    message: "top_y/side_y 必须为有限数值".to_string(),
                });
            }
            if let Some(d) = profile.tool_diam {
                if d <= 0.0 || !d.is_finite() {
                    return Err(ConfigError::InvalidSetting {
                        key: format!("profiles.{}.tool_diam", code),
                        message: "必须大于 0".to_string(),
                    });
                }
            }
            profiles.insert(normalize_code(&code), profile);
        }

        info!(path = %path.display(), count = profiles.len(), "型材映射表已加载");
        Ok(Self {
            profiles,
            strict: true,
        })
    }

    /// 用户配置目录下的默认映射表路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cnc-cutlist").join("profiles.json"))
    }

    /// 按优先级解析映射表
    ///
    /// # 优先级
    /// 1. 显式指定的文件
    /// 2. 用户配置目录 profiles.json（存在时）
    /// 3. 内置表
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("使用内置型材映射表");
                Ok(Self::builtin())
            }
        }
    }

    pub fn lookup(&self, code: &str) -> Option<&ProfileType> {
        self.profiles.get(&normalize_code(code))
    }

    /// 是否限制已知型号
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn knows(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// (顶面 Y, 侧面 Y)，未知型号取默认值
    pub fn y_positions(&self, code: &str) -> (f64, f64) {
        self.lookup(code)
            .map(|p| (p.top_y, p.side_y))
            .unwrap_or(DEFAULT_Y)
    }

    pub fn material_for(&self, code: &str) -> Option<&str> {
        self.lookup(code).and_then(|p| p.material.as_deref())
    }

    pub fn tool_diam_for(&self, code: &str) -> Option<f64> {
        self.lookup(code).and_then(|p| p.tool_diam)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// 型号标准化: 小写、去空格、'×' → 'x'
pub fn normalize_code(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '×' { 'x' } else { c })
        .collect()
}
