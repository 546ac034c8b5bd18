// ==========================================
// CNC 切割清单 - 转换配置
// ==========================================
// 职责: 单次转换的全部输入（显式传入流水线，不读全局状态）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::profile_map::ProfileMap;
use crate::config::settings::MachineSettings;
use crate::domain::types::OutputFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 未指定材料且映射表无材料时使用
pub const DEFAULT_MATERIAL: &str = "ALU";

// ==========================================
// ConvertConfig - 转换配置
// ==========================================
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub sheet: Option<String>,
    pub profile_map: ProfileMap,
    pub settings: MachineSettings,
    pub default_material: String,
    /// 仅校验与汇总，不写文件
    pub dry_run: bool,
    /// 整体截止时间（从流水线启动算起）
    pub deadline: Option<Duration>,
}

impl ConvertConfig {
    /// 以默认参数创建（内置映射表、默认机床参数）
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Self {
            input: input.into(),
            output: None,
            format: None,
            sheet: None,
            profile_map: ProfileMap::builtin(),
            settings: MachineSettings::default(),
            default_material: DEFAULT_MATERIAL.to_string(),
            dry_run: false,
            deadline: None,
        }
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_profile_map(mut self, profile_map: ProfileMap) -> Self {
        self.profile_map = profile_map;
        self
    }

    pub fn with_settings(mut self, settings: MachineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 确定导出格式
    ///
    /// # 优先级
    /// 1. 显式 format
    /// 2. 输出文件扩展名
    /// 3. G-code（.tap）
    pub fn resolve_format(&self) -> ConfigResult<OutputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        match &self.output {
            Some(path) => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_string();
                OutputFormat::from_extension(&ext)
                    .ok_or(ConfigError::UnsupportedOutputFormat(ext))
            }
            None => Ok(OutputFormat::Tap),
        }
    }

    /// 确定输出路径（未指定时为输入文件换扩展名）
    pub fn resolve_output_path(&self, format: OutputFormat) -> ConfigResult<PathBuf> {
        let output = match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension(format.extension()),
        };
        if same_path(&output, &self.input) {
            return Err(ConfigError::OutputOverwritesInput(
                output.display().to_string(),
            ));
        }
        Ok(output)
    }

    /// 校验配置本身（机床参数）
    pub fn validate(&self) -> ConfigResult<()> {
        self.settings.validate()?;
        if self.default_material.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "default_material".to_string(),
                message: "不能为空".to_string(),
            });
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
