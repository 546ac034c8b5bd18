// ==========================================
// CNC 切割清单 - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidSetting { key: String, message: String },

    #[error("输出格式不支持: {0}（仅支持 .tap/.nc/.gcode/.ngc/.csv/.json）")]
    UnsupportedOutputFormat(String),

    #[error("输出文件与输入文件相同: {0}")]
    OutputOverwritesInput(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
