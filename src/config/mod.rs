// ==========================================
// CNC 切割清单 - 配置层
// ==========================================
// 职责: 机床参数、型材映射表、单次转换配置
// 存储: JSON 文件（可选），否则取内置默认值
// ==========================================

pub mod convert_config;
pub mod error;
pub mod profile_map;
pub mod settings;

// 重导出核心配置类型
pub use convert_config::{ConvertConfig, DEFAULT_MATERIAL};
pub use error::{ConfigError, ConfigResult};
pub use profile_map::{ProfileMap, ProfileType};
pub use settings::{setting_keys, MachineSettings};
