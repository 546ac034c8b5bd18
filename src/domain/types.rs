// ==========================================
// CNC 切割清单 - 领域类型定义
// ==========================================
// 职责: 加工面 (Side)、导出格式、数据质量级别
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 加工面 (Side / zijde)
// ==========================================
// 排序即加工顺序: 顶面 → T 槽 A → T 槽 B → 侧面 Y<n>
// 序列化为显示文本，可作为 JSON 对象键
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Side {
    Top,        // BOVENKANT
    SlotA,      // ZIJKANT T-slot A
    SlotB,      // ZIJKANT T-slot B
    SideY(u32), // ZIJKANT Y<n>
}

impl Side {
    /// 从表格中的 zijde 文本解析加工面
    ///
    /// # 规则
    /// - 空白 → Top
    /// - BOVENKANT… → Top
    /// - ZIJKANT … Y<n> → SideY(n)
    /// - ZIJKANT … B → SlotB
    /// - 其余 ZIJKANT… → SlotA
    /// - 其他文本 → None（由调用方报告解析错误）
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_uppercase();
        if upper.is_empty() || upper.starts_with("BOVENKANT") {
            return Some(Side::Top);
        }
        if !upper.starts_with("ZIJKANT") {
            return None;
        }

        let rest = upper["ZIJKANT".len()..].trim();
        if let Some(y) = parse_side_y(rest) {
            return Some(Side::SideY(y));
        }

        let last_token = rest.split_whitespace().last().unwrap_or("");
        if last_token == "B" {
            Some(Side::SlotB)
        } else {
            Some(Side::SlotA)
        }
    }

    /// 放置提示中使用的简短标签
    pub fn placement_label(&self) -> String {
        match self {
            Side::Top => "BOVENKANT".to_string(),
            Side::SlotA => "ZIJKANT A".to_string(),
            Side::SlotB => "ZIJKANT B".to_string(),
            Side::SideY(y) => format!("ZIJKANT Y{}", y),
        }
    }
}

// "Y30" / "Y 30"
fn parse_side_y(rest: &str) -> Option<u32> {
    let pos = rest.find('Y')?;
    let digits: String = rest[pos + 1..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "BOVENKANT"),
            Side::SlotA => write!(f, "ZIJKANT T-slot A"),
            Side::SlotB => write!(f, "ZIJKANT T-slot B"),
            Side::SideY(y) => write!(f, "ZIJKANT Y{}", y),
        }
    }
}

impl From<Side> for String {
    fn from(side: Side) -> Self {
        side.to_string()
    }
}

impl TryFrom<String> for Side {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Side::parse(&value).ok_or_else(|| format!("未知加工面: {}", value))
    }
}

// ==========================================
// 导出格式 (Output Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Tap,  // G-code 程序
    Csv,  // 切割清单（可重新导入）
    Json, // 按型材分组的 ProfileSpec 列表
}

impl OutputFormat {
    /// 根据输出文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "tap" | "nc" | "gcode" | "ngc" => Some(OutputFormat::Tap),
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// 默认输出扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tap => "tap",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// ==========================================
// 数据质量级别 (DQ Level)
// ==========================================
// 阻断性问题走 ImportError，这里只记录非阻断发现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Warning, // 警告（允许导出）
    Info,    // 提示（仅记录）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
        }
    }
}
