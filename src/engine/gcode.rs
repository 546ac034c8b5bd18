// ==========================================
// CNC 切割清单 - G-code 程序生成
// ==========================================
// 职责: ProfileSpec 列表 → 完整 G-code 程序文本
// 布局: 程序头 → 每个型材每件 → 每个加工面（放置提示 + 钻孔）→ 程序尾
// 红线: 输出只依赖输入与参数（无时间戳），重复运行结果逐字节一致
// ==========================================

use crate::config::profile_map::ProfileMap;
use crate::config::settings::MachineSettings;
use crate::domain::profile::ProfileSpec;
use crate::domain::types::Side;
use crate::engine::drill_cycle::{mm, slow_then_peck};

const HEADER: &[&str] = &[
    "(PROJECT: cutlist)",
    "G90 G94 G91.1 G40 G49 G17",
    "G21",
    "G28 G91 Z0.",
    "G90",
];

const FOOTER: &[&str] = &[
    "M9",
    "M5",
    "G28 G91 Z0.",
    "G90",
    "G28 G91 X0. Y0.",
    "G90",
    "M30",
];

pub struct ProgramBuilder<'a> {
    settings: &'a MachineSettings,
    profile_map: &'a ProfileMap,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(settings: &'a MachineSettings, profile_map: &'a ProfileMap) -> Self {
        Self {
            settings,
            profile_map,
        }
    }

    /// 生成完整程序（以换行结尾）
    pub fn build(&self, profiles: &[ProfileSpec]) -> String {
        let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
        lines.push(format!("(profiles: {})", profiles.len()));

        for profile in profiles {
            for piece in 1..=profile.quantity {
                self.push_piece(&mut lines, profile, piece);
            }
        }

        lines.extend(FOOTER.iter().map(|l| l.to_string()));

        let mut program = lines.join("\n");
        program.push('\n');
        program
    }

    /// 固定顺序: X0 → Z 安全高度 → Y 停放位置
    pub fn safe_moves(&self) -> Vec<String> {
        vec![
            format!("G0 X{}", mm(0.0)),
            format!("G0 Z{}", mm(self.settings.z_safe)),
            format!("G0 Y{}", mm(self.settings.y_park)),
        ]
    }

    /// 加工面钻孔 Y 位置
    pub fn y_for(&self, profile_code: &str, side: Side) -> f64 {
        let (top_y, side_y) = self.profile_map.y_positions(profile_code);
        match side {
            Side::Top => top_y,
            Side::SlotA | Side::SlotB => side_y,
            Side::SideY(y) => y as f64,
        }
    }

    fn push_piece(&self, lines: &mut Vec<String>, profile: &ProfileSpec, piece: u32) {
        let name = comment_text(&profile.name);
        lines.push(format!(
            "(PROFILE {} {} L{})",
            name,
            comment_text(&profile.profile_code),
            mm(profile.length_mm)
        ));
        lines.push(format!("(STUK {}/{})", piece, profile.quantity));
        lines.extend(self.safe_moves());

        for (side, xs) in &profile.sections {
            lines.push("M5".to_string());
            lines.push(format!(
                "(PLAATS PROFIEL: {}   {})",
                name,
                side.placement_label()
            ));
            lines.push("M0".to_string());
            lines.push(format!("S{} M3", self.settings.spindle_rpm));
            lines.push(format!("(SECTIE {})", side));

            let y = self.y_for(&profile.profile_code, *side);
            for &x in xs {
                lines.push(format!("(DRILL X{} D{:.1})", mm(x), profile.tool_diam));
                lines.push(format!("G0 X{} Y{}", mm(x), mm(y)));
                lines.extend(slow_then_peck(self.settings));
            }

            lines.push(format!("(/SECTIE {})", side));
            lines.extend(self.safe_moves());
        }
    }
}

/// 注释内文本: 括号与控制字符替换为空格
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == '(' || c == ')' || c.is_control() { ' ' } else { c })
        .collect()
}
