// ==========================================
// CNC 切割清单 - 钻孔循环
// ==========================================
// 职责: 慢速引钻 + 啄钻（peck drilling）G-code 生成
// 红线: 纯函数，只依赖机床参数
// ==========================================

use crate::config::settings::MachineSettings;

/// 坐标格式（3 位小数）
pub fn mm(value: f64) -> String {
    // 避免输出 "-0.000"
    let value = if value.abs() < 0.0005 { 0.0 } else { value };
    format!("{:.3}", value)
}

/// 慢速引钻后啄钻至最终深度
///
/// # 步骤
/// 1. 快移至 z_approach
/// 2. 以 feed_approach 慢速下降 slow_approach
/// 3. 每次下降 peck_step（不低于 final_depth），回退 peck_retract 后再进给
/// 4. 快速退刀至 z_clear
///
/// # 返回
/// G-code 行（不含换行符）
pub fn slow_then_peck(settings: &MachineSettings) -> Vec<String> {
    let z_start = settings.z_approach - settings.slow_approach;

    let mut lines = vec![
        format!("G0 Z{}", mm(settings.z_approach)),
        format!("G1 Z{} F{}", mm(z_start), settings.feed_approach),
    ];

    let mut z = z_start;
    while z > settings.final_depth {
        let next = (z - settings.peck_step).max(settings.final_depth);
        lines.push(format!("G1 Z{} F{}", mm(next), settings.feed_drill));
        lines.push(format!("G0 Z{}", mm(next + settings.peck_retract)));
        lines.push(format!("G1 Z{} F{}", mm(next), settings.feed_drill));
        z = next;
    }

    lines.push(format!("G0 Z{}", mm(settings.z_clear)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shallow_settings() -> MachineSettings {
        MachineSettings {
            z_approach: 5.0,
            slow_approach: 2.0,
            peck_step: 3.0,
            peck_retract: 0.5,
            final_depth: -2.0,
            z_clear: 10.0,
            z_safe: 20.0,
            ..MachineSettings::default()
        }
    }

    #[test]
    fn test_cycle_reaches_final_depth_in_steps() {
        let lines = slow_then_peck(&shallow_settings());

        assert_eq!(
            lines,
            vec![
                "G0 Z5.000",
                "G1 Z3.000 F100",
                "G1 Z0.000 F250",
                "G0 Z0.500",
                "G1 Z0.000 F250",
                "G1 Z-2.000 F250",
                "G0 Z-1.500",
                "G1 Z-2.000 F250",
                "G0 Z10.000",
            ]
        );
    }

    #[test]
    fn test_default_cycle_never_goes_below_final_depth() {
        let settings = MachineSettings::default();
        let lines = slow_then_peck(&settings);

        assert_eq!(lines.first().unwrap(), "G0 Z45.000");
        assert_eq!(lines.last().unwrap(), "G0 Z55.000");
        let deepest = lines
            .iter()
            .filter(|l| l.starts_with("G1 Z"))
            .filter_map(|l| l[4..].split_whitespace().next())
            .filter_map(|z| z.parse::<f64>().ok())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(deepest, settings.final_depth);
    }

    #[test]
    fn test_mm_formatting() {
        assert_eq!(mm(85.0), "85.000");
        assert_eq!(mm(-0.0001), "0.000");
        assert_eq!(mm(12.3456), "12.346");
    }
}
