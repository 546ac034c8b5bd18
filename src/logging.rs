// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// 输出到 stderr（stdout 保留给 CLI 结果输出）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤级别
///
/// verbose 时本 crate 输出 debug 日志
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,cnc_cutlist=debug"
    } else {
        "info"
    }
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（优先于 verbose）
///   例如: RUST_LOG=debug 或 RUST_LOG=cnc_cutlist=trace
///
/// # 示例
/// ```no_run
/// use cnc_cutlist::logging;
/// logging::init(false);
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // 重复初始化（例如库被嵌入时）不视为错误
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(verbose)
        .try_init();
}

/// 初始化 JSON 格式日志（便于日志采集）
pub fn init_json(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .try_init();
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
