/// 日志工具模块
///
/// 初始化 tracing，并提供日志格式化的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 启动时需要提醒的配置问题
pub fn startup_warnings(config: &Config) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if config.llm_api_key.trim().is_empty() {
        warnings.push("未配置 GROQ_API_KEY，上游调用将会失败");
    }
    warnings
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 QuizSnap 中继服务启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听: {}:{}", config.bind_address, config.port);
    info!("👁️ 识别模型: {}", config.vision_model);
    info!("📝 出题模型: {}", config.quiz_model);
    for warning in startup_warnings(config) {
        warn!("⚠️ {}", warning);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
