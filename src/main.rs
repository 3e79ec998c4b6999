use std::sync::Arc;

use anyhow::Result;
use quizsnap::utils::logging;
use quizsnap::{api, Config, LlmService, QuizFlow};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    // 初始化并运行服务
    let flow = QuizFlow::new(Arc::new(LlmService::new(&config)));
    api::serve(&config, flow).await?;

    Ok(())
}
