use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// 指向 TOML 配置文件的环境变量
pub const CONFIG_PATH_ENV: &str = "QUIZSNAP_CONFIG";

/// 中继服务配置
///
/// 加载顺序：默认值 → `QUIZSNAP_CONFIG` 指向的 TOML 文件 → 环境变量
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 上传图片大小上限（字节）
    pub max_upload_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 文字识别模型
    pub vision_model: String,
    /// 出题模型
    pub quiz_model: String,
    pub max_tokens: u32,
    /// 出题温度
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8787,
            max_upload_bytes: 10 * 1024 * 1024,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            vision_model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            quiz_model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

// 密钥不进日志
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("verbose_logging", &self.verbose_logging)
            .field("llm_api_key", &"<redacted>")
            .field("llm_api_base_url", &self.llm_api_base_url)
            .field("vision_model", &self.vision_model)
            .field("quiz_model", &self.quiz_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// 用 `lookup` 提供的变量覆盖当前值，解析失败时保留原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(self.bind_address),
            port: parse_var(&lookup, "PORT").unwrap_or(self.port),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES")
                .unwrap_or(self.max_upload_bytes),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            llm_api_key: lookup("GROQ_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            vision_model: lookup("VISION_MODEL").unwrap_or(self.vision_model),
            quiz_model: lookup("QUIZ_MODEL").unwrap_or(self.quiz_model),
            max_tokens: parse_var(&lookup, "LLM_MAX_TOKENS").unwrap_or(self.max_tokens),
            temperature: parse_var(&lookup, "LLM_TEMPERATURE").unwrap_or(self.temperature),
        }
    }

    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                AppError::Config(format!(
                    "监听地址无效 {}:{}: {}",
                    self.bind_address, self.port, e
                ))
            })
    }
}

/// 读取并解析一个变量，缺失或无法解析时返回 `None`
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// 中继服务地址，例如 `http://127.0.0.1:8787`
    pub relay_base_url: String,
    /// 进度条刷新间隔
    pub tick_interval: Duration,
    /// 进度到 100% 后切换界面前的停顿
    pub settle_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_base_url: "http://127.0.0.1:8787".to_string(),
            tick_interval: Duration::from_millis(500),
            settle_delay: Duration::from_millis(300),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            relay_base_url: std::env::var("QUIZSNAP_RELAY_URL").unwrap_or(default.relay_base_url),
            ..default
        }
    }
}
