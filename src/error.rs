use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// 上游调用阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    /// 图片文字识别
    Vision,
    /// 题目生成
    Generation,
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStage::Vision => write!(f, "vision"),
            UpstreamStage::Generation => write!(f, "generation"),
        }
    }
}

/// 输入错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// 请求中没有图片
    #[error("未提供图片")]
    MissingImage,
    /// 声明的类型不是图片
    #[error("不是图片类型: {content_type}")]
    NotAnImage { content_type: String },
    /// multipart 请求体无法解析
    #[error("上传内容无法解析: {0}")]
    MalformedUpload(String),
}

/// 应用程序错误类型
///
/// 每一种错误都是终止性的，不做自动重试
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入错误（客户端在发请求前就能发现）
    #[error("输入错误: {0}")]
    InvalidInput(#[from] InputError),

    /// 上游模型调用失败
    #[error("上游 {stage} 模型调用失败: {source}")]
    UpstreamUnavailable {
        stage: UpstreamStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 图片中没有识别出文字
    #[error("图片中未识别到文字")]
    EmptyExtraction,

    /// 出题模型返回内容为空
    #[error("出题模型返回内容为空")]
    EmptyGeneration,

    /// 出题结果不是合法的题目数组
    #[error("出题结果解析失败: {0}")]
    MalformedGeneration(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 客户端访问中继服务失败
    #[error("中继请求失败 (状态码: {status:?}): {message}")]
    Relay {
        status: Option<u16>,
        message: String,
    },
}

impl AppError {
    /// 创建上游调用错误
    pub fn upstream(
        stage: UpstreamStage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::UpstreamUnavailable {
            stage,
            source: source.into(),
        }
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::EmptyExtraction => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的错误信息，不包含上游细节
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(InputError::MissingImage) => "No image provided",
            AppError::InvalidInput(InputError::NotAnImage { .. }) => "Please upload an image file",
            AppError::InvalidInput(InputError::MalformedUpload(_)) => "Invalid image upload",
            AppError::UpstreamUnavailable {
                stage: UpstreamStage::Vision,
                ..
            } => "Failed to analyze image",
            AppError::UpstreamUnavailable {
                stage: UpstreamStage::Generation,
                ..
            } => "Failed to generate quiz",
            AppError::EmptyExtraction => "Could not extract text from image",
            AppError::EmptyGeneration => "Failed to generate quiz content",
            AppError::MalformedGeneration(_) => "Failed to parse quiz response",
            AppError::Config(_) | AppError::File { .. } | AppError::Relay { .. } => {
                "Internal server error"
            }
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
