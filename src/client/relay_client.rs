//! 中继客户端
//!
//! 负责把图片交给中继服务并取回题目

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::api::IMAGE_FIELD;
use crate::error::{AppError, AppResult};
use crate::models::image::ImageUpload;
use crate::models::question::{ErrorResponse, QuizQuestion, QuizResponse};
use crate::workflow::QuizFlow;

/// 出题中继
#[async_trait]
pub trait QuizRelay: Send + Sync {
    async fn generate_quiz(&self, image: &ImageUpload) -> AppResult<Vec<QuizQuestion>>;
}

/// 通过 HTTP 调用 `POST /api/generate-quiz`
pub struct HttpRelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// # 参数
    /// - `base_url`: 中继服务地址，例如 `http://127.0.0.1:8787`
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/generate-quiz", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuizRelay for HttpRelayClient {
    async fn generate_quiz(&self, image: &ImageUpload) -> AppResult<Vec<QuizQuestion>> {
        debug!("上传图片到 {}: {} 字节", self.endpoint, image.bytes.len());

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| AppError::Relay {
                status: None,
                message: format!("无效的内容类型 {}: {}", image.content_type, e),
            })?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Relay {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            warn!("中继返回错误 ({}): {}", status, message);
            return Err(AppError::Relay {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: QuizResponse = response.json().await.map_err(|e| AppError::Relay {
            status: Some(status.as_u16()),
            message: format!("响应解析失败: {}", e),
        })?;

        Ok(body.questions)
    }
}

/// 同进程直接调用出题流程，不经过 HTTP
#[async_trait]
impl QuizRelay for QuizFlow {
    async fn generate_quiz(&self, image: &ImageUpload) -> AppResult<Vec<QuizQuestion>> {
        QuizFlow::generate_quiz(self, image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            HttpRelayClient::new("http://localhost:8787/").endpoint(),
            "http://localhost:8787/api/generate-quiz"
        );
        assert_eq!(
            HttpRelayClient::new("https://quiz.example.com").endpoint(),
            "https://quiz.example.com/api/generate-quiz"
        );
    }
}
