//! LLM 服务 - 业务能力层
//!
//! 只负责"看图识字"和"根据文字出题"两种能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（Groq、OpenAI、本地推理服务等）

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AppError, AppResult, UpstreamStage};
use crate::models::image::ImageUpload;
use crate::models::question::QUIZ_SIZE;

/// 文字识别指令
pub const VISION_INSTRUCTION: &str =
    "Extract every word and formula from this image clearly. Output only the raw text.";

/// 出题系统提示词
pub const QUIZ_SYSTEM_PROMPT: &str = r#"You are an expert examiner. Based on the provided text, create 5 high-quality MCQs. You MUST return ONLY a JSON array in this format: [{"question": "", "options": ["option1", "option2", "option3", "option4"], "answer": "correct_option", "explanation": ""}]. IMPORTANT: Each question MUST have exactly 4 options. Do NOT include letter prefixes like "A.", "B.", "C.", "D." in the options - just the answer text. The "answer" field must exactly match one of the options. Make sure each question tests understanding of the content. Return ONLY valid JSON, no other text."#;

/// 出题用户消息
pub fn quiz_user_message(extracted_text: &str) -> String {
    format!(
        "Create a {}-question quiz based on this educational content:\n\n{}",
        QUIZ_SIZE, extracted_text
    )
}

/// 出题模型能力
///
/// 两个方法都返回模型的原始文本，可能为空；判空和解析由流程层负责
#[async_trait]
pub trait QuizModel: Send + Sync {
    /// 识别图片中的文字
    async fn extract_text(&self, image: &ImageUpload) -> AppResult<String>;

    /// 根据文字生成题目（原始回复）
    async fn generate_quiz(&self, extracted_text: &str) -> AppResult<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用视觉模型识别图片文字
/// - 调用文本模型生成选择题
/// - 不解析、不修复模型输出
pub struct LlmService {
    client: Client<OpenAIConfig>,
    vision_model: String,
    quiz_model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            vision_model: config.vision_model.clone(),
            quiz_model: config.quiz_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `model`: 模型名称
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `image_url`: 图片 URL 或 data URL（可选），会追加到用户消息中
    /// - `temperature`: 温度（可选，不传则使用服务端默认值）
    ///
    /// # 返回
    /// 返回去掉首尾空白的响应内容，模型没有返回内容时为空字符串
    async fn send_to_llm(
        &self,
        model: &str,
        user_message: &str,
        system_message: Option<&str>,
        image_url: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, OpenAIError> {
        debug!("调用 LLM API，模型: {}", model);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = match image_url {
            Some(url) => {
                // Vision API：文本 + 图片
                let content_parts = vec![
                    ChatCompletionRequestUserMessageContentPart::Text(
                        ChatCompletionRequestMessageContentPartText {
                            text: user_message.to_string(),
                        },
                    ),
                    ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url,
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ),
                ];

                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(
                        content_parts,
                    ))
                    .build()?
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?,
        };
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(model)
            .messages(messages)
            .max_tokens(self.max_tokens);
        if let Some(t) = temperature {
            builder.temperature(t);
        }
        let request = builder.build()?;

        let response = self.client.chat().create(request).await?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl QuizModel for LlmService {
    async fn extract_text(&self, image: &ImageUpload) -> AppResult<String> {
        debug!(
            "识别图片文字: {} ({}, {} 字节)",
            image.file_name,
            image.content_type,
            image.bytes.len()
        );

        self.send_to_llm(
            &self.vision_model,
            VISION_INSTRUCTION,
            None,
            Some(image.to_data_url()),
            None,
        )
        .await
        .map_err(|e| {
            error!("Vision API 调用失败: {}", e);
            AppError::upstream(UpstreamStage::Vision, e)
        })
    }

    async fn generate_quiz(&self, extracted_text: &str) -> AppResult<String> {
        self.send_to_llm(
            &self.quiz_model,
            &quiz_user_message(extracted_text),
            Some(QUIZ_SYSTEM_PROMPT),
            None,
            Some(self.temperature),
        )
        .await
        .map_err(|e| {
            error!("Quiz API 调用失败: {}", e);
            AppError::upstream(UpstreamStage::Generation, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_parser::parse_quiz_reply;

    /// 使用环境变量中的密钥创建服务
    fn create_test_service() -> LlmService {
        LlmService::new(&Config::from_env().expect("配置加载失败"))
    }

    #[test]
    fn test_quiz_user_message() {
        let msg = quiz_user_message("Photosynthesis converts light to energy.");
        assert!(msg.starts_with("Create a 5-question quiz"));
        assert!(msg.ends_with("\n\nPhotosynthesis converts light to energy."));
    }

    #[test]
    fn test_system_prompt_demands_json_array() {
        assert!(QUIZ_SYSTEM_PROMPT.contains("JSON array"));
        assert!(QUIZ_SYSTEM_PROMPT.contains("exactly 4 options"));
    }

    /// 测试出题接口
    ///
    /// 运行方式：
    /// ```bash
    /// GROQ_API_KEY=... cargo test test_generate_quiz_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_quiz_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let reply = service
            .generate_quiz("The mitochondria is the powerhouse of the cell. It produces ATP.")
            .await
            .expect("出题接口调用失败");

        println!("\n========== LLM 响应 ==========\n{}\n", reply);

        let questions = parse_quiz_reply(&reply).expect("出题结果解析失败");
        assert!(!questions.is_empty());
    }

    /// 测试 Vision API 文字识别
    #[tokio::test]
    #[ignore]
    async fn test_extract_text_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let path = std::env::var("QUIZSNAP_SAMPLE_IMAGE").expect("需要设置 QUIZSNAP_SAMPLE_IMAGE");
        let image = ImageUpload::from_path(std::path::Path::new(&path))
            .await
            .expect("读取图片失败");

        let text = create_test_service()
            .extract_text(&image)
            .await
            .expect("Vision API 调用失败");

        println!("\n========== 识别结果 ==========\n{}\n", text);
        assert!(!text.is_empty());
    }
}
