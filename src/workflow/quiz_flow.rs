//! 出题流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验图片
//! 2. 视觉模型识别文字
//! 3. 文本模型出题
//! 4. 解析并修复题目
//!
//! 任何一步失败都直接结束，不返回部分结果。

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, InputError};
use crate::models::image::ImageUpload;
use crate::models::question::QuizQuestion;
use crate::services::llm_service::QuizModel;
use crate::services::quiz_parser::parse_quiz_reply;
use crate::utils::logging::truncate_text;

/// 日志中模型输出的预览长度
const PREVIEW_CHARS: usize = 200;

/// 出题流程
///
/// - 不持有请求之间的可变状态，可以被多个请求共享
/// - 只依赖业务能力（services）
#[derive(Clone)]
pub struct QuizFlow {
    model: Arc<dyn QuizModel>,
}

impl QuizFlow {
    /// 创建新的出题流程
    pub fn new(model: Arc<dyn QuizModel>) -> Self {
        Self { model }
    }

    pub async fn generate_quiz(&self, image: &ImageUpload) -> AppResult<Vec<QuizQuestion>> {
        if image.bytes.is_empty() {
            return Err(InputError::MissingImage.into());
        }
        if !image.is_image() {
            warn!("⚠️ 拒绝非图片上传: {}", image.content_type);
            return Err(InputError::NotAnImage {
                content_type: image.content_type.clone(),
            }
            .into());
        }

        // ========== 步骤 1: 识别文字 ==========
        info!(
            "🔍 正在识别图片文字: {} ({}, {} 字节)",
            image.file_name,
            image.content_type,
            image.bytes.len()
        );

        let extracted = self.model.extract_text(image).await?;
        let extracted = extracted.trim();
        if extracted.is_empty() {
            warn!("⚠️ 图片中未识别到文字");
            return Err(AppError::EmptyExtraction);
        }

        info!("✓ 识别文字: {}", truncate_text(extracted, PREVIEW_CHARS));

        // ========== 步骤 2: 出题 ==========
        info!("📝 正在生成题目...");

        let reply = self.model.generate_quiz(extracted).await?;
        if reply.trim().is_empty() {
            error!("❌ 出题模型返回内容为空");
            return Err(AppError::EmptyGeneration);
        }

        info!("✓ 出题回复: {}", truncate_text(&reply, PREVIEW_CHARS));

        // ========== 步骤 3: 解析 ==========
        let questions = parse_quiz_reply(&reply).map_err(|e| {
            error!("❌ {}，原始回复: {}", e, reply);
            e
        })?;

        info!("✓ 生成 {} 道题目", questions.len());

        Ok(questions)
    }
}
