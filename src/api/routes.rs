//! HTTP 路由
//!
//! `POST /api/generate-quiz` 与 `GET /api/health`

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, InputError};
use crate::models::image::{ImageUpload, DEFAULT_IMAGE_MIME};
use crate::models::question::{ErrorResponse, QuizResponse};
use crate::workflow::QuizFlow;

/// 上传表单中的图片字段名
pub const IMAGE_FIELD: &str = "image";

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub flow: QuizFlow,
}

/// 构建路由
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/generate-quiz", post(generate_quiz))
        .route("/api/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /api/generate-quiz`
async fn generate_quiz(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<QuizResponse>> {
    let multipart = multipart.map_err(|e| {
        warn!("⚠️ 请求不是 multipart 表单: {}", e);
        AppError::from(InputError::MissingImage)
    })?;

    let image = read_image_field(multipart).await?;
    info!(
        "📥 收到图片: {} ({}, {} 字节)",
        image.file_name,
        image.content_type,
        image.bytes.len()
    );

    let questions = state.flow.generate_quiz(&image).await?;
    Ok(Json(QuizResponse { questions }))
}

/// 读取 `image` 字段
///
/// 没有该字段或内容为空时返回 `MissingImage`；未声明类型时按 `image/jpeg` 处理
async fn read_image_field(mut multipart: Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| InputError::MalformedUpload(e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| InputError::MalformedUpload(e.to_string()))?;

        if bytes.is_empty() {
            break;
        }
        return Ok(ImageUpload::new(file_name, content_type, bytes.to_vec()));
    }

    Err(InputError::MissingImage.into())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ 出题失败: {}", self);
        } else {
            warn!("⚠️ 请求被拒绝: {}", self);
        }

        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
