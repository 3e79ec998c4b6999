//! 上传图片
//!
//! 客户端和中继服务共用同一个图片类型

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use phf::phf_map;

use crate::error::{AppError, AppResult};

/// 服务端未声明类型时使用的默认 MIME
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// 无法识别扩展名时声明的类型
pub const UNKNOWN_MIME: &str = "application/octet-stream";

static EXTENSION_MIME: phf::Map<&'static str, &'static str> = phf_map! {
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "png" => "image/png",
    "webp" => "image/webp",
    "gif" => "image/gif",
    "bmp" => "image/bmp",
    "heic" => "image/heic",
    "heif" => "image/heif",
    "avif" => "image/avif",
    "svg" => "image/svg+xml",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
};

/// 待识别的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// 声明的内容类型
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// 从磁盘读取图片，内容类型由扩展名推断
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, mime_from_path(path), bytes))
    }

    /// 声明的类型是否为图片
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.content_type)
    }

    /// 编码为 `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64.encode(&self.bytes))
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// 根据扩展名推断 MIME
pub fn mime_from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| EXTENSION_MIME.get(ext.to_ascii_lowercase().as_str()).copied())
        .unwrap_or(UNKNOWN_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/JPEG"));
        assert!(is_image_mime(" image/webp"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("notes.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("a/b/page.webp")), "image/webp");
        assert_eq!(mime_from_path(Path::new("essay.pdf")), UNKNOWN_MIME);
        assert_eq!(mime_from_path(Path::new("README")), UNKNOWN_MIME);
    }

    #[test]
    fn test_data_url() {
        let image = ImageUpload::new("x.png", "image/png", b"hi".to_vec());
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("quizsnap-{}.png", std::process::id()));
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = tokio_test::block_on(ImageUpload::from_path(&path)).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
        assert!(image.is_image());

        std::fs::remove_file(&path).unwrap();

        let missing = tokio_test::block_on(ImageUpload::from_path(&path));
        assert!(matches!(missing, Err(AppError::File { .. })));
    }
}
