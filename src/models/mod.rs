pub mod image;
pub mod question;

pub use image::{is_image_mime, mime_from_path, ImageUpload, DEFAULT_IMAGE_MIME};
pub use question::{
    ErrorResponse, QuizQuestion, QuizResponse, RawQuizQuestion, OPTION_COUNT, QUIZ_SIZE,
};
