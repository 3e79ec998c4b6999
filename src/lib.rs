//! # QuizSnap
//!
//! 拍一张课本或笔记的照片，自动生成选择题测验或闪卡
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 看图识字、根据文字出题
//! - `quiz_parser` - 解析并修复模型输出
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `QuizFlow` - 流程编排（校验 → 识别 → 出题 → 修复）
//!
//! ### ③ 接口层（API）
//! - `api/` - `POST /api/generate-quiz` 中继接口
//!
//! ### ④ 客户端（Client）
//! - `client/` - 会话状态机、进度模拟、中继客户端
//!
//! ## 模块结构

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use client::{HttpRelayClient, QuizController, QuizRelay, Session};
pub use config::{ClientConfig, Config};
pub use error::{AppError, AppResult};
pub use models::{ImageUpload, QuizQuestion};
pub use services::{LlmService, QuizModel};
pub use workflow::QuizFlow;
