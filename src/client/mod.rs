//! 客户端流程控制
//!
//! 上传 → 加载 → 选择模式 → 测验 / 闪卡 → 结果

pub mod controller;
pub mod progress;
pub mod relay_client;
pub mod results;
pub mod session;

pub use controller::QuizController;
pub use progress::ProgressTicker;
pub use relay_client::{HttpRelayClient, QuizRelay};
pub use results::{ResultSummary, ResultTier};
pub use session::{Event, FlashcardState, Notice, OptionStatus, Phase, QuizState, Session};
