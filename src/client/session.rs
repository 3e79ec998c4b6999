//! 会话状态机
//!
//! 会话只有一个所有者（`QuizController`），每次转换都消费旧状态并返回新状态。
//! 与当前阶段无关的事件不改变状态。
//!
//! ```text
//! Upload ──选择图片──▶ Loading ──成功──▶ ModeSelect ──▶ Quiz ──最后一题之后──▶ Results
//!   ▲                    │                  ▲  │
//!   └──────失败──────────┘                  │  └──▶ Flashcards
//!   └────────────── Reset（Quiz / Flashcards / Results）
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::client::progress::{self, PROGRESS_DONE};
use crate::client::results::ResultSummary;
use crate::models::image::is_image_mime;
use crate::models::question::QuizQuestion;

/// 题目列表，收到后不再修改
pub type Deck = Arc<[QuizQuestion]>;

/// 当前阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Loading,
    ModeSelect,
    Quiz,
    Flashcards,
    Results,
}

/// 上传页提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// 选择的文件不是图片
    InvalidImage,
    /// 中继请求失败
    GenerationFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::InvalidImage => "Please upload an image file",
            Notice::GenerationFailed => "Failed to generate quiz. Please try again.",
        }
    }
}

/// 用户操作或中继响应
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// 选择或拖入了文件，携带声明的内容类型
    ImageSelected { content_type: String },
    /// 模拟进度前进一步
    ProgressTick(f64),
    /// 响应已到达，进度跳到 100%
    ResponseArrived,
    RelaySucceeded(Vec<QuizQuestion>),
    RelayFailed,
    ChooseQuiz,
    ChooseFlashcards,
    SelectAnswer(String),
    /// 下一题，最后一题之后进入结果页
    Advance,
    NextCard,
    PreviousCard,
    FlipCard,
    /// 闪卡返回模式选择
    BackToModes,
    Reset,
}

/// 选项展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    /// 尚未作答
    Pending,
    /// 正确答案
    Correct,
    /// 选错的选项
    WrongSelected,
    /// 其他选项
    Dimmed,
}

/// 测验进行中
#[derive(Debug, Clone, PartialEq)]
pub struct QuizState {
    deck: Deck,
    index: usize,
    score: usize,
    selected: Option<String>,
}

impl QuizState {
    fn start(deck: Deck) -> Self {
        Self {
            deck,
            index: 0,
            score: 0,
            selected: None,
        }
    }

    pub fn question(&self) -> &QuizQuestion {
        &self.deck[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 从 1 开始的题号
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 作答后显示解析
    pub fn show_explanation(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.deck.len()
    }

    pub fn advance_label(&self) -> &'static str {
        if self.is_last() {
            "See Results"
        } else {
            "Next Question"
        }
    }

    pub fn option_status(&self, option: &str) -> OptionStatus {
        let Some(selected) = self.selected.as_deref() else {
            return OptionStatus::Pending;
        };
        if self.question().is_correct(option) {
            OptionStatus::Correct
        } else if selected == option {
            OptionStatus::WrongSelected
        } else {
            OptionStatus::Dimmed
        }
    }

    /// 每道题只能作答一次，只有第一次选择计分
    fn select(mut self, option: String) -> Self {
        if self.selected.is_some() || !self.question().has_option(&option) {
            return self;
        }
        if self.question().is_correct(&option) {
            self.score += 1;
        }
        self.selected = Some(option);
        self
    }
}

/// 闪卡浏览中
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardState {
    deck: Deck,
    index: usize,
    flipped: bool,
}

impl FlashcardState {
    fn start(deck: Deck) -> Self {
        Self {
            deck,
            index: 0,
            flipped: false,
        }
    }

    pub fn card(&self) -> &QuizQuestion {
        &self.deck[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    /// 是否显示答案面
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.deck.len()
    }

    /// 最后一张卡片提供"回到首页"
    pub fn offers_home(&self) -> bool {
        !self.can_go_next()
    }

    /// 翻页后回到题目面，索引限制在 `[0, n-1]`
    fn move_to(self, index: usize) -> Self {
        Self {
            index: index.min(self.deck.len().saturating_sub(1)),
            flipped: false,
            ..self
        }
    }
}

/// 会话状态
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Upload { notice: Option<Notice> },
    Loading { progress: f64 },
    ModeSelect { deck: Deck },
    Quiz(QuizState),
    Flashcards(FlashcardState),
    Results { deck: Deck, score: usize },
}

impl Default for Session {
    fn default() -> Self {
        Session::Upload { notice: None }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self {
            Session::Upload { .. } => Phase::Upload,
            Session::Loading { .. } => Phase::Loading,
            Session::ModeSelect { .. } => Phase::ModeSelect,
            Session::Quiz(_) => Phase::Quiz,
            Session::Flashcards(_) => Phase::Flashcards,
            Session::Results { .. } => Phase::Results,
        }
    }

    /// 处理一个事件，返回新状态
    pub fn apply(self, event: Event) -> Session {
        match (self, event) {
            (Session::Upload { .. }, Event::ImageSelected { content_type }) => {
                if is_image_mime(&content_type) {
                    Session::Loading { progress: 0.0 }
                } else {
                    Session::Upload {
                        notice: Some(Notice::InvalidImage),
                    }
                }
            }

            (Session::Loading { progress }, Event::ProgressTick(step)) => Session::Loading {
                progress: progress::advance(progress, step),
            },
            (Session::Loading { .. }, Event::ResponseArrived) => Session::Loading {
                progress: PROGRESS_DONE,
            },
            (Session::Loading { .. }, Event::RelaySucceeded(questions)) => {
                if questions.is_empty() {
                    Session::Upload {
                        notice: Some(Notice::GenerationFailed),
                    }
                } else {
                    Session::ModeSelect {
                        deck: Deck::from(questions),
                    }
                }
            }
            (Session::Loading { .. }, Event::RelayFailed) => Session::Upload {
                notice: Some(Notice::GenerationFailed),
            },

            // 空题组无法开始，留在模式选择
            (Session::ModeSelect { deck }, Event::ChooseQuiz) if !deck.is_empty() => {
                Session::Quiz(QuizState::start(deck))
            }
            (Session::ModeSelect { deck }, Event::ChooseFlashcards) if !deck.is_empty() => {
                Session::Flashcards(FlashcardState::start(deck))
            }

            (Session::Quiz(quiz), Event::SelectAnswer(option)) => {
                Session::Quiz(quiz.select(option))
            }
            (Session::Quiz(quiz), Event::Advance) if quiz.selected.is_some() => {
                if quiz.is_last() {
                    Session::Results {
                        deck: quiz.deck,
                        score: quiz.score,
                    }
                } else {
                    Session::Quiz(QuizState {
                        index: quiz.index + 1,
                        selected: None,
                        ..quiz
                    })
                }
            }

            (Session::Flashcards(cards), Event::NextCard) => {
                let next = cards.index.saturating_add(1);
                Session::Flashcards(cards.move_to(next))
            }
            (Session::Flashcards(cards), Event::PreviousCard) => {
                let previous = cards.index.saturating_sub(1);
                Session::Flashcards(cards.move_to(previous))
            }
            (Session::Flashcards(cards), Event::FlipCard) => Session::Flashcards(FlashcardState {
                flipped: !cards.flipped,
                ..cards
            }),
            (Session::Flashcards(cards), Event::BackToModes) => {
                Session::ModeSelect { deck: cards.deck }
            }

            (Session::Quiz(_) | Session::Flashcards(_) | Session::Results { .. }, Event::Reset) => {
                Session::default()
            }

            (session, event) => {
                debug!("忽略事件 {:?}（当前阶段 {:?}）", event, session.phase());
                session
            }
        }
    }

    /// 展示用进度，非加载阶段为 0
    pub fn progress(&self) -> f64 {
        match self {
            Session::Loading { progress } => *progress,
            _ => 0.0,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            Session::Upload { notice } => *notice,
            _ => None,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        match self {
            Session::ModeSelect { deck } | Session::Results { deck, .. } => &deck[..],
            Session::Quiz(quiz) => &quiz.deck[..],
            Session::Flashcards(cards) => &cards.deck[..],
            Session::Upload { .. } | Session::Loading { .. } => &[],
        }
    }

    pub fn quiz(&self) -> Option<&QuizState> {
        match self {
            Session::Quiz(quiz) => Some(quiz),
            _ => None,
        }
    }

    pub fn flashcards(&self) -> Option<&FlashcardState> {
        match self {
            Session::Flashcards(cards) => Some(cards),
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        match self {
            Session::Quiz(quiz) => quiz.score,
            Session::Results { score, .. } => *score,
            _ => 0,
        }
    }

    /// 结果页的成绩
    pub fn summary(&self) -> Option<ResultSummary> {
        match self {
            Session::Results { deck, score } => Some(ResultSummary::new(*score, deck.len())),
            _ => None,
        }
    }
}
