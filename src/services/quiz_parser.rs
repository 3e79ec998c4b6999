//! 出题结果解析 - 业务能力层
//!
//! 模型输出不可信：可能被 markdown 代码块包裹、选项带字母前缀、
//! 选项数量不对、答案对不上选项。这里把它修复成保证可渲染的题目列表，
//! 或者返回 `MalformedGeneration`。

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::question::{QuizQuestion, RawQuizQuestion, OPTION_COUNT, QUIZ_SIZE};

/// 选项字母前缀，例如 `A.`、`b)`、`C:`、`d-`
static LETTER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Da-d][.):\-]\s*").expect("letter prefix pattern is valid")
});

const FALLBACK_QUESTION: &str = "Question";
const FALLBACK_EXPLANATION: &str = "No explanation provided.";

/// 去掉回复外层的 markdown 代码块标记
pub fn strip_code_fence(reply: &str) -> &str {
    let mut content = reply.trim();
    if let Some(rest) = content.strip_prefix("```json") {
        content = rest;
    } else if let Some(rest) = content.strip_prefix("```") {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}

/// 去掉选项的字母前缀
///
/// 重复剥离直到没有前缀，所以对结果再调用一次不会有变化
pub fn clean_option(text: &str) -> String {
    let mut rest = text.trim();
    while let Some(m) = LETTER_PREFIX.find(rest) {
        rest = rest[m.end()..].trim_start();
    }
    rest.trim_end().to_string()
}

/// 修复单道题目
///
/// - 选项去前缀、去空、去重，最多保留 4 个，不足时用 `Option k` 补齐
/// - 答案不在选项中时回退到第一个选项
/// - 题干、解析缺失时使用默认文本
pub fn normalize_question(raw: RawQuizQuestion) -> QuizQuestion {
    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
    for option in raw.options.unwrap_or_default().iter().map(|o| clean_option(o)) {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !option.is_empty() && !options.contains(&option) {
            options.push(option);
        }
    }

    let mut label = options.len();
    while options.len() < OPTION_COUNT {
        label += 1;
        let placeholder = format!("Option {}", label);
        if !options.contains(&placeholder) {
            options.push(placeholder);
        }
    }

    let cleaned_answer = clean_option(raw.answer.as_deref().unwrap_or_default());
    let answer = if options.contains(&cleaned_answer) {
        cleaned_answer
    } else {
        options[0].clone()
    };

    QuizQuestion {
        question: non_empty_or(raw.question, FALLBACK_QUESTION),
        options,
        answer,
        explanation: non_empty_or(raw.explanation, FALLBACK_EXPLANATION),
    }
}

fn non_empty_or(text: Option<String>, fallback: &str) -> String {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => fallback.to_string(),
    }
}

/// 解析出题模型的回复
///
/// 返回 1 到 5 道题目；不是 JSON 数组或数组为空时返回错误
pub fn parse_quiz_reply(reply: &str) -> AppResult<Vec<QuizQuestion>> {
    let content = strip_code_fence(reply);

    let value: Value = serde_json::from_str(content)
        .map_err(|e| AppError::MalformedGeneration(format!("JSON 解析失败: {}", e)))?;

    let entries = value
        .as_array()
        .ok_or_else(|| AppError::MalformedGeneration("回复不是 JSON 数组".to_string()))?;

    if entries.is_empty() {
        return Err(AppError::MalformedGeneration("题目数组为空".to_string()));
    }

    Ok(entries
        .iter()
        .take(QUIZ_SIZE)
        .map(|entry| normalize_question(RawQuizQuestion::from(entry)))
        .collect())
}
