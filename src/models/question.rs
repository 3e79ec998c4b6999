use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 每次出题的题目数量上限
pub const QUIZ_SIZE: usize = 5;

/// 每道题的选项数量
pub const OPTION_COUNT: usize = 4;

/// 选择题
///
/// 经过规范化后保证 `options.len() == 4` 且 `answer` 是其中一个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

impl QuizQuestion {
    /// 判断选项是否为正确答案
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// 上游模型返回的原始题目
///
/// 所有字段都不可信，缺失或类型不符时为 `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuizQuestion {
    pub question: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl From<&Value> for RawQuizQuestion {
    fn from(value: &Value) -> Self {
        // 非对象条目视为所有字段缺失
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let options = obj
            .get("options")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(scalar_text).collect());

        Self {
            question: obj.get("question").and_then(scalar_text),
            options,
            answer: obj.get("answer").and_then(scalar_text),
            explanation: obj.get("explanation").and_then(scalar_text),
        }
    }
}

/// 把字符串、数字、布尔值转成文本，其他类型返回 `None`
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `POST /api/generate-quiz` 成功响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

/// 失败响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_question_from_object() {
        let value = json!({
            "question": "2 + 2 = ?",
            "options": ["3", 4, true, null, {"x": 1}],
            "answer": 4,
            "explanation": "加法"
        });

        let raw = RawQuizQuestion::from(&value);
        assert_eq!(raw.question.as_deref(), Some("2 + 2 = ?"));
        assert_eq!(
            raw.options,
            Some(vec!["3".to_string(), "4".to_string(), "true".to_string()])
        );
        assert_eq!(raw.answer.as_deref(), Some("4"));
        assert_eq!(raw.explanation.as_deref(), Some("加法"));
    }

    #[test]
    fn test_raw_question_from_non_object() {
        assert_eq!(
            RawQuizQuestion::from(&json!("just text")),
            RawQuizQuestion::default()
        );
        assert_eq!(
            RawQuizQuestion::from(&json!({"options": "A, B"})).options,
            None
        );
    }

    #[test]
    fn test_quiz_response_shape() {
        let response = QuizResponse {
            questions: vec![QuizQuestion {
                question: "Q".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer: "b".into(),
                explanation: "E".into(),
            }],
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["questions"][0]["answer"], "b");
        assert_eq!(value["questions"][0]["options"].as_array().unwrap().len(), 4);
        assert!(response.questions[0].is_correct("b"));
        assert!(!response.questions[0].has_option("e"));
    }
}
