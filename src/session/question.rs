use serde::Serialize;
use uuid::Uuid;

use crate::protocol::messages::QuestionInput;
use crate::protocol::types::QuestionId;

/// Default time limit applied when a `host:add-question` payload omits one.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// A question as stored server-side, including the correct answer index
/// that must never be sent to clients before `host:reveal-answer`.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub time_limit_secs: u32,
    pub category: Option<String>,
}

impl Question {
    pub fn from_input(input: QuestionInput) -> Result<Self, String> {
        if input.text.trim().is_empty() {
            return Err("question text must not be empty".to_string());
        }
        if input.options.len() < 2 {
            return Err("question must have at least two options".to_string());
        }
        if input.correct_answer >= input.options.len() {
            return Err("correctAnswer index out of range".to_string());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            text: input.text,
            options: input.options,
            correct_answer: input.correct_answer,
            time_limit_secs: input.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS),
            category: input.category,
        })
    }

    pub fn view(&self, question_number: usize, total_questions: usize) -> QuestionView {
        QuestionView {
            id: self.id,
            text: self.text.clone(),
            options: self.options.clone(),
            time_limit_secs: self.time_limit_secs,
            category: self.category.clone(),
            question_number,
            total_questions,
        }
    }
}

/// The client-safe projection of a `Question`: no `correct_answer`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "timeLimit")]
    pub time_limit_secs: u32,
    pub category: Option<String>,
    /// 1-based position of this question in the session's list, snapshotted
    /// at broadcast time (spec.md §9.4 / SPEC_FULL.md Open Question 4).
    pub question_number: usize,
    pub total_questions: usize,
}
