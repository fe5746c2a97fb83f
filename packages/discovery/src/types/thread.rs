//! Structured summary of a discussion thread.
//!
//! The serialized form doubles as the prompt payload and the task's audit
//! snapshot, so the field names are fixed in camelCase.

use serde::{Deserialize, Serialize};

/// A reply by the thread author, paired with the comment it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Body of the nearest shallower comment; empty when none qualifies
    pub question: String,
    pub answer: String,
}

impl QuestionAnswer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Main narrative of a thread plus the author's question/answer pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedThread {
    pub main_comment: String,
    pub question_answers: Vec<QuestionAnswer>,
}

impl ExtractedThread {
    pub fn new(main_comment: impl Into<String>) -> Self {
        Self {
            main_comment: main_comment.into(),
            question_answers: Vec::new(),
        }
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.question_answers.push(QuestionAnswer::new(question, answer));
        self
    }

    /// Serialize to the JSON text substituted into the prompt.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
