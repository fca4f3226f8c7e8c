use thiserror::Error;

use crate::schema::QuestionType;

/// A form definition that cannot be admitted into the engine.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid form JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("unknown question type '{0}'")]
    UnknownQuestionType(String),

    #[error("question {question_id}: {reason}")]
    InvalidOptions { question_id: String, reason: String },
}

/// A response that does not fit the question it was given for.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnswerError {
    #[error("unknown question id: {0}")]
    UnknownQuestion(String),

    #[error("question {question_id} expects a {expected} response")]
    KindMismatch {
        question_id: String,
        expected: QuestionType,
    },

    #[error("question {question_id}: rating {rating} is outside 1..=5")]
    RatingOutOfRange { question_id: String, rating: u8 },

    #[error("question {question_id}: value {value} is outside {min}..={max}")]
    ScaleOutOfRange {
        question_id: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("question {question_id}: '{choice}' is not one of the offered options")]
    UnknownChoice { question_id: String, choice: String },
}

/// Errors surfaced to the user of a form session. None of them end the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("required questions unanswered: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error(transparent)]
    InvalidAnswer(#[from] AnswerError),

    #[error("{0}")]
    Transport(String),
}
