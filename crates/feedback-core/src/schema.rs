//! Form schema model and its wire decoding.
//!
//! A [`Form`] is an immutable, ordered list of [`Question`]s. Each question
//! carries a closed [`QuestionKind`] that decides its input widget, the shape
//! of its stored answer, and which options are meaningful.
//!
//! Decoding from the `GET /forms/{id}` payload is the load boundary: anything
//! that would break the engine's invariants (duplicate ids, an empty choice
//! list, an inverted scale) fails the load with a [`SchemaError`].

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// Tag of a question's kind, without its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Rating,
    Scale,
    YesNo,
    MultipleChoice,
}

impl QuestionType {
    /// Wire name, as used in `question_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rating => "rating",
            Self::Scale => "scale",
            Self::YesNo => "yes_no",
            Self::MultipleChoice => "multiple_choice",
        }
    }

    /// Badge text shown next to a question.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rating => "rating",
            Self::Scale => "scale",
            Self::YesNo => "yes no",
            Self::MultipleChoice => "multiple choice",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "rating" => Ok(Self::Rating),
            "scale" => Ok(Self::Scale),
            "yes_no" => Ok(Self::YesNo),
            "multiple_choice" => Ok(Self::MultipleChoice),
            other => Err(SchemaError::UnknownQuestionType(other.to_string())),
        }
    }
}

/// Options of a `scale` question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleOptions {
    pub min: i64,
    pub max: i64,
    pub low_label: Option<String>,
    pub high_label: Option<String>,
}

impl ScaleOptions {
    pub const DEFAULT_MIN: i64 = 1;
    pub const DEFAULT_MAX: i64 = 10;

    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            low_label: None,
            high_label: None,
        }
    }

    pub fn with_labels(mut self, low: impl Into<String>, high: impl Into<String>) -> Self {
        self.low_label = Some(low.into());
        self.high_label = Some(high.into());
        self
    }

    pub fn range(&self) -> RangeInclusive<i64> {
        self.min..=self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        self.range().contains(&value)
    }

    /// Caption for the low end: the label if present, otherwise the number.
    pub fn low_caption(&self) -> String {
        self.low_label.clone().unwrap_or_else(|| self.min.to_string())
    }

    /// Caption for the high end: the label if present, otherwise the number.
    pub fn high_caption(&self) -> String {
        self.high_label.clone().unwrap_or_else(|| self.max.to_string())
    }
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

/// What a question asks for. Options live only on the variants that use them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Text,
    /// Five-star rating, `1..=5`.
    Rating,
    Scale(ScaleOptions),
    YesNo,
    /// Single selection from a non-empty ordered list.
    MultipleChoice(Vec<String>),
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text => QuestionType::Text,
            Self::Rating => QuestionType::Rating,
            Self::Scale(_) => QuestionType::Scale,
            Self::YesNo => QuestionType::YesNo,
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
        }
    }
}

/// One item in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: String,
    prompt: String,
    is_required: bool,
    kind: QuestionKind,
}

impl Question {
    /// Create a required question.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            is_required: true,
            kind,
        }
    }

    pub fn with_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    fn check(&self) -> Result<(), SchemaError> {
        match &self.kind {
            QuestionKind::Text | QuestionKind::Rating | QuestionKind::YesNo => Ok(()),
            QuestionKind::Scale(opts) if opts.min >= opts.max => Err(invalid_options(
                &self.id,
                format!("scale min {} must be below max {}", opts.min, opts.max),
            )),
            QuestionKind::Scale(_) => Ok(()),
            QuestionKind::MultipleChoice(choices) if choices.is_empty() => Err(invalid_options(
                &self.id,
                "multiple choice question has no options".to_string(),
            )),
            QuestionKind::MultipleChoice(_) => Ok(()),
        }
    }
}

/// A named, ordered set of questions with an anonymity default.
///
/// Immutable once built: there is no way to add, remove, or edit questions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireForm")]
pub struct Form {
    id: String,
    title: String,
    description: Option<String>,
    is_anonymous_default: bool,
    questions: Vec<Question>,
}

impl Form {
    /// Build a form, rejecting duplicate question ids and malformed options.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        is_anonymous_default: bool,
        questions: Vec<Question>,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id.as_str()) {
                return Err(SchemaError::DuplicateQuestion(q.id.clone()));
            }
            q.check()?;
        }

        Ok(Self {
            id: id.into(),
            title: title.into(),
            description,
            is_anonymous_default,
            questions,
        })
    }

    /// Decode the `GET /forms/{id}` response body.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let wire: WireForm = serde_json::from_str(json)?;
        Self::try_from(wire)
    }

    /// Decode the `GET /forms/{id}` response body from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        let wire: WireForm = serde_json::from_slice(bytes)?;
        Self::try_from(wire)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_anonymous_default(&self) -> bool {
        self.is_anonymous_default
    }

    /// Questions in display order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn required_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_required)
    }
}

fn invalid_options(question_id: &str, reason: String) -> SchemaError {
    SchemaError::InvalidOptions {
        question_id: question_id.to_string(),
        reason,
    }
}

// ── Wire format ──

/// The backend stores booleans as SQLite integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
        }
    }
}

#[derive(Deserialize)]
struct WireForm {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_anonymous: Option<Flag>,
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Deserialize)]
struct WireQuestion {
    id: String,
    question_text: String,
    question_type: String,
    #[serde(default)]
    is_required: Option<Flag>,
    #[serde(default)]
    options: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireScale {
    #[serde(default)]
    min: Option<i64>,
    #[serde(default)]
    max: Option<i64>,
    /// `[low, high]`; either end may be missing.
    #[serde(default)]
    labels: Vec<Option<String>>,
}

impl TryFrom<WireForm> for Form {
    type Error = SchemaError;

    fn try_from(wire: WireForm) -> Result<Self, Self::Error> {
        let questions = wire
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Form::new(
            wire.id,
            wire.title,
            wire.description.filter(|d| !d.is_empty()),
            wire.is_anonymous.is_some_and(|f| f.is_set()),
            questions,
        )
    }
}

impl TryFrom<WireQuestion> for Question {
    type Error = SchemaError;

    fn try_from(wire: WireQuestion) -> Result<Self, Self::Error> {
        let question_type: QuestionType = wire.question_type.parse()?;
        let kind = match question_type {
            QuestionType::Text => QuestionKind::Text,
            QuestionType::Rating => QuestionKind::Rating,
            QuestionType::Scale => QuestionKind::Scale(scale_options(&wire.id, wire.options)?),
            QuestionType::YesNo => QuestionKind::YesNo,
            QuestionType::MultipleChoice => {
                QuestionKind::MultipleChoice(choice_options(&wire.id, wire.options)?)
            }
        };

        Ok(Question {
            id: wire.id,
            prompt: wire.question_text,
            // Column default is 1.
            is_required: wire.is_required.is_none_or(|f| f.is_set()),
            kind,
        })
    }
}

fn scale_options(
    question_id: &str,
    options: Option<serde_json::Value>,
) -> Result<ScaleOptions, SchemaError> {
    let Some(value) = options else {
        return Ok(ScaleOptions::default());
    };
    let wire: WireScale = serde_json::from_value(value)
        .map_err(|e| invalid_options(question_id, format!("scale options: {e}")))?;

    let mut labels = wire
        .labels
        .into_iter()
        .map(|l| l.filter(|s| !s.is_empty()));

    Ok(ScaleOptions {
        min: wire.min.unwrap_or(ScaleOptions::DEFAULT_MIN),
        max: wire.max.unwrap_or(ScaleOptions::DEFAULT_MAX),
        low_label: labels.next().flatten(),
        high_label: labels.next().flatten(),
    })
}

fn choice_options(
    question_id: &str,
    options: Option<serde_json::Value>,
) -> Result<Vec<String>, SchemaError> {
    let not_a_list =
        || invalid_options(question_id, "options must be a list of strings".to_string());

    let Some(serde_json::Value::Array(items)) = options else {
        return Err(not_a_list());
    };
    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::String(s) => Ok(s),
            _ => Err(not_a_list()),
        })
        .collect()
}
