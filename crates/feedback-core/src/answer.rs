//! Answers and the per-session answer collector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::AnswerError;
use crate::schema::{Question, QuestionKind, QuestionType};

pub const YES_LABEL: &str = "Yes";
pub const NO_LABEL: &str = "No";

/// The current response to one question.
///
/// The meaning of `text` and `value` depends on the question type; see
/// [`Question::answer`] for the shape each type produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub text: Option<String>,
    pub value: Option<i64>,
}

impl Answer {
    /// The sentinel returned for a question nobody has answered yet.
    pub fn empty(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            text: None,
            value: None,
        }
    }

    /// Presence rule: non-empty text, or any defined value (including 0).
    pub fn is_present(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty()) || self.value.is_some()
    }
}

/// A typed user response, as produced by one input widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Text(String),
    Rating(u8),
    Scale(i64),
    YesNo(bool),
    Choice(String),
}

impl Question {
    /// Convert a widget response into the answer shape for this question.
    ///
    /// | type            | `text`            | `value`   |
    /// |-----------------|-------------------|-----------|
    /// | text            | response          | `None`    |
    /// | rating          | value as string   | `1..=5`   |
    /// | scale           | value as string   | min..=max |
    /// | yes/no          | `"Yes"` / `"No"`  | `1` / `0` |
    /// | multiple choice | selected option   | `None`    |
    pub fn answer(&self, response: Response) -> Result<Answer, AnswerError> {
        let id = self.id().to_string();
        let (text, value) = match (self.kind(), response) {
            (QuestionKind::Text, Response::Text(text)) => (Some(text), None),
            (QuestionKind::Rating, Response::Rating(rating)) => {
                if !(1..=5).contains(&rating) {
                    return Err(AnswerError::RatingOutOfRange {
                        question_id: id,
                        rating,
                    });
                }
                (Some(rating.to_string()), Some(i64::from(rating)))
            }
            (QuestionKind::Scale(opts), Response::Scale(value)) => {
                if !opts.contains(value) {
                    return Err(AnswerError::ScaleOutOfRange {
                        question_id: id,
                        value,
                        min: opts.min,
                        max: opts.max,
                    });
                }
                (Some(value.to_string()), Some(value))
            }
            (QuestionKind::YesNo, Response::YesNo(yes)) => {
                let label = if yes { YES_LABEL } else { NO_LABEL };
                (Some(label.to_string()), Some(i64::from(yes)))
            }
            (QuestionKind::MultipleChoice(choices), Response::Choice(choice)) => {
                if !choices.contains(&choice) {
                    return Err(AnswerError::UnknownChoice {
                        question_id: id,
                        choice,
                    });
                }
                (Some(choice), None)
            }
            (kind, _) => {
                return Err(AnswerError::KindMismatch {
                    question_id: id,
                    expected: kind.question_type(),
                });
            }
        };

        Ok(Answer {
            question_id: id,
            text,
            value,
        })
    }

    /// Recover the typed response from a stored answer, if it still fits.
    pub fn response_of(&self, answer: &Answer) -> Option<Response> {
        match self.question_type() {
            QuestionType::Text => answer.text.clone().map(Response::Text),
            QuestionType::Rating => answer
                .value
                .and_then(|v| u8::try_from(v).ok())
                .map(Response::Rating),
            QuestionType::Scale => answer.value.map(Response::Scale),
            QuestionType::YesNo => answer.value.map(|v| Response::YesNo(v != 0)),
            QuestionType::MultipleChoice => answer.text.clone().map(Response::Choice),
        }
    }
}

/// Per-session mapping from question id to the current answer.
///
/// Keyed in id order so that iteration, and therefore submission assembly,
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerCollector {
    answers: BTreeMap<String, Answer>,
}

impl AnswerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the answer for `question_id`. Never merges with a previous answer.
    pub fn set_answer(
        &mut self,
        question_id: impl Into<String>,
        text: Option<String>,
        value: Option<i64>,
    ) {
        let question_id = question_id.into();
        let answer = Answer {
            question_id: question_id.clone(),
            text,
            value,
        };
        self.answers.insert(question_id, answer);
    }

    /// The current answer, or [`Answer::empty`] if none was recorded.
    pub fn get_answer(&self, question_id: &str) -> Answer {
        self.answers
            .get(question_id)
            .cloned()
            .unwrap_or_else(|| Answer::empty(question_id))
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn is_present(&self, question_id: &str) -> bool {
        self.answer(question_id).is_some_and(Answer::is_present)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.values()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScaleOptions;

    fn choices() -> Question {
        Question::new(
            "mc",
            "Most valuable?",
            QuestionKind::MultipleChoice(vec!["Labs".into(), "Lectures".into()]),
        )
    }

    #[test]
    fn set_answer_overwrites_instead_of_merging() {
        let mut answers = AnswerCollector::new();
        answers.set_answer("q", Some("4".into()), Some(4));
        answers.set_answer("q", None, Some(2));

        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get_answer("q"), Answer {
            question_id: "q".into(),
            text: None,
            value: Some(2),
        });
    }

    #[test]
    fn get_answer_returns_empty_sentinel() {
        let answers = AnswerCollector::new();
        let a = answers.get_answer("missing");
        assert_eq!(a, Answer::empty("missing"));
        assert!(!a.is_present());
    }

    #[test]
    fn presence_is_text_or_value() {
        let mut a = Answer::empty("q");
        assert!(!a.is_present());

        a.text = Some(String::new());
        assert!(!a.is_present());

        a.value = Some(0);
        assert!(a.is_present(), "a zero value is still a defined value");

        a.value = None;
        a.text = Some("hello".into());
        assert!(a.is_present());
    }

    #[test]
    fn rating_mirrors_value_into_text() {
        let q = Question::new("r", "Rate", QuestionKind::Rating);
        let a = q.answer(Response::Rating(4)).unwrap();
        assert_eq!(a.text.as_deref(), Some("4"));
        assert_eq!(a.value, Some(4));

        assert!(matches!(
            q.answer(Response::Rating(0)),
            Err(AnswerError::RatingOutOfRange { rating: 0, .. })
        ));
        assert!(matches!(
            q.answer(Response::Rating(6)),
            Err(AnswerError::RatingOutOfRange { rating: 6, .. })
        ));
    }

    #[test]
    fn scale_respects_its_range() {
        let q = Question::new("s", "Pace", QuestionKind::Scale(ScaleOptions::new(0, 4)));
        let a = q.answer(Response::Scale(0)).unwrap();
        assert_eq!(a.value, Some(0));
        assert_eq!(a.text.as_deref(), Some("0"));

        assert_eq!(
            q.answer(Response::Scale(5)).unwrap_err(),
            AnswerError::ScaleOutOfRange {
                question_id: "s".into(),
                value: 5,
                min: 0,
                max: 4,
            }
        );
    }

    #[test]
    fn yes_no_uses_canonical_values() {
        let q = Question::new("yn", "Organised?", QuestionKind::YesNo);
        let yes = q.answer(Response::YesNo(true)).unwrap();
        let no = q.answer(Response::YesNo(false)).unwrap();
        assert_eq!((yes.text.as_deref(), yes.value), (Some("Yes"), Some(1)));
        assert_eq!((no.text.as_deref(), no.value), (Some("No"), Some(0)));
        assert!(no.is_present());
    }

    #[test]
    fn multiple_choice_keeps_value_null() {
        let q = choices();
        let a = q.answer(Response::Choice("Labs".into())).unwrap();
        assert_eq!(a.text.as_deref(), Some("Labs"));
        assert_eq!(a.value, None);

        assert!(matches!(
            q.answer(Response::Choice("Exams".into())),
            Err(AnswerError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn text_keeps_value_null() {
        let q = Question::new("t", "Comments", QuestionKind::Text);
        let a = q.answer(Response::Text("More examples".into())).unwrap();
        assert_eq!(a.value, None);
        assert_eq!(a.text.as_deref(), Some("More examples"));
    }

    #[test]
    fn mismatched_response_is_rejected() {
        let q = choices();
        assert_eq!(
            q.answer(Response::Rating(3)).unwrap_err(),
            AnswerError::KindMismatch {
                question_id: "mc".into(),
                expected: QuestionType::MultipleChoice,
            }
        );
    }

    #[test]
    fn response_of_recovers_the_widget_state() {
        let q = Question::new("yn", "Organised?", QuestionKind::YesNo);
        let a = q.answer(Response::YesNo(false)).unwrap();
        assert_eq!(q.response_of(&a), Some(Response::YesNo(false)));
        assert_eq!(q.response_of(&Answer::empty("yn")), None);
    }

    #[test]
    fn answer_serializes_null_value() {
        let a = Answer {
            question_id: "t".into(),
            text: Some("hi".into()),
            value: None,
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"question_id": "t", "text": "hi", "value": null})
        );
    }
}
