//! Submission payload assembly.

use serde::{Deserialize, Serialize};

use crate::answer::{Answer, AnswerCollector};

/// Body of `POST /forms/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub is_anonymous: bool,
    pub answers: Vec<Answer>,
}

/// Build the payload from every present answer in the collector.
///
/// Does not enforce required questions; run [`validate`](crate::validate) first.
pub fn assemble(answers: &AnswerCollector, is_anonymous: bool) -> Submission {
    Submission {
        is_anonymous,
        answers: answers.iter().filter(|a| a.is_present()).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_no_answer_with_zero_value() {
        let mut answers = AnswerCollector::new();
        answers.set_answer("yn", Some("No".into()), Some(0));

        let submission = assemble(&answers, false);
        assert_eq!(submission.answers.len(), 1);
        assert_eq!(submission.answers[0].value, Some(0));
    }

    #[test]
    fn drops_empty_answers() {
        let mut answers = AnswerCollector::new();
        answers.set_answer("blank", Some(String::new()), None);
        answers.set_answer("null", None, None);
        answers.set_answer("text", Some("fine".into()), None);
        answers.set_answer("rating", Some("5".into()), Some(5));

        let submission = assemble(&answers, true);
        assert!(submission.is_anonymous);
        let ids: Vec<&str> = submission
            .answers
            .iter()
            .map(|a| a.question_id.as_str())
            .collect();
        assert_eq!(ids, vec!["rating", "text"]);
        assert!(submission.answers.iter().all(Answer::is_present));
    }

    #[test]
    fn empty_collector_gives_empty_payload() {
        let submission = assemble(&AnswerCollector::new(), false);
        assert!(submission.answers.is_empty());
    }

    #[test]
    fn assemble_is_idempotent() {
        let mut answers = AnswerCollector::new();
        answers.set_answer("b", Some("Labs".into()), None);
        answers.set_answer("a", Some("3".into()), Some(3));
        assert_eq!(assemble(&answers, false), assemble(&answers, false));
    }

    #[test]
    fn serializes_to_the_submit_body() {
        let mut answers = AnswerCollector::new();
        answers.set_answer("q1", Some("4".into()), Some(4));
        answers.set_answer("q5", Some("More labs".into()), None);

        let json = serde_json::to_value(assemble(&answers, true)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "is_anonymous": true,
                "answers": [
                    {"question_id": "q1", "text": "4", "value": 4},
                    {"question_id": "q5", "text": "More labs", "value": null}
                ]
            })
        );
    }
}
