//! Required-question gate run before every submission attempt.

use crate::answer::AnswerCollector;
use crate::schema::Form;

/// Ids of required questions that have no present answer, in form order.
///
/// An empty result means the form may be submitted. Presence does not depend
/// on the question type: a yes/no answer of "No" (`value = 0`) counts.
pub fn validate(form: &Form, answers: &AnswerCollector) -> Vec<String> {
    form.required_questions()
        .filter(|q| !answers.is_present(q.id()))
        .map(|q| q.id().to_string())
        .collect()
}
