//! Per-view form session.
//!
//! All state of one open form view lives in a [`FormSession`] value and
//! changes only through [`FormSession::apply`], which maps `(state, event)` to
//! the next state plus at most one [`Effect`] for the caller to carry out.
//! The only effect is a submission; its outcome comes back as another event
//! tagged with the [`SubmitTicket`] it was issued under.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::answer::{AnswerCollector, Response};
use crate::schema::Form;
use crate::submission::{Submission, assemble};
use crate::transport::SubmitReceipt;
use crate::validate::validate;
use crate::{AnswerError, SessionError};

/// Shown when a submission fails without a message from the server.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit feedback. Please try again.";

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one in-flight submission. Unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitTicket(u64);

impl SubmitTicket {
    fn next() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// One submission is in flight; further submit requests are no-ops.
    Submitting(SubmitTicket),
    Submitted(SubmitReceipt),
    /// The view was left. Late results are dropped.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Answered {
        question_id: String,
        response: Response,
    },
    AnonymityToggled(bool),
    SubmitRequested,
    SubmitSucceeded {
        ticket: SubmitTicket,
        receipt: SubmitReceipt,
    },
    SubmitFailed {
        ticket: SubmitTicket,
        message: Option<String>,
    },
    Closed,
}

impl Event {
    pub fn answered(question_id: impl Into<String>, response: Response) -> Self {
        Self::Answered {
            question_id: question_id.into(),
            response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub ticket: SubmitTicket,
    pub form_id: String,
    pub submission: Submission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Submit(SubmitRequest),
}

/// State of one form view: its answers, anonymity choice, submit phase and
/// the last error to show.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: Arc<Form>,
    answers: AnswerCollector,
    is_anonymous: bool,
    phase: Phase,
    error: Option<SessionError>,
}

impl FormSession {
    /// Open a session with an empty collector and the form's anonymity default.
    pub fn new(form: Arc<Form>) -> Self {
        let is_anonymous = form.is_anonymous_default();
        Self {
            form,
            answers: AnswerCollector::new(),
            is_anonymous,
            phase: Phase::Editing,
            error: None,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn answers(&self) -> &AnswerCollector {
        &self.answers
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Editing
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn receipt(&self) -> Option<&SubmitReceipt> {
        match &self.phase {
            Phase::Submitted(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Required questions still lacking a present answer.
    pub fn missing_required(&self) -> Vec<String> {
        validate(&self.form, &self.answers)
    }

    pub fn apply(mut self, event: Event) -> (Self, Option<Effect>) {
        let effect = match event {
            Event::Answered {
                question_id,
                response,
            } => {
                self.record(&question_id, response);
                None
            }
            Event::AnonymityToggled(on) => {
                if self.accepts_input() {
                    self.is_anonymous = on;
                }
                None
            }
            Event::SubmitRequested => self.request_submit(),
            Event::SubmitSucceeded { ticket, receipt } => {
                self.finish(ticket, Ok(receipt));
                None
            }
            Event::SubmitFailed { ticket, message } => {
                self.finish(ticket, Err(message));
                None
            }
            Event::Closed => {
                debug!(form_id = %self.form.id(), "form session closed");
                self.phase = Phase::Closed;
                self.answers = AnswerCollector::new();
                None
            }
        };
        (self, effect)
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, Phase::Editing | Phase::Submitting(_))
    }

    fn record(&mut self, question_id: &str, response: Response) {
        if !self.accepts_input() {
            debug!(question_id, "ignoring answer for a finished session");
            return;
        }

        let answer = match self.form.question(question_id) {
            Some(q) => q.answer(response),
            None => Err(AnswerError::UnknownQuestion(question_id.to_string())),
        };
        match answer {
            Ok(a) => {
                self.answers.set_answer(a.question_id, a.text, a.value);
                if matches!(self.error, Some(SessionError::InvalidAnswer(_))) {
                    self.error = None;
                }
            }
            Err(e) => {
                warn!(form_id = %self.form.id(), error = %e, "rejected answer");
                self.error = Some(e.into());
            }
        }
    }

    fn request_submit(&mut self) -> Option<Effect> {
        match &self.phase {
            Phase::Editing => {}
            Phase::Submitting(ticket) => {
                debug!(?ticket, "submission already in flight");
                return None;
            }
            Phase::Submitted(_) | Phase::Closed => {
                debug!("session no longer accepts submissions");
                return None;
            }
        }

        let missing = validate(&self.form, &self.answers);
        if !missing.is_empty() {
            info!(
                form_id = %self.form.id(),
                missing = missing.len(),
                "submission blocked by unanswered required questions"
            );
            self.error = Some(SessionError::MissingRequired(missing));
            return None;
        }

        let ticket = SubmitTicket::next();
        let submission = assemble(&self.answers, self.is_anonymous);
        info!(
            form_id = %self.form.id(),
            answers = submission.answers.len(),
            anonymous = submission.is_anonymous,
            "submitting feedback"
        );
        self.phase = Phase::Submitting(ticket);
        self.error = None;

        Some(Effect::Submit(SubmitRequest {
            ticket,
            form_id: self.form.id().to_string(),
            submission,
        }))
    }

    fn finish(&mut self, ticket: SubmitTicket, result: Result<SubmitReceipt, Option<String>>) {
        if self.phase != Phase::Submitting(ticket) {
            debug!(?ticket, "dropping stale submission result");
            return;
        }

        match result {
            Ok(receipt) => {
                info!(form_id = %self.form.id(), "feedback submitted");
                self.answers = AnswerCollector::new();
                self.error = None;
                self.phase = Phase::Submitted(receipt);
            }
            Err(message) => {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_SUBMIT_FAILURE.to_string());
                warn!(form_id = %self.form.id(), error = %message, "submission failed");
                self.error = Some(SessionError::Transport(message));
                self.phase = Phase::Editing;
            }
        }
    }
}
