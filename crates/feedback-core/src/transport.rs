//! The seam between a form session and whatever delivers submissions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Effect, Event, FormSession};
use crate::submission::Submission;

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Response id assigned by the server, when it reports one.
    pub id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Delivers a submission for a form.
///
/// The error's `Display` text is what the user sees, so implementations
/// should surface the server's message when there is one.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn submit(
        &self,
        form_id: &str,
        submission: &Submission,
    ) -> Result<SubmitReceipt, Self::Error>;
}

/// Run one submit attempt: gate it through the session, send at most one
/// request, and fold the outcome back into the session.
pub async fn drive_submit<T>(session: FormSession, transport: &T) -> FormSession
where
    T: SubmitTransport + ?Sized,
{
    let (session, effect) = session.apply(Event::SubmitRequested);
    let Some(Effect::Submit(request)) = effect else {
        return session;
    };

    let event = match transport.submit(&request.form_id, &request.submission).await {
        Ok(receipt) => Event::SubmitSucceeded {
            ticket: request.ticket,
            receipt,
        },
        Err(e) => Event::SubmitFailed {
            ticket: request.ticket,
            message: Some(e.to_string()),
        },
    };
    session.apply(event).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Response;
    use crate::schema::{Form, Question, QuestionKind};
    use crate::session::Phase;
    use crate::SessionError;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct Rejected(String);

    /// Records every submission and answers with a fixed outcome.
    struct Recorder {
        calls: Mutex<Vec<(String, Submission)>>,
        reject_with: Option<String>,
    }

    impl Recorder {
        fn accepting() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reject_with: None,
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reject_with: Some(message.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SubmitTransport for Recorder {
        type Error = Rejected;

        async fn submit(
            &self,
            form_id: &str,
            submission: &Submission,
        ) -> Result<SubmitReceipt, Self::Error> {
            self.calls
                .lock()
                .unwrap()
                .push((form_id.to_string(), submission.clone()));
            match &self.reject_with {
                Some(message) => Err(Rejected(message.clone())),
                None => Ok(SubmitReceipt {
                    id: Some("resp-1".into()),
                    submitted_at: Utc::now(),
                }),
            }
        }
    }

    fn session() -> FormSession {
        let form = Form::new(
            "f-9",
            "Lab feedback",
            None,
            true,
            vec![Question::new("yn", "Were labs useful?", QuestionKind::YesNo)],
        )
        .unwrap();
        FormSession::new(Arc::new(form))
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_transport() {
        let transport = Recorder::accepting();
        let s = drive_submit(session(), &transport).await;
        assert_eq!(transport.call_count(), 0);
        assert!(matches!(s.error(), Some(SessionError::MissingRequired(_))));
    }

    #[tokio::test]
    async fn accepted_submission_settles_the_session() {
        let transport = Recorder::accepting();
        let (s, _) = session().apply(Event::answered("yn", Response::YesNo(false)));
        let s = drive_submit(s, &transport).await;

        assert_eq!(transport.call_count(), 1);
        let calls = transport.calls.lock().unwrap();
        let (form_id, submission) = &calls[0];
        assert_eq!(form_id, "f-9");
        assert!(submission.is_anonymous);
        assert_eq!(submission.answers[0].value, Some(0));
        assert_eq!(s.receipt().and_then(|r| r.id.as_deref()), Some("resp-1"));
    }

    #[tokio::test]
    async fn rejection_surfaces_the_server_message() {
        let transport = Recorder::rejecting("Form not found or inactive");
        let (s, _) = session().apply(Event::answered("yn", Response::YesNo(true)));
        let s = drive_submit(s, &transport).await;

        assert_eq!(s.phase(), &Phase::Editing);
        assert_eq!(
            s.error(),
            Some(&SessionError::Transport("Form not found or inactive".into()))
        );
        assert_eq!(s.answers().len(), 1);

        let s = drive_submit(s, &transport).await;
        assert_eq!(transport.call_count(), 2, "retry after failure is allowed");
        assert!(s.can_submit());
    }

    #[tokio::test]
    async fn in_flight_session_does_not_submit_again() {
        let transport = Recorder::accepting();
        let (s, _) = session().apply(Event::answered("yn", Response::YesNo(true)));
        let (s, first) = s.apply(Event::SubmitRequested);
        assert!(first.is_some());

        let s = drive_submit(s, &transport).await;
        assert_eq!(transport.call_count(), 0);
        assert!(s.is_submitting());
    }
}
