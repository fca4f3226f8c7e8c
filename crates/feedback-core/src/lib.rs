//! Schema-driven feedback forms: schema model, answer collection, validation,
//! submission assembly, and the per-view form session.

pub mod answer;
mod error;
pub mod schema;
pub mod session;
pub mod submission;
pub mod transport;
pub mod validate;

pub use answer::{Answer, AnswerCollector, NO_LABEL, Response, YES_LABEL};
pub use error::{AnswerError, SchemaError, SessionError};
pub use schema::{Form, Question, QuestionKind, QuestionType, ScaleOptions};
pub use session::{Effect, Event, FormSession, Phase, SubmitRequest, SubmitTicket};
pub use submission::{Submission, assemble};
pub use transport::{SubmitReceipt, SubmitTransport, drive_submit};
pub use validate::validate;
