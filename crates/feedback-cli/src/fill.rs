//! `form fill`: collect answers from a file or stdin, then submit through a
//! form session.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use feedback_core::{
    Event, Form, FormSession, Phase, Question, QuestionKind, Response, SessionError, drive_submit,
};
use feedback_sync::ApiClient;
use serde_json::Value;
use tracing::info;

use crate::display;

pub async fn run(
    client: &ApiClient,
    form_id: &str,
    answers_file: Option<&Path>,
    anonymous: Option<bool>,
) -> anyhow::Result<()> {
    let form = Arc::new(client.get_form(form_id).await?);
    let mut session = FormSession::new(Arc::clone(&form));
    if let Some(on) = anonymous {
        session = session.apply(Event::AnonymityToggled(on)).0;
    }

    session = match answers_file {
        Some(path) => apply_all(session, load_answers(path, &form)?)?,
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            prompt(session, &form, stdin.lock(), stdout.lock())?
        }
    };

    let session = drive_submit(session, client).await;
    report(&session)
}

/// Read `{question_id: response}` and type each response by its question.
/// `null` entries are skipped.
pub fn load_answers(path: &Path, form: &Form) -> anyhow::Result<Vec<(String, Response)>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let entries: serde_json::Map<String, Value> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let mut responses = Vec::with_capacity(entries.len());
    for (id, value) in entries {
        if value.is_null() {
            continue;
        }
        let question = form
            .question(&id)
            .ok_or_else(|| anyhow!("form has no question `{id}`"))?;
        responses.push((id, response_from_json(question, &value)?));
    }
    info!(path = %path.display(), answers = responses.len(), "loaded answers file");
    Ok(responses)
}

pub fn response_from_json(question: &Question, value: &Value) -> anyhow::Result<Response> {
    let mismatch = || {
        anyhow!(
            "question `{}` expects a {} answer, got {value}",
            question.id(),
            question.question_type().label()
        )
    };
    match (question.kind(), value) {
        (_, Value::String(s)) => parse_input(question, s),
        (QuestionKind::Rating, Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(Response::Rating)
            .ok_or_else(mismatch),
        (QuestionKind::Scale(_), Value::Number(n)) => {
            n.as_i64().map(Response::Scale).ok_or_else(mismatch)
        }
        (QuestionKind::YesNo, Value::Bool(b)) => Ok(Response::YesNo(*b)),
        _ => Err(mismatch()),
    }
}

/// Parse one typed line. Range checks are left to the session.
pub fn parse_input(question: &Question, raw: &str) -> anyhow::Result<Response> {
    let raw = raw.trim();
    match question.kind() {
        QuestionKind::Text => Ok(Response::Text(raw.to_string())),
        QuestionKind::Rating => raw
            .parse::<u8>()
            .map(Response::Rating)
            .map_err(|_| anyhow!("enter a rating from 1 to 5")),
        QuestionKind::Scale(opts) => raw
            .parse::<i64>()
            .map(Response::Scale)
            .map_err(|_| anyhow!("enter a number from {} to {}", opts.min, opts.max)),
        QuestionKind::YesNo => match raw.to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok(Response::YesNo(true)),
            "n" | "no" | "false" | "0" => Ok(Response::YesNo(false)),
            _ => bail!("answer yes or no"),
        },
        QuestionKind::MultipleChoice(choices) => {
            if choices.iter().any(|c| c == raw) {
                return Ok(Response::Choice(raw.to_string()));
            }
            raw.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| choices.get(i))
                .map(|c| Response::Choice(c.clone()))
                .ok_or_else(|| anyhow!("pick an option from 1 to {}", choices.len()))
        }
    }
}

fn apply_all(
    mut session: FormSession,
    responses: Vec<(String, Response)>,
) -> anyhow::Result<FormSession> {
    for (id, response) in responses {
        session = session.apply(Event::answered(id, response)).0;
        if let Some(SessionError::InvalidAnswer(e)) = session.error() {
            return Err(e.clone().into());
        }
    }
    Ok(session)
}

/// Ask each question in turn. A blank line skips; EOF stops asking.
pub fn prompt<R: BufRead, W: Write>(
    mut session: FormSession,
    form: &Form,
    mut input: R,
    mut out: W,
) -> anyhow::Result<FormSession> {
    writeln!(out, "=== {} ===", form.title())?;
    if let Some(description) = form.description() {
        writeln!(out, "{description}")?;
    }
    writeln!(out, "(press Enter to skip a question)")?;

    let mut line = String::new();
    for (i, q) in form.questions().iter().enumerate() {
        let badge = q.question_type().label();
        writeln!(out)?;
        writeln!(out, "{}", display::question_heading(i + 1, q.prompt(), q.is_required(), badge))?;
        if let Some(hint) = hint(q.kind()) {
            writeln!(out, "    {hint}")?;
        }

        loop {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(session);
            }
            if line.trim().is_empty() {
                break;
            }
            let response = match parse_input(q, &line) {
                Ok(r) => r,
                Err(e) => {
                    writeln!(out, "    {e}")?;
                    continue;
                }
            };
            session = session.apply(Event::answered(q.id(), response)).0;
            match session.error() {
                Some(SessionError::InvalidAnswer(e)) => writeln!(out, "    {e}")?,
                _ => break,
            }
        }
    }
    Ok(session)
}

fn hint(kind: &QuestionKind) -> Option<String> {
    match kind {
        QuestionKind::Text => None,
        QuestionKind::Rating => Some("1-5".to_string()),
        QuestionKind::Scale(opts) => Some(format!(
            "{}-{} ({} .. {})",
            opts.min,
            opts.max,
            opts.low_caption(),
            opts.high_caption()
        )),
        QuestionKind::YesNo => Some("y/n".to_string()),
        QuestionKind::MultipleChoice(choices) => Some(
            choices
                .iter()
                .enumerate()
                .map(|(n, c)| format!("{}) {}", n + 1, c))
                .collect::<Vec<_>>()
                .join("  "),
        ),
    }
}

/// Print the outcome of a submit attempt; anything but success is an error.
fn report(session: &FormSession) -> anyhow::Result<()> {
    if let Phase::Submitted(receipt) = session.phase() {
        display::print_receipt(session.form(), receipt);
        return Ok(());
    }
    match session.error() {
        Some(SessionError::MissingRequired(ids)) => {
            eprintln!("Please answer all required questions:");
            for id in ids {
                let prompt = session.form().question(id).map_or(id.as_str(), |q| q.prompt());
                eprintln!("  - {prompt}");
            }
            bail!("{} required question(s) unanswered", ids.len())
        }
        Some(e) => Err(e.clone().into()),
        None => bail!("feedback was not submitted"),
    }
}
