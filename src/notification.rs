//! Terminal notifications
//!
//! Renders the submit banner and the form itself for the shell and the
//! one-shot CLI. Everything writes to a caller-supplied `Write` so output can
//! be captured.

use std::io::{self, Write};

use crate::error::SubmissionError;
use crate::form::{FormField, FormState, MessageKind, SubmitMessage};

/// Send a notification to the user
pub fn send_notification(out: &mut impl Write, title: &str, body: &str) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    if !body.is_empty() {
        writeln!(out, "  {}", body)?;
    }
    Ok(())
}

/// Render the banner left by the last submit, if any.
pub fn notify_message(out: &mut impl Write, message: &SubmitMessage) -> io::Result<()> {
    let title = match message.kind {
        MessageKind::Success => "✔ Work log submitted",
        MessageKind::Error => "✖ Work log not submitted",
    };
    send_notification(out, title, &message.text)
}

/// Explain a failed submit, with what to do next.
pub fn notify_submit_error(out: &mut impl Write, err: &SubmissionError) -> io::Result<()> {
    let title = if err.requires_user_action() {
        "✖ Missing information"
    } else if err.is_retryable() {
        "✖ Work log not submitted"
    } else {
        "Submitting..."
    };
    let body = format!("{} {}", err.user_message(), err.recovery_suggestion());
    send_notification(out, title, &body)
}

/// Print the form with required markers, then the banner.
pub fn render_form(out: &mut impl Write, form: &FormState) -> io::Result<()> {
    for field in FormField::ALL {
        let marker = if field.is_required() { "*" } else { " " };
        let value = form
            .display_value(field)
            .unwrap_or_else(|| "—".to_string());
        writeln!(out, "  {:<14}{} {}", field.label(), marker, value)?;
    }
    if form.is_submitting() {
        writeln!(out, "Submitting...")?;
    } else if let Some(message) = form.message() {
        notify_message(out, message)?;
    }
    Ok(())
}
