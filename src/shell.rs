//! Interactive form shell.
//!
//! Reads one command per line and drives the same form state and submit flow
//! as the one-shot CLI. Errors are printed and the session carries on.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::{self, FormCommand, HELP_TEXT};
use crate::form::FieldUpdate;
use crate::notification::{notify_message, notify_submit_error, render_form};
use crate::state::AppState;
use crate::submission;
use crate::webhook::WebhookTransport;

const PROMPT: &str = "worklog> ";

pub async fn run_shell<R, W>(
    state: &AppState,
    transport: &dyn WebhookTransport,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "JustSearch · Employee Work Tracker")?;
    writeln!(out, "Entries are sent to {}", state.config.webhook_url)?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let today = chrono::Local::now().date_naive();
        let command = match commands::parse_command(&line, today) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        if !execute(state, transport, command, out).await? {
            break;
        }
    }
    Ok(())
}

/// Run one command. Returns false when the session should end.
async fn execute<W: Write>(
    state: &AppState,
    transport: &dyn WebhookTransport,
    command: FormCommand,
    out: &mut W,
) -> io::Result<bool> {
    match command {
        FormCommand::Set(update) => {
            let field = update.field();
            commands::set_field(state, update);
            let value = state.form.lock().display_value(field);
            writeln!(out, "{}: {}", field.label(), value.unwrap_or_default())?;
        }
        FormCommand::Clear(field) => {
            commands::set_field(state, FieldUpdate::cleared(field));
            writeln!(out, "{} cleared", field.label())?;
        }
        FormCommand::Show { json: true } => {
            let snapshot = commands::get_form_snapshot(state);
            let text = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
            writeln!(out, "{}", text)?;
        }
        FormCommand::Show { json: false } => {
            let form = state.form.lock().clone();
            render_form(out, &form)?;
        }
        FormCommand::Submit => {
            writeln!(out, "Submitting...")?;
            match submission::submit_work_log(state, transport).await {
                Ok(()) => {
                    let message = state.form.lock().message().cloned();
                    if let Some(message) = message {
                        notify_message(out, &message)?;
                    }
                }
                Err(e) => notify_submit_error(out, &e)?,
            }
        }
        FormCommand::Executives => {
            for (id, name) in commands::list_executives() {
                writeln!(out, "  {}  {}", id, name)?;
            }
        }
        FormCommand::Statuses => {
            for (id, label) in commands::list_statuses() {
                writeln!(out, "  {:<12} {}", id, label)?;
            }
        }
        FormCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
        FormCommand::Quit => return Ok(false),
    }
    Ok(true)
}
