//! Form commands.
//!
//! Text input from the shell and the one-shot CLI is parsed here into typed
//! field updates. The executive and status lists are closed: anything outside
//! them is rejected before it reaches the form.

use chrono::NaiveDate;

use crate::form::{FieldUpdate, FormField, FormSnapshot};
use crate::state::AppState;
use crate::types::{Executive, UnknownOption, WorkStatus, PAYLOAD_DATE_FORMAT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown field '{0}'. Fields: date, executive, company, product, status, delivery-date, comments, website")]
    UnknownField(String),
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    UnknownCommand(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid date '{0}'. Use yyyy-MM-dd or 'today'.")]
    InvalidDate(String),
    #[error(transparent)]
    UnknownOption(#[from] UnknownOption),
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Set(FieldUpdate),
    Clear(FormField),
    Show { json: bool },
    Submit,
    Executives,
    Statuses,
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  set <field> <value>   Fill in a field
  clear <field>         Empty a field
  show [--json]         Show the form
  submit                Send the work log
  executives            List executives
  statuses              List statuses
  help                  Show this help
  quit                  Leave

Fields: date*, executive*, company*, product*, status*, delivery-date,
        comments, website*   (* required)
Dates:  yyyy-MM-dd or 'today'";

/// `yyyy-MM-dd`, or `today` relative to the caller's date.
pub fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, PAYLOAD_DATE_FORMAT)
        .map_err(|_| CommandError::InvalidDate(raw.to_string()))
}

/// Parse a raw value for `field`.
///
/// Free text is stored exactly as given and only an empty value clears it.
/// Dates and list options are matched after trimming.
pub fn parse_field_update(
    field: FormField,
    raw: &str,
    today: NaiveDate,
) -> Result<FieldUpdate, CommandError> {
    let update = match field {
        FormField::Company => FieldUpdate::Company(raw.to_string()),
        FormField::Product => FieldUpdate::Product(raw.to_string()),
        FormField::Comments => FieldUpdate::Comments(raw.to_string()),
        FormField::WebsiteLink => FieldUpdate::WebsiteLink(raw.to_string()),
        _ if raw.trim().is_empty() => FieldUpdate::cleared(field),
        FormField::Date => FieldUpdate::Date(Some(parse_date(raw, today)?)),
        FormField::Executive => FieldUpdate::Executive(Some(raw.trim().parse::<Executive>()?)),
        FormField::Status => FieldUpdate::Status(Some(raw.trim().parse::<WorkStatus>()?)),
        FormField::DeliveryDate => FieldUpdate::DeliveryDate(Some(parse_date(raw, today)?)),
    };
    Ok(update)
}

fn parse_field_name(raw: Option<&str>) -> Result<FormField, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument("field name"))?;
    raw.parse::<FormField>().map_err(CommandError::UnknownField)
}

/// Parse one line of shell input. Blank lines yield `None`.
pub fn parse_command(line: &str, today: NaiveDate) -> Result<Option<FormCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (Some(name), value),
                None => ((!rest.is_empty()).then_some(rest), ""),
            };
            let field = parse_field_name(name)?;
            // Whitespace separates words on the command line, so the value is
            // taken without the spaces around it.
            let value = value.trim();
            if value.is_empty() {
                return Err(CommandError::MissingArgument("value"));
            }
            FormCommand::Set(parse_field_update(field, value, today)?)
        }
        "clear" => FormCommand::Clear(parse_field_name((!rest.is_empty()).then_some(rest))?),
        "show" => FormCommand::Show {
            json: rest == "--json",
        },
        "submit" => FormCommand::Submit,
        "executives" => FormCommand::Executives,
        "statuses" => FormCommand::Statuses,
        "help" | "?" => FormCommand::Help,
        "quit" | "exit" => FormCommand::Quit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

pub fn set_field(state: &AppState, update: FieldUpdate) {
    state.form.lock().set_field(update);
}

pub fn get_form_snapshot(state: &AppState) -> FormSnapshot {
    state.form.lock().snapshot()
}

/// Roster as `(id, name)` rows for display.
pub fn list_executives() -> Vec<(&'static str, &'static str)> {
    Executive::all().map(|e| (e.id(), e.name())).collect()
}

/// Statuses as `(id, label)` rows for display.
pub fn list_statuses() -> Vec<(&'static str, &'static str)> {
    WorkStatus::all().map(|s| (s.id(), s.label())).collect()
}
