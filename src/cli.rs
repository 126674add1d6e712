//! Command-line entry points.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::commands::{self, CommandError};
use crate::form::FormField;
use crate::notification::{notify_message, notify_submit_error};
use crate::state::{self, AppState, ResolvedConfig};
use crate::submission;
use crate::webhook::{WebhookClient, WebhookTransport};

#[derive(Debug, Parser)]
#[command(name = "worklog")]
#[command(about = "Log daily work activity and send it to the n8n webhook")]
#[command(version)]
pub struct Cli {
    /// Webhook that receives each work log entry.
    #[arg(long, global = true, env = "N8N_WEBHOOK_URL")]
    pub webhook_url: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form interactively (default).
    Form,
    /// Submit one entry and exit.
    Submit(SubmitArgs),
    /// List executives and statuses.
    Roster,
    /// Show which webhook URL is in use.
    Config,
}

/// Every field is optional here so that missing values go through the same
/// required-field checks as the interactive form.
#[derive(Debug, Default, Args)]
pub struct SubmitArgs {
    /// Day of the activity, yyyy-MM-dd or 'today' [default: today]
    #[arg(long)]
    pub date: Option<String>,
    /// Executive id (EMP001..EMP006) or name.
    #[arg(long)]
    pub executive: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub product: Option<String>,
    /// PENDING, IN_PROGRESS, IN_REVIEW, COMPLETED or DELIVERED [default: PENDING]
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub delivery_date: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
}

impl SubmitArgs {
    fn fields(&self) -> [(FormField, Option<&String>); 8] {
        [
            (FormField::Date, self.date.as_ref()),
            (FormField::Executive, self.executive.as_ref()),
            (FormField::Company, self.company.as_ref()),
            (FormField::Product, self.product.as_ref()),
            (FormField::Status, self.status.as_ref()),
            (FormField::DeliveryDate, self.delivery_date.as_ref()),
            (FormField::Comments, self.comments.as_ref()),
            (FormField::WebsiteLink, self.website.as_ref()),
        ]
    }
}

/// Copy the given flags into the form. Flags that were not passed leave the
/// form defaults alone.
pub fn apply_submit_args(
    state: &AppState,
    args: &SubmitArgs,
    today: NaiveDate,
) -> Result<(), CommandError> {
    for (field, raw) in args.fields() {
        if let Some(raw) = raw {
            let update = commands::parse_field_update(field, raw, today)?;
            commands::set_field(state, update);
        }
    }
    Ok(())
}

/// Fill the form from flags and submit it once.
pub async fn submit_once(
    state: &AppState,
    transport: &dyn WebhookTransport,
    args: &SubmitArgs,
    today: NaiveDate,
    out: &mut impl Write,
) -> io::Result<bool> {
    if let Err(e) = apply_submit_args(state, args, today) {
        writeln!(out, "{}", e)?;
        return Ok(false);
    }

    match submission::submit_work_log(state, transport).await {
        Ok(()) => {
            let message = state.form.lock().message().cloned();
            if let Some(message) = message {
                notify_message(out, &message)?;
            }
            Ok(true)
        }
        Err(e) => {
            notify_submit_error(out, &e)?;
            Ok(false)
        }
    }
}

fn print_roster(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Executives")?;
    for (id, name) in commands::list_executives() {
        writeln!(out, "  {}  {}", id, name)?;
    }
    writeln!(out, "Statuses")?;
    for (id, label) in commands::list_statuses() {
        writeln!(out, "  {:<12} {}", id, label)?;
    }
    Ok(())
}

fn print_config(out: &mut impl Write, config: &ResolvedConfig) -> io::Result<()> {
    writeln!(out, "Webhook URL: {}", config.webhook_url)?;
    writeln!(out, "Source:      {}", config.source)?;
    if let Ok(path) = state::config_path() {
        writeln!(out, "Config file: {}", path.display())?;
    }
    Ok(())
}

/// Parse arguments, resolve configuration once, and dispatch.
pub async fn run_cli(cli: Cli) -> ExitCode {
    let config = match state::load_config(cli.webhook_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Using webhook {} ({})", config.webhook_url, config.source);

    let mut stdout = io::stdout();
    let result = match cli.command.unwrap_or(Command::Form) {
        Command::Roster => print_roster(&mut stdout).map(|_| true),
        Command::Config => print_config(&mut stdout, &config).map(|_| true),
        Command::Submit(args) => {
            let client = WebhookClient::new(config.webhook_url.clone());
            let state = AppState::new(config);
            let today = chrono::Local::now().date_naive();
            submit_once(&state, &client, &args, today, &mut stdout).await
        }
        Command::Form => {
            let client = WebhookClient::new(config.webhook_url.clone());
            let state = AppState::new(config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            crate::shell::run_shell(&state, &client, stdin, &mut stdout)
                .await
                .map(|_| true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Terminal I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConfigSource, Executive, WorkLogEntry, WorkStatus};
    use crate::webhook::WebhookError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingTransport {
        sent: Mutex<Vec<WorkLogEntry>>,
        response: Result<(), WebhookError>,
    }

    impl RecordingTransport {
        fn responding(response: Result<(), WebhookError>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl WebhookTransport for RecordingTransport {
        async fn send_entry(&self, entry: &WorkLogEntry) -> Result<(), WebhookError> {
            self.sent.lock().push(entry.clone());
            self.response.clone()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn acme_args() -> SubmitArgs {
        SubmitArgs {
            date: Some("2024-03-01".into()),
            executive: Some("EMP003".into()),
            company: Some("Acme".into()),
            product: Some("SEO Audit".into()),
            status: Some("COMPLETED".into()),
            website: Some("https://acme.test".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_cli_parses_submit_flags() {
        let cli = Cli::try_parse_from([
            "worklog",
            "--webhook-url",
            "http://localhost:5678/webhook/x",
            "submit",
            "--executive",
            "EMP001",
            "--delivery-date",
            "2024-03-20",
        ])
        .unwrap();
        assert_eq!(cli.webhook_url.as_deref(), Some("http://localhost:5678/webhook/x"));
        match cli.command {
            Some(Command::Submit(args)) => {
                assert_eq!(args.executive.as_deref(), Some("EMP001"));
                assert_eq!(args.delivery_date.as_deref(), Some("2024-03-20"));
                assert!(args.company.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_apply_submit_args_keeps_defaults() {
        let state = AppState::for_tests(today());
        let args = SubmitArgs {
            executive: Some("Vishnu".into()),
            ..Default::default()
        };
        apply_submit_args(&state, &args, today()).unwrap();

        let form = state.form.lock();
        assert_eq!(form.executive, Some(Executive::Vishnu));
        assert_eq!(form.date, Some(today()));
        assert_eq!(form.status, Some(WorkStatus::Pending));
    }

    #[tokio::test]
    async fn test_submit_once_scenario() {
        let state = AppState::for_tests(today());
        let transport = RecordingTransport::responding(Ok(()));
        let mut out = Vec::new();

        let ok = submit_once(&state, &transport, &acme_args(), today(), &mut out)
            .await
            .unwrap();
        assert!(ok);

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].executive_name, "Ali");
        assert_eq!(sent[0].status_label, "Completed");
        assert_eq!(sent[0].date, "2024-03-01");
        assert_eq!(sent[0].delivery_date, "");
    }

    #[tokio::test]
    async fn test_submit_once_missing_website() {
        let state = AppState::for_tests(today());
        let transport = RecordingTransport::responding(Ok(()));
        let args = SubmitArgs {
            website: None,
            ..acme_args()
        };
        let mut out = Vec::new();

        let ok = submit_once(&state, &transport, &args, today(), &mut out)
            .await
            .unwrap();
        assert!(!ok);
        assert!(transport.sent.lock().is_empty());
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Please provide the Website Link."));
    }

    #[tokio::test]
    async fn test_submit_once_webhook_failure() {
        let state = AppState::for_tests(today());
        let transport = RecordingTransport::responding(Err(WebhookError::Status(500)));
        let mut out = Vec::new();

        let ok = submit_once(&state, &transport, &acme_args(), today(), &mut out)
            .await
            .unwrap();
        assert!(!ok);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Something went wrong while sending data to the n8n webhook."));
        assert!(!text.contains("500"));
    }

    #[tokio::test]
    async fn test_submit_once_sends_free_text_as_typed() {
        let state = AppState::for_tests(today());
        let transport = RecordingTransport::responding(Ok(()));
        let args = SubmitArgs {
            company: Some("   ".into()),
            comments: Some("  indented note ".into()),
            status: Some(" COMPLETED ".into()),
            ..acme_args()
        };
        let mut out = Vec::new();

        let ok = submit_once(&state, &transport, &args, today(), &mut out)
            .await
            .unwrap();
        assert!(ok);

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].company_name, "   ");
        assert_eq!(sent[0].comments, "  indented note ");
        assert_eq!(sent[0].status_id, "COMPLETED");
    }

    #[tokio::test]
    async fn test_submit_once_bad_flag_value() {
        let state = AppState::for_tests(today());
        let transport = RecordingTransport::responding(Ok(()));
        let args = SubmitArgs {
            status: Some("DONE".into()),
            ..acme_args()
        };
        let mut out = Vec::new();

        let ok = submit_once(&state, &transport, &args, today(), &mut out)
            .await
            .unwrap();
        assert!(!ok);
        assert!(transport.sent.lock().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Unknown status 'DONE'"));
    }

    #[test]
    fn test_print_config() {
        let config = state::resolve_config(Some("https://hooks.example.com/w"), None).unwrap();
        assert_eq!(config.source, ConfigSource::Override);
        let mut out = Vec::new();
        print_config(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Webhook URL: https://hooks.example.com/w"));
        assert!(text.contains("command line / environment"));
    }
}
