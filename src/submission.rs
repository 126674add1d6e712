//! Submit flow: validate the form, build the payload, send it once.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{NaiveDate, Utc};

use crate::error::{MissingField, SubmissionError};
use crate::form::{FormField, FormState};
use crate::state::AppState;
use crate::types::{format_payload_date, Executive, WorkLogEntry, WorkStatus, ENTRY_ID_PREFIX};
use crate::webhook::WebhookTransport;

/// Form values that passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedForm<'a> {
    pub date: NaiveDate,
    pub executive: Executive,
    pub company_name: &'a str,
    pub product: &'a str,
    pub status: WorkStatus,
    pub delivery_date: Option<NaiveDate>,
    pub comments: &'a str,
    pub website_link: &'a str,
}

/// Two passes, in order. The website link is only checked once the core
/// fields are all present, so it never shares a message with them.
pub fn validate(form: &FormState) -> Result<ValidatedForm<'_>, SubmissionError> {
    let mut missing = Vec::new();
    if form.date.is_none() {
        missing.push(FormField::Date);
    }
    if form.executive.is_none() {
        missing.push(FormField::Executive);
    }
    if form.company_name.is_empty() {
        missing.push(FormField::Company);
    }
    if form.product.is_empty() {
        missing.push(FormField::Product);
    }
    if form.status.is_none() {
        missing.push(FormField::Status);
    }

    let (Some(date), Some(executive), Some(status)) = (form.date, form.executive, form.status)
    else {
        return Err(SubmissionError::MissingRequiredField(MissingField::Required(missing)));
    };
    if !missing.is_empty() {
        return Err(SubmissionError::MissingRequiredField(MissingField::Required(missing)));
    }

    if form.website_link.is_empty() {
        return Err(SubmissionError::MissingRequiredField(MissingField::WebsiteLink));
    }

    Ok(ValidatedForm {
        date,
        executive,
        company_name: &form.company_name,
        product: &form.product,
        status,
        delivery_date: form.delivery_date,
        comments: &form.comments,
        website_link: &form.website_link,
    })
}

/// Build the webhook payload. Names and labels come from the fixed tables.
pub fn build_entry(form: &ValidatedForm<'_>, entry_id: String) -> WorkLogEntry {
    WorkLogEntry {
        entry_id,
        date: format_payload_date(form.date),
        executive_id: form.executive.id().to_string(),
        executive_name: form.executive.name().to_string(),
        company_name: form.company_name.to_string(),
        product: form.product.to_string(),
        status_id: form.status.id().to_string(),
        status_label: form.status.label().to_string(),
        delivery_date: form.delivery_date.map(format_payload_date).unwrap_or_default(),
        comments: form.comments.to_string(),
        website_link: form.website_link.to_string(),
    }
}

/// `JS-` followed by epoch milliseconds, bumped so ids issued within the same
/// millisecond stay distinct.
pub fn next_entry_id() -> String {
    static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

    let now = Utc::now().timestamp_millis();
    let issued = match LAST_ISSUED.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(last) | Err(last) => now.max(last + 1),
    };
    format!("{}{}", ENTRY_ID_PREFIX, issued)
}

/// Run one submit against `transport`.
///
/// The form lock is released while the request is in flight; the in-flight
/// flag keeps a second submit out meanwhile. Fields are only cleared when the
/// webhook accepts the entry.
pub async fn submit_work_log(
    state: &AppState,
    transport: &dyn WebhookTransport,
) -> Result<(), SubmissionError> {
    let entry = {
        let mut form = state.form.lock();
        form.begin_submit()?;
        let built = validate(&form).map(|valid| build_entry(&valid, next_entry_id()));
        match built {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!("Work log not submitted: {}", err);
                form.end_submit(Err(&err));
                return Err(err);
            }
        }
    };

    let result = transport
        .send_entry(&entry)
        .await
        .map_err(SubmissionError::from);

    match &result {
        Ok(()) => log::info!(
            "Submitted {} for {} ({})",
            entry.entry_id,
            entry.executive_name,
            entry.company_name
        ),
        Err(err) => log::error!("Failed to submit {}: {}", entry.entry_id, err),
    }

    state.form.lock().end_submit(result.as_ref().copied());
    result
}
