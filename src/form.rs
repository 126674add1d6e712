//! In-memory form state for the work log.
//!
//! One mutable record holding every field plus the submit status. Field
//! setters never validate; validation happens only at submit time.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SubmissionError;
use crate::types::{format_display_date, format_payload_date, Executive, WorkStatus};

/// Shown after the webhook accepts an entry.
pub const SUCCESS_MESSAGE: &str =
    "Work log submitted successfully! Your entry has been sent to n8n / Google Sheets.";

/// The eight editable inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Date,
    Executive,
    Company,
    Product,
    Status,
    DeliveryDate,
    Comments,
    WebsiteLink,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Date,
        FormField::Executive,
        FormField::Company,
        FormField::Product,
        FormField::Status,
        FormField::DeliveryDate,
        FormField::Comments,
        FormField::WebsiteLink,
    ];

    /// Name used by the `set` / `clear` commands.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::Executive => "executive",
            FormField::Company => "company",
            FormField::Product => "product",
            FormField::Status => "status",
            FormField::DeliveryDate => "delivery-date",
            FormField::Comments => "comments",
            FormField::WebsiteLink => "website",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Date => "Date",
            FormField::Executive => "Executive",
            FormField::Company => "Company",
            FormField::Product => "Product",
            FormField::Status => "Status",
            FormField::DeliveryDate => "Delivery Date",
            FormField::Comments => "Comments",
            FormField::WebsiteLink => "Website Link",
        }
    }

    /// Fields marked with * in the form.
    pub fn is_required(self) -> bool {
        !matches!(self, FormField::DeliveryDate | FormField::Comments)
    }
}

impl FromStr for FormField {
    type Err = String;

    /// Accepts the command key or the payload key (`companyName`, `websiteLink`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().as_str() {
            "date" => FormField::Date,
            "executive" | "executiveid" => FormField::Executive,
            "company" | "companyname" => FormField::Company,
            "product" => FormField::Product,
            "status" | "statusid" => FormField::Status,
            "delivery-date" | "deliverydate" | "delivery" => FormField::DeliveryDate,
            "comments" | "notes" => FormField::Comments,
            "website" | "website-link" | "websitelink" | "link" => FormField::WebsiteLink,
            other => return Err(other.to_string()),
        };
        Ok(field)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed value for one field. `None` / empty string clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Date(Option<NaiveDate>),
    Executive(Option<Executive>),
    Company(String),
    Product(String),
    Status(Option<WorkStatus>),
    DeliveryDate(Option<NaiveDate>),
    Comments(String),
    WebsiteLink(String),
}

impl FieldUpdate {
    pub fn field(&self) -> FormField {
        match self {
            FieldUpdate::Date(_) => FormField::Date,
            FieldUpdate::Executive(_) => FormField::Executive,
            FieldUpdate::Company(_) => FormField::Company,
            FieldUpdate::Product(_) => FormField::Product,
            FieldUpdate::Status(_) => FormField::Status,
            FieldUpdate::DeliveryDate(_) => FormField::DeliveryDate,
            FieldUpdate::Comments(_) => FormField::Comments,
            FieldUpdate::WebsiteLink(_) => FormField::WebsiteLink,
        }
    }

    /// The update that empties `field`.
    pub fn cleared(field: FormField) -> Self {
        match field {
            FormField::Date => FieldUpdate::Date(None),
            FormField::Executive => FieldUpdate::Executive(None),
            FormField::Company => FieldUpdate::Company(String::new()),
            FormField::Product => FieldUpdate::Product(String::new()),
            FormField::Status => FieldUpdate::Status(None),
            FormField::DeliveryDate => FieldUpdate::DeliveryDate(None),
            FormField::Comments => FieldUpdate::Comments(String::new()),
            FormField::WebsiteLink => FieldUpdate::WebsiteLink(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// Banner shown under the form after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub text: String,
}

/// `idle → submitting → {success, error}`; terminal states keep their message
/// until the next submit begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub date: Option<NaiveDate>,
    pub executive: Option<Executive>,
    pub company_name: String,
    pub product: String,
    pub status: Option<WorkStatus>,
    pub delivery_date: Option<NaiveDate>,
    pub comments: String,
    pub website_link: String,
    is_submitting: bool,
    message: Option<SubmitMessage>,
}

impl FormState {
    /// A fresh form dated `today` with status Pending.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: Some(today),
            executive: None,
            company_name: String::new(),
            product: String::new(),
            status: Some(WorkStatus::default()),
            delivery_date: None,
            comments: String::new(),
            website_link: String::new(),
            is_submitting: false,
            message: None,
        }
    }

    pub fn set_field(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Date(v) => self.date = v,
            FieldUpdate::Executive(v) => self.executive = v,
            FieldUpdate::Company(v) => self.company_name = v,
            FieldUpdate::Product(v) => self.product = v,
            FieldUpdate::Status(v) => self.status = v,
            FieldUpdate::DeliveryDate(v) => self.delivery_date = v,
            FieldUpdate::Comments(v) => self.comments = v,
            FieldUpdate::WebsiteLink(v) => self.website_link = v,
        }
    }

    /// Clear everything except date and executive so the same person can log
    /// the next item for the same day straight away.
    pub fn reset_after_success(&mut self) {
        self.company_name.clear();
        self.product.clear();
        self.status = Some(WorkStatus::default());
        self.delivery_date = None;
        self.comments.clear();
        self.website_link.clear();
    }

    /// Enter `submitting`, dropping the previous banner. Refused while a
    /// request is already in flight.
    pub fn begin_submit(&mut self) -> Result<(), SubmissionError> {
        if self.is_submitting {
            return Err(SubmissionError::SubmissionInProgress);
        }
        self.is_submitting = true;
        self.message = None;
        Ok(())
    }

    /// Leave `submitting` with a terminal banner. Success also resets the form.
    pub fn end_submit(&mut self, result: Result<(), &SubmissionError>) {
        self.is_submitting = false;
        self.message = Some(match result {
            Ok(()) => {
                self.reset_after_success();
                SubmitMessage {
                    kind: MessageKind::Success,
                    text: SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(err) => SubmitMessage {
                kind: MessageKind::Error,
                text: err.user_message().to_string(),
            },
        });
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn message(&self) -> Option<&SubmitMessage> {
        self.message.as_ref()
    }

    pub fn status(&self) -> SubmissionStatus {
        if self.is_submitting {
            return SubmissionStatus::Submitting;
        }
        match &self.message {
            Some(SubmitMessage {
                kind: MessageKind::Success,
                text,
            }) => SubmissionStatus::Success(text.clone()),
            Some(SubmitMessage {
                kind: MessageKind::Error,
                text,
            }) => SubmissionStatus::Error(text.clone()),
            None => SubmissionStatus::Idle,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            date: self.date.map(format_payload_date),
            executive_id: self.executive.map(|e| e.id()),
            executive_name: self.executive.map(|e| e.name()),
            company_name: self.company_name.clone(),
            product: self.product.clone(),
            status_id: self.status.map(|s| s.id()),
            status_label: self.status.map(|s| s.label()),
            delivery_date: self.delivery_date.map(format_payload_date),
            comments: self.comments.clone(),
            website_link: self.website_link.clone(),
            is_submitting: self.is_submitting,
            message: self.message.clone(),
        }
    }

    /// Human-readable value of one field, `None` when empty.
    pub fn display_value(&self, field: FormField) -> Option<String> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        match field {
            FormField::Date => self.date.map(format_display_date),
            FormField::Executive => self.executive.map(|e| format!("{} ({})", e.name(), e.id())),
            FormField::Company => non_empty(&self.company_name),
            FormField::Product => non_empty(&self.product),
            FormField::Status => self.status.map(|s| s.label().to_string()),
            FormField::DeliveryDate => self.delivery_date.map(format_display_date),
            FormField::Comments => non_empty(&self.comments),
            FormField::WebsiteLink => non_empty(&self.website_link),
        }
    }
}

/// Serializable view of the form for `show --json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub date: Option<String>,
    pub executive_id: Option<&'static str>,
    pub executive_name: Option<&'static str>,
    pub company_name: String,
    pub product: String,
    pub status_id: Option<&'static str>,
    pub status_label: Option<&'static str>,
    pub delivery_date: Option<String>,
    pub comments: String,
    pub website_link: String,
    pub is_submitting: bool,
    pub message: Option<SubmitMessage>,
}
