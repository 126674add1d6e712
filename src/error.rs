//! Error types for work log submission
//!
//! Errors are classified by recoverability:
//! - Retryable: the webhook rejected the entry or could not be reached
//! - RequiresUserAction: a required field is empty
//! - NonRetryable: another submission is still in flight

use thiserror::Error;

use crate::form::FormField;
use crate::webhook::client::WebhookError;

/// Shown when any of Date, Executive, Company, Product or Status is empty.
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields (Date, Executive, Company, Product, Status).";

/// Shown when only the website link is missing.
pub const WEBSITE_LINK_MESSAGE: &str = "Please provide the Website Link.";

/// Shown for every webhook failure. The cause is logged, never displayed.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Something went wrong while sending data to the n8n webhook. Please check the webhook URL and try again.";

/// Which validation pass rejected the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingField {
    /// First pass: one or more of the core required fields.
    Required(Vec<FormField>),
    /// Second pass: everything else present, website link empty.
    WebsiteLink,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::Required(fields) => {
                let names: Vec<&str> = fields.iter().map(|field| field.label()).collect();
                write!(f, "{}", names.join(", "))
            }
            MissingField::WebsiteLink => write!(f, "{}", FormField::WebsiteLink.label()),
        }
    }
}

/// Error types for a single submit attempt
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(MissingField),

    #[error("Webhook submission failed: {0}")]
    SubmissionFailed(#[from] WebhookError),

    #[error("A submission is already in progress")]
    SubmissionInProgress,
}

impl SubmissionError {
    /// The message surfaced in the form. Webhook failures are deliberately
    /// generic; the status code or transport error only reaches the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmissionError::MissingRequiredField(MissingField::Required(_)) => {
                REQUIRED_FIELDS_MESSAGE
            }
            SubmissionError::MissingRequiredField(MissingField::WebsiteLink) => {
                WEBSITE_LINK_MESSAGE
            }
            SubmissionError::SubmissionFailed(_) => SUBMISSION_FAILED_MESSAGE,
            SubmissionError::SubmissionInProgress => "Submitting...",
        }
    }

    /// Returns true if resubmitting the same form may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmissionError::SubmissionFailed(_))
    }

    /// Returns true if the user has to edit the form before resubmitting
    pub fn requires_user_action(&self) -> bool {
        matches!(self, SubmissionError::MissingRequiredField(_))
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SubmissionError::MissingRequiredField(MissingField::Required(_)) => {
                "Fill in the fields marked with * and submit again."
            }
            SubmissionError::MissingRequiredField(MissingField::WebsiteLink) => {
                "Add the website link and submit again."
            }
            SubmissionError::SubmissionFailed(_) => {
                "Your entry is still in the form. Check the webhook URL or your connection, then submit again."
            }
            SubmissionError::SubmissionInProgress => "Wait for the current submission to finish.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_message_is_generic() {
        let err = SubmissionError::MissingRequiredField(MissingField::Required(vec![
            FormField::Company,
            FormField::Product,
        ]));
        assert_eq!(err.user_message(), REQUIRED_FIELDS_MESSAGE);
        assert_eq!(err.to_string(), "Missing required field: Company, Product");
        assert!(err.requires_user_action());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_website_link_message_names_field() {
        let err = SubmissionError::MissingRequiredField(MissingField::WebsiteLink);
        assert_eq!(err.user_message(), "Please provide the Website Link.");
        assert_eq!(err.to_string(), "Missing required field: Website Link");
    }

    #[test]
    fn test_submission_failed_hides_status_code() {
        let err = SubmissionError::from(WebhookError::Status(500));
        assert_eq!(err.user_message(), SUBMISSION_FAILED_MESSAGE);
        assert!(!err.user_message().contains("500"));
        assert!(err.to_string().contains("500"));
        assert!(err.is_retryable());
    }
}
