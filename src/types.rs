use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for every date in the webhook payload.
pub const PAYLOAD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Human format used when echoing dates back in the form.
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

/// Prefix of every generated entry id.
pub const ENTRY_ID_PREFIX: &str = "JS-";

/// Development fallback used when no webhook URL is configured.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://shon555.app.n8n.cloud/webhook-test/e0cb3c43-2a2b-4f05-a8e4-1036baa42dab";

// =============================================================================
// Roster
// =============================================================================

/// An employee who may be credited with a work log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Executive {
    #[serde(rename = "EMP001")]
    FathimaNida,
    #[serde(rename = "EMP002")]
    Alphonsa,
    #[serde(rename = "EMP003")]
    Ali,
    #[serde(rename = "EMP004")]
    Sameer,
    #[serde(rename = "EMP005")]
    Vishnu,
    #[serde(rename = "EMP006")]
    Shon,
}

/// Fixed roster in display order.
const EXECUTIVES: [Executive; 6] = [
    Executive::FathimaNida,
    Executive::Alphonsa,
    Executive::Ali,
    Executive::Sameer,
    Executive::Vishnu,
    Executive::Shon,
];

impl Executive {
    pub fn all() -> impl Iterator<Item = Executive> {
        EXECUTIVES.into_iter()
    }

    pub fn id(self) -> &'static str {
        match self {
            Executive::FathimaNida => "EMP001",
            Executive::Alphonsa => "EMP002",
            Executive::Ali => "EMP003",
            Executive::Sameer => "EMP004",
            Executive::Vishnu => "EMP005",
            Executive::Shon => "EMP006",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Executive::FathimaNida => "Fathima Nida",
            Executive::Alphonsa => "Alphonsa",
            Executive::Ali => "Ali",
            Executive::Sameer => "Sameer",
            Executive::Vishnu => "Vishnu",
            Executive::Shon => "Shon",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().find(|e| e.id() == id)
    }
}

impl FromStr for Executive {
    type Err = UnknownOption;

    /// Accepts a roster id (`EMP003`, case-insensitive) or an exact display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_id(&s.to_ascii_uppercase())
            .or_else(|| Self::all().find(|e| e.name().eq_ignore_ascii_case(s)))
            .ok_or_else(|| UnknownOption::new("executive", s))
    }
}

impl fmt::Display for Executive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Work status
// =============================================================================

/// Progress label attached to a logged item. Not tracked beyond submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    #[default]
    Pending,
    InProgress,
    InReview,
    Completed,
    Delivered,
}

const STATUSES: [WorkStatus; 5] = [
    WorkStatus::Pending,
    WorkStatus::InProgress,
    WorkStatus::InReview,
    WorkStatus::Completed,
    WorkStatus::Delivered,
];

impl WorkStatus {
    pub fn all() -> impl Iterator<Item = WorkStatus> {
        STATUSES.into_iter()
    }

    pub fn id(self) -> &'static str {
        match self {
            WorkStatus::Pending => "PENDING",
            WorkStatus::InProgress => "IN_PROGRESS",
            WorkStatus::InReview => "IN_REVIEW",
            WorkStatus::Completed => "COMPLETED",
            WorkStatus::Delivered => "DELIVERED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkStatus::Pending => "Pending",
            WorkStatus::InProgress => "In Progress",
            WorkStatus::InReview => "In Review",
            WorkStatus::Completed => "Completed",
            WorkStatus::Delivered => "Delivered",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().find(|s| s.id() == id)
    }
}

impl FromStr for WorkStatus {
    type Err = UnknownOption;

    /// Accepts a status id (`IN_REVIEW`, `in-review`) or its label (`In Review`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let normalized = s.to_ascii_uppercase().replace('-', "_");
        Self::from_id(&normalized)
            .or_else(|| Self::all().find(|st| st.label().eq_ignore_ascii_case(s)))
            .ok_or_else(|| UnknownOption::new("status", s))
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A value outside one of the fixed selection lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// =============================================================================
// Webhook payload
// =============================================================================

/// One submitted work log row, exactly as the webhook receives it.
///
/// Every value is a string. Built once per submission and dropped as soon as
/// the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogEntry {
    pub entry_id: String,
    pub date: String,
    pub executive_id: String,
    pub executive_name: String,
    pub company_name: String,
    pub product: String,
    pub status_id: String,
    pub status_label: String,
    /// Empty string when no delivery date was picked.
    pub delivery_date: String,
    pub comments: String,
    pub website_link: String,
}

pub fn format_payload_date(date: NaiveDate) -> String {
    date.format(PAYLOAD_DATE_FORMAT).to_string()
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration stored in ~/.worklog/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
        }
    }
}

/// Where the active webhook URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// `--webhook-url` flag or `N8N_WEBHOOK_URL`.
    Override,
    File,
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfigSource::Override => "command line / environment",
            ConfigSource::File => "config file",
            ConfigSource::Default => "built-in default",
        };
        f.write_str(s)
    }
}
