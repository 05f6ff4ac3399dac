/// Classification outcomes

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Verdict for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// Not an Office document, or no suspicious macro found
    Clean,
    /// Path was missing or not a regular file
    Skipped(String),
    /// Matched flags in rule-table order
    Infected(Vec<String>),
    /// A tool or I/O failure stopped the check
    Error(String),
}

impl ClassificationResult {
    pub fn is_infected(&self) -> bool {
        matches!(self, Self::Infected(_))
    }

    /// Short status name, also used as the CSV `status` column
    pub fn status(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Skipped(_) => "skipped",
            Self::Infected(_) => "infected",
            Self::Error(_) => "error",
        }
    }

    /// Reason, flags or error text; empty for `Clean`
    pub fn detail(&self) -> String {
        match self {
            Self::Clean => String::new(),
            Self::Skipped(reason) => reason.clone(),
            Self::Infected(flags) => flags.join(", "),
            Self::Error(message) => message.clone(),
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            other => write!(f, "{}: {}", other.status(), other.detail()),
        }
    }
}

/// A classified path, as collected by a batch scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRecord {
    pub path: PathBuf,
    pub result: ClassificationResult,
}
