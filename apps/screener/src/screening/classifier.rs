//! Maps raw remote failures to the fixed set of user-facing messages.

use serde::Serialize;

use crate::llm_client::RemoteFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidCredentials,
    QuotaExceeded,
    BillingNotEnabled,
    ContentFlagged,
    ResponseFormat,
    Default,
}

impl ErrorCategory {
    pub fn message(self) -> &'static str {
        match self {
            ErrorCategory::InvalidCredentials => {
                "The API Key is not valid. Please ensure it is configured correctly."
            }
            ErrorCategory::QuotaExceeded => {
                "API quota exceeded. Please check your Google AI project limits and billing status."
            }
            ErrorCategory::BillingNotEnabled => {
                "Billing is not enabled for the project. Please enable billing in your Google Cloud console."
            }
            ErrorCategory::ContentFlagged => {
                "The request was blocked due to safety settings. The resume content may have been flagged as inappropriate."
            }
            ErrorCategory::ResponseFormat => {
                "The AI returned a response that was not in the expected format. Please try again."
            }
            ErrorCategory::Default => {
                "The AI model could not process the request. The file might be unreadable or the content was flagged."
            }
        }
    }
}

/// Substring rules over the lowercased raw message, in priority order.
const MESSAGE_RULES: &[(&str, ErrorCategory)] = &[
    ("api key not valid", ErrorCategory::InvalidCredentials),
    ("quota", ErrorCategory::QuotaExceeded),
    ("billing", ErrorCategory::BillingNotEnabled),
    ("safety", ErrorCategory::ContentFlagged),
];

/// Categorises a failure. Undecodable or non-conforming replies are always
/// `ResponseFormat`; everything else is matched on its message.
pub fn categorize(failure: &RemoteFailure) -> ErrorCategory {
    if failure.is_format_failure() {
        return ErrorCategory::ResponseFormat;
    }
    categorize_message(&failure.to_string())
}

/// Total over every input; an empty message yields `Default`.
pub fn categorize_message(raw: &str) -> ErrorCategory {
    let lowered = raw.to_lowercase();
    MESSAGE_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Default)
}

pub fn classify(failure: &RemoteFailure) -> String {
    categorize(failure).message().to_string()
}
