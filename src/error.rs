//! Error types and provider-message classification.

use thiserror::Error;

/// Errors that can occur while generating logo concepts or images.
#[derive(Debug, Error)]
pub enum LogoForgeError {
    /// No API key was supplied before attempting generation.
    #[error("no API key was provided; set GOOGLE_API_KEY or pass a key")]
    MissingCredential,

    /// The provider rejected the API key.
    #[error("the API key was rejected; check that it is valid")]
    InvalidCredential,

    /// The provider requires billing to be enabled for this key.
    #[error("this API key's project requires billing to be enabled")]
    BillingRequired,

    /// The required API surface is not enabled, or access was denied.
    #[error("access was denied; the Generative Language API may not be enabled for this key")]
    PermissionDenied,

    /// Provider-side quota or rate limit was hit.
    #[error("the provider's usage quota was exceeded; try again later")]
    QuotaExceeded,

    /// The call completed but produced no usable content.
    #[error("the model returned no usable content")]
    EmptyResult,

    /// The local daily generation limit was hit before the call was made.
    #[error("daily generation limit reached; try again tomorrow")]
    DailyLimitReached,

    /// Unrecognized provider error; the raw message is preserved verbatim.
    #[error("{0}")]
    Unknown(String),

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode base64 image data.
    #[error("failed to decode image data: {0}")]
    Decode(String),

    /// I/O error (e.g. saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogoForgeError {
    /// Returns true if this error should be surfaced to the user as-is,
    /// rather than treated as an internal fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::InvalidCredential
                | Self::BillingRequired
                | Self::PermissionDenied
                | Self::QuotaExceeded
                | Self::EmptyResult
                | Self::DailyLimitReached
                | Self::Unknown(_)
        )
    }
}

/// Result type alias for logo generation operations.
pub type Result<T> = std::result::Result<T, LogoForgeError>;

/// A single classification rule: a substring to look for and the category
/// it maps to. Rules are evaluated in order; the first match wins.
struct Rule {
    needle: &'static str,
    ignore_case: bool,
    category: fn() -> LogoForgeError,
}

impl Rule {
    fn matches(&self, raw: &str) -> bool {
        if self.ignore_case {
            // Needles for case-insensitive rules are stored lowercase.
            raw.to_lowercase().contains(self.needle)
        } else {
            raw.contains(self.needle)
        }
    }
}

/// Ordered rule table. Credential rejection is checked before billing so a
/// bad key is never reported as a billing problem.
const RULES: &[Rule] = &[
    Rule {
        needle: "API key not valid",
        ignore_case: false,
        category: || LogoForgeError::InvalidCredential,
    },
    Rule {
        needle: "billing",
        ignore_case: true,
        category: || LogoForgeError::BillingRequired,
    },
    Rule {
        needle: "permission denied",
        ignore_case: true,
        category: || LogoForgeError::PermissionDenied,
    },
    Rule {
        needle: "api not enabled",
        ignore_case: true,
        category: || LogoForgeError::PermissionDenied,
    },
    Rule {
        needle: "quota",
        ignore_case: true,
        category: || LogoForgeError::QuotaExceeded,
    },
];

/// Maps a raw provider error message to a user-facing category.
///
/// Never fails: a message that matches no rule comes back as
/// [`LogoForgeError::Unknown`] with the original text preserved so diagnostic
/// detail is not lost.
pub fn classify(raw: &str) -> LogoForgeError {
    for rule in RULES {
        if rule.matches(raw) {
            return (rule.category)();
        }
    }
    LogoForgeError::Unknown(raw.to_owned())
}
