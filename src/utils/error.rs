use std::fmt;

use thiserror::Error;

/// A single configuration problem found while reading the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    Missing {
        name: &'static str,
    },
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { name } => write!(f, "{} is not set.", name),
            Self::Invalid {
                name,
                value,
                reason,
            } => write!(f, "{} ('{}') is not valid: {}.", name, value, reason),
        }
    }
}

/// Every missing/invalid setting from one validation pass, reported together
/// so a user fixing configuration sees all problems in a single run.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing or invalid configuration: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// Failures while fetching a phrase from the generation API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("empty response from the generation API")]
    EmptyResponse,

    #[error("could not decode JSON from the generation API: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("generation API response missing expected keys: {}", .missing.join(", "))]
    IncompleteResponse { missing: Vec<&'static str> },

    #[error("generation API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Failures while delivering the email over SMTP. Underlying transport
/// errors are carried as rendered strings so they never cross this boundary.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("could not connect to SMTP server: {0}")]
    Connection(String),

    #[error("message transmission failed: {0}")]
    Transmission(String),

    #[error("invalid mailbox address: {0}")]
    InvalidAddress(String),

    #[error("unexpected SMTP failure: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum DailyPhraseError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("phrase fetch failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("email dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl DailyPhraseError {
    /// Which stage of the run failed: configuration, fetch or send.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Provider(_) => "fetch",
            Self::Dispatch(_) => "send",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(e) => format!("Configuration problem: {}", e),
            Self::Provider(e) => format!("Failed to retrieve inspirational phrase: {}", e),
            Self::Dispatch(e) => format!("Failed to send email: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Config(_) => "Check your .env file or environment variables.",
            Self::Provider(ProviderError::Request(_)) => {
                "Verify GOOGLE_API_KEY and your network connectivity."
            }
            Self::Provider(_) => {
                "The generation API returned an unusable reply; rerun to request a fresh one."
            }
            Self::Dispatch(DispatchError::Authentication(_)) => {
                "Check SENDER_EMAIL and SENDER_PASSWORD."
            }
            Self::Dispatch(DispatchError::Connection(_)) => "Check SMTP_SERVER and SMTP_PORT.",
            Self::Dispatch(_) => "Inspect the SMTP server logs and rerun.",
        }
    }
}

pub type Result<T> = std::result::Result<T, DailyPhraseError>;
