use crate::utils::error::{ConfigError, ConfigIssue};

pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";
pub const ENV_SENDER_EMAIL: &str = "SENDER_EMAIL";
pub const ENV_SENDER_PASSWORD: &str = "SENDER_PASSWORD";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";

/// Immutable snapshot of the six mandatory settings, built once at startup
/// and passed by reference into the provider and the dispatcher.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub recipient: String,
    pub sender: String,
    pub sender_password: String,
    pub smtp_server: String,
    pub smtp_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Single validation pass over a lookup function. Collects every
    /// missing/invalid setting instead of stopping at the first one.
    /// A variable that is set but blank counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        let mut required = |name: &'static str| -> Option<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Some(value),
                _ => {
                    issues.push(ConfigIssue::Missing { name });
                    None
                }
            }
        };

        let api_key = required(ENV_GOOGLE_API_KEY);
        let recipient = required(ENV_RECIPIENT_EMAIL);
        let sender = required(ENV_SENDER_EMAIL);
        let sender_password = required(ENV_SENDER_PASSWORD);
        let smtp_server = required(ENV_SMTP_SERVER);
        let smtp_port_raw = required(ENV_SMTP_PORT);

        // 連接埠必須能解析成整數;解析失敗回報為 invalid 而非 missing
        let smtp_port = smtp_port_raw.and_then(|raw| match raw.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                issues.push(ConfigIssue::Invalid {
                    name: ENV_SMTP_PORT,
                    value: raw,
                    reason: "must be an integer port number".to_string(),
                });
                None
            }
        });

        match (
            api_key,
            recipient,
            sender,
            sender_password,
            smtp_server,
            smtp_port,
        ) {
            (
                Some(api_key),
                Some(recipient),
                Some(sender),
                Some(sender_password),
                Some(smtp_server),
                Some(smtp_port),
            ) if issues.is_empty() => Ok(Self {
                api_key,
                recipient,
                sender,
                sender_password,
                smtp_server,
                smtp_port,
            }),
            _ => Err(ConfigError { issues }),
        }
    }
}
