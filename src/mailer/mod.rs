pub mod body;
pub mod smtp;

pub use smtp::{tls_strategy, SmtpDispatcher, TlsStrategy};
