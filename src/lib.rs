pub mod config;
pub mod core;
pub mod domain;
pub mod mailer;
pub mod provider;
pub mod utils;

pub use crate::config::AppConfig;
pub use crate::core::engine::DeliveryEngine;
pub use crate::domain::model::PhraseRecord;
pub use crate::mailer::SmtpDispatcher;
pub use crate::provider::GeminiProvider;
pub use crate::utils::error::{DailyPhraseError, Result};
