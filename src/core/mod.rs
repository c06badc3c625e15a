pub mod engine;

pub use crate::domain::model::{OutboundEmail, PhraseRecord};
pub use crate::domain::ports::{MailCourier, MailSession, PhraseSource};
pub use crate::utils::error::Result;
