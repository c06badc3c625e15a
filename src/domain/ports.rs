use crate::domain::model::{OutboundEmail, PhraseRecord};
use crate::utils::error::{DispatchError, ProviderError};
use async_trait::async_trait;

/// Source of exactly one phrase per call. One attempt, no retries.
#[async_trait]
pub trait PhraseSource: Send + Sync {
    async fn fetch(&self) -> Result<PhraseRecord, ProviderError>;
}

/// Delivers a fetched record to the configured recipient.
#[async_trait]
pub trait MailCourier: Send + Sync {
    async fn deliver(&self, record: &PhraseRecord) -> Result<(), DispatchError>;
}

/// An open SMTP session. The sequencing rules live in the dispatcher:
/// authenticate first, then transmit, then close — a failed authenticate
/// abandons the session without close, a failed transmit still closes it.
#[async_trait]
pub trait MailSession: Send {
    async fn authenticate(&mut self, username: &str, secret: &str) -> Result<(), DispatchError>;
    async fn transmit(&mut self, mail: &OutboundEmail) -> Result<(), DispatchError>;
    async fn close(&mut self) -> Result<(), DispatchError>;
}
