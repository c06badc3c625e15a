use serde::{Deserialize, Serialize};

/// The `{phrase, author, location?}` value produced by the phrase provider.
///
/// Created once per run and consumed once by the mail dispatcher; `location`
/// stays `None` when the generation API returned JSON `null` for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub phrase: String,
    pub author: String,
    pub location: Option<String>,
}

/// A single-recipient plain-text message, ready for the SMTP session.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}
