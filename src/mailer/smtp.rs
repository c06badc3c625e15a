use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::Message;

use crate::config::AppConfig;
use crate::domain::model::{OutboundEmail, PhraseRecord};
use crate::domain::ports::{MailCourier, MailSession};
use crate::mailer::body::{format_body, SUBJECT};
use crate::utils::error::DispatchError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// How the TLS session is established for a given port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsStrategy {
    /// TLS negotiated immediately on connect, before any greeting.
    Implicit,
    /// Plaintext greeting, explicit upgrade, second greeting.
    StartTls,
}

/// Port 465 is the only implicit-TLS port; every other port goes through
/// EHLO + STARTTLS + EHLO. Fixed heuristic, no capability probing.
pub fn tls_strategy(port: u16) -> TlsStrategy {
    if port == 465 {
        TlsStrategy::Implicit
    } else {
        TlsStrategy::StartTls
    }
}

/// Formats the record into an email and pushes it through one SMTP session.
pub struct SmtpDispatcher {
    host: String,
    port: u16,
    sender: String,
    recipient: String,
    credential: String,
}

impl SmtpDispatcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            host: config.smtp_server.clone(),
            port: config.smtp_port,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            credential: config.sender_password.clone(),
        }
    }

    async fn open_session(&self) -> Result<LettreSession, DispatchError> {
        let tls = TlsParameters::new(self.host.clone())
            .map_err(|e| DispatchError::Connection(e.to_string()))?;
        let hello = ClientId::default();

        let conn = match tls_strategy(self.port) {
            TlsStrategy::Implicit => AsyncSmtpConnection::connect_tokio1(
                (self.host.as_str(), self.port),
                Some(CONNECT_TIMEOUT),
                &hello,
                Some(tls),
                None,
            )
            .await
            .map_err(|e| DispatchError::Connection(e.to_string()))?,
            TlsStrategy::StartTls => {
                // 先明文連線打招呼,再升級 TLS 並重新打招呼
                let mut conn = AsyncSmtpConnection::connect_tokio1(
                    (self.host.as_str(), self.port),
                    Some(CONNECT_TIMEOUT),
                    &hello,
                    None,
                    None,
                )
                .await
                .map_err(|e| DispatchError::Connection(e.to_string()))?;
                conn.starttls(tls, &hello)
                    .await
                    .map_err(|e| DispatchError::Connection(e.to_string()))?;
                conn
            }
        };

        Ok(LettreSession { conn })
    }
}

#[async_trait]
impl MailCourier for SmtpDispatcher {
    async fn deliver(&self, record: &PhraseRecord) -> Result<(), DispatchError> {
        let today = Local::now().date_naive();
        let mail = OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: SUBJECT.to_string(),
            body: format_body(record, today),
        };

        tracing::debug!(
            "Opening SMTP session to {}:{} ({:?})",
            self.host,
            self.port,
            tls_strategy(self.port)
        );
        let mut session = self.open_session().await?;
        run_session(&mut session, &self.sender, &self.credential, &mail).await
    }
}

/// The fixed send sequence: authenticate, transmit, close. An authentication
/// failure abandons the session without close; a transmission failure still
/// closes the session exactly once, and the transmit error wins.
pub(crate) async fn run_session<S: MailSession>(
    session: &mut S,
    username: &str,
    secret: &str,
    mail: &OutboundEmail,
) -> Result<(), DispatchError> {
    session.authenticate(username, secret).await?;

    match session.transmit(mail).await {
        Ok(()) => session.close().await,
        Err(err) => {
            let _ = session.close().await;
            Err(err)
        }
    }
}

struct LettreSession {
    conn: AsyncSmtpConnection,
}

impl LettreSession {
    fn build_message(mail: &OutboundEmail) -> Result<Message, DispatchError> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|_| DispatchError::InvalidAddress(mail.from.clone()))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| DispatchError::InvalidAddress(mail.to.clone()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .body(mail.body.clone())
            .map_err(|e| DispatchError::Unexpected(e.to_string()))
    }
}

#[async_trait]
impl MailSession for LettreSession {
    async fn authenticate(&mut self, username: &str, secret: &str) -> Result<(), DispatchError> {
        let credentials = Credentials::new(username.to_string(), secret.to_string());
        self.conn
            .auth(AUTH_MECHANISMS, &credentials)
            .await
            .map(|_| ())
            .map_err(|e| DispatchError::Authentication(e.to_string()))
    }

    async fn transmit(&mut self, mail: &OutboundEmail) -> Result<(), DispatchError> {
        let message = Self::build_message(mail)?;
        self.conn
            .send(message.envelope(), &message.formatted())
            .await
            .map(|_| ())
            .map_err(|e| DispatchError::Transmission(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), DispatchError> {
        self.conn
            .quit()
            .await
            .map(|_| ())
            .map_err(|e| DispatchError::Unexpected(e.to_string()))
    }
}
