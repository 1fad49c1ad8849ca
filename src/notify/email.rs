use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{AlertSink, OutboundMessage};

/// SMTP delivery of composed messages. Credentials live in the environment
/// (`SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`, `NOTIFY_EMAIL_FROM`); recipients
/// come from the watch config.
pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSender {
    pub fn from_env(recipients: &[String]) -> Result<Self> {
        let host = std::env::var("SMTP_HOST").context("SMTP_HOST missing")?;
        let user = std::env::var("SMTP_USER").context("SMTP_USER missing")?;
        let pass = std::env::var("SMTP_PASS").context("SMTP_PASS missing")?;
        let from_addr = std::env::var("NOTIFY_EMAIL_FROM").context("NOTIFY_EMAIL_FROM missing")?;

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(creds)
            .build();

        let from: Mailbox = from_addr
            .parse()
            .ok()
            .context("invalid NOTIFY_EMAIL_FROM")?;
        let mut to = Vec::with_capacity(recipients.len());
        for addr in recipients {
            let mb: Mailbox = addr
                .parse()
                .ok()
                .with_context(|| format!("invalid recipient address {addr:?}"))?;
            to.push(mb);
        }
        anyhow::ensure!(!to.is_empty(), "no recipients configured");

        Ok(Self { mailer, from, to })
    }
}

#[async_trait]
impl AlertSink for EmailSender {
    async fn deliver(&self, message: &OutboundMessage) -> Result<()> {
        let mut builder = Message::builder().from(self.from.clone());
        for mb in &self.to {
            builder = builder.to(mb.clone());
        }
        let msg = builder
            .subject(message.subject.clone())
            .header(header::ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
