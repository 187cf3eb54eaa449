//! # Mail Dispatcher
//!
//! Fire-and-forget email delivery. Handlers publish an [`EmailJob`] to a
//! bounded queue and return immediately; a background worker renders each
//! job and hands it to an [`EmailSender`]. Worker failures are logged and
//! dropped, never surfaced to the request that enqueued the job.

use std::sync::Arc;

use entity::{email_verifications, users};
use error::{AppError, Result};
use logging::log_mail_event;
use sea_orm::{DbConn, EntityTrait};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::config::MailConfig;

/// Queue depth before `enqueue` starts dropping jobs.
const QUEUE_CAPACITY: usize = 256;

/// A unit of outbound mail work.
///
/// Jobs carry record ids rather than rendered content so the worker always
/// reads the current state at delivery time.
#[derive(Debug, Clone)]
pub enum EmailJob {
    /// Deliver the verification code stored in the referenced record
    Verification {
        record_id: Uuid,
    },
    /// Deliver a password reset link carrying the raw token
    PasswordReset {
        user_id: Uuid,
        token:   String,
    },
}

/// A rendered message ready for transport.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to:      String,
    pub from:    String,
    pub subject: String,
    pub body:    String,
}

/// Transport boundary. SMTP lives behind this trait, outside this codebase.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

/// Default sender: logs the rendered message instead of delivering it.
pub struct TracingSender;

#[async_trait::async_trait]
impl EmailSender for TracingSender {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        tracing::info!(
            target: "mail",
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "rendered email"
        );
        Ok(())
    }
}

/// Test sender that records every message it is handed.
#[derive(Default)]
pub struct RecordingSender {
    sent: std::sync::Mutex<Vec<EmailMessage>>,
}

impl RecordingSender {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Snapshot of everything delivered so far.
    pub fn sent(&self) -> Vec<EmailMessage> { self.sent.lock().map(|v| v.clone()).unwrap_or_default() }
}

#[async_trait::async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}

/// Handle for publishing mail jobs. Cheap to clone.
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::Sender<EmailJob>,
}

impl Mailer {
    /// Spawns the worker task and returns the queue handle.
    #[must_use]
    pub fn spawn(db: DbConn, config: MailConfig, sender: Arc<dyn EmailSender>) -> Self {
        let (tx, mut rx) = mpsc::channel(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(e) = handle_job(&db, &config, sender.as_ref(), job).await {
                    warn!(error = %e, "mail job failed, dropping");
                }
            }
        });

        Self { tx }
    }

    /// Publishes a job without waiting. A full queue drops the job with a
    /// warning.
    pub fn enqueue(&self, job: EmailJob) {
        if let Err(e) = self.tx.try_send(job) {
            warn!(error = %e, "mail queue full, dropping job");
        }
    }
}

async fn handle_job(db: &DbConn, config: &MailConfig, sender: &dyn EmailSender, job: EmailJob) -> Result<()> {
    match job {
        EmailJob::Verification { record_id } => {
            let record = email_verifications::Entity::find_by_id(record_id)
                .one(db)
                .await?
                .ok_or_else(|| AppError::not_found(format!("verification record {record_id} vanished")))?;
            let user = users::Entity::find_by_id(record.user_id)
                .one(db)
                .await?
                .ok_or_else(|| AppError::not_found(format!("user {} vanished", record.user_id)))?;

            let link = format!(
                "{}/api/v1/accounts/verify/{}/{}",
                config.public_base_url, user.email, record.code
            );
            let message = EmailMessage {
                to:      user.email.clone(),
                from:    config.from_address.clone(),
                subject: "Confirm your Ladle account".to_string(),
                body:    format!(
                    "Hi {},\n\nConfirm your email address by opening this link:\n{}\n\nThe link expires at {}.",
                    user.display_name(),
                    link,
                    record.expiration.to_rfc3339(),
                ),
            };
            sender.send(message).await?;
            log_mail_event!("verification_sent", user.email);
        },
        EmailJob::PasswordReset { user_id, token } => {
            let user = users::Entity::find_by_id(user_id)
                .one(db)
                .await?
                .ok_or_else(|| AppError::not_found(format!("user {user_id} vanished")))?;

            let link = format!("{}/password-reset?token={}", config.public_base_url, token);
            let message = EmailMessage {
                to:      user.email.clone(),
                from:    config.from_address.clone(),
                subject: "Reset your Ladle password".to_string(),
                body:    format!(
                    "Hi {},\n\nReset your password by opening this link:\n{}\n\nIf you did not request this, ignore \
                     this message.",
                    user.display_name(),
                    link,
                ),
            };
            sender.send(message).await?;
            log_mail_event!("password_reset_sent", user.email);
        },
    }
    Ok(())
}
