//! Delivery seam for notification mail.
//!
//! A missing or partial SMTP configuration is not an error: [`dispatch`]
//! reports [`Delivery::Skipped`] and the run carries on. Failures of a
//! configured transport are returned to the caller.

use std::future::Future;

use crate::error::MailError;

/// Something that can deliver a plain-text notification.
pub trait Mailer {
    /// Sends one message with `subject` and plain-text `body`.
    fn send(
        &self,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// What happened to a notification handed to [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No mailer configured; nothing was sent.
    Skipped,
}

/// Sends through `mailer` when one is configured.
///
/// # Errors
///
/// Propagates the mailer's error when sending fails.
pub async fn dispatch<M: Mailer>(
    mailer: Option<&M>,
    subject: &str,
    body: &str,
) -> Result<Delivery, MailError> {
    let Some(mailer) = mailer else {
        tracing::info!(subject, "SMTP not configured; skipping notification");
        return Ok(Delivery::Skipped);
    };

    mailer.send(subject, body).await?;
    tracing::info!(subject, "notification sent");
    Ok(Delivery::Sent)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn rejected_recipient() -> MailError {
        let address = "undisclosed-recipients";
        let source = address
            .parse::<lettre::message::Mailbox>()
            .expect_err("address without a domain should not parse");
        MailError::Address {
            address: address.to_string(),
            source,
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(rejected_recipient());
            }
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_without_mailer_skips() {
        let outcome = dispatch::<RecordingMailer>(None, "subject", "body")
            .await
            .unwrap();
        assert_eq!(outcome, Delivery::Skipped);
    }

    #[tokio::test]
    async fn dispatch_sends_through_mailer() {
        let mailer = RecordingMailer::default();
        let outcome = dispatch(Some(&mailer), "VIN生成通知：X", "订单号: O1")
            .await
            .unwrap();
        assert_eq!(outcome, Delivery::Sent);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[("VIN生成通知：X".to_string(), "订单号: O1".to_string())]
        );
    }

    #[tokio::test]
    async fn dispatch_propagates_send_failure() {
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let err = dispatch(Some(&mailer), "s", "b").await.unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
    }
}
