use thiserror::Error;

/// Errors returned while building or sending a notification mail.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Fatal failures of a notify cycle.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("order fetch failed: {0}")]
    Fetch(#[from] orderwatch_client::ClientError),

    #[error("notification delivery failed: {0}")]
    Mail(#[from] MailError),
}
