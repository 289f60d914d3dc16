pub mod error;
pub mod mailer;
pub mod pipeline;
pub mod smtp;

pub use error::{MailError, NotifyError};
pub use mailer::{dispatch, Delivery, Mailer};
pub use pipeline::{CycleOutcome, CycleReport, Notifier};
pub use smtp::SmtpMailer;
