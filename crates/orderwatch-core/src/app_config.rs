use std::net::SocketAddr;

use crate::cadence::CadencePolicy;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
    /// Plain connection upgraded with `STARTTLS` (usually port 587).
    StartTls,
}

/// A complete SMTP relay configuration.
///
/// Only constructed when host, credentials and at least one recipient are
/// all present; a partial configuration yields no `SmtpSettings` at all and
/// the mailer skips sending.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub tls: SmtpTls,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// Reminder cadence inputs, loadable without the rest of [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceSettings {
    pub policy: CadencePolicy,
    pub run_number: Option<u64>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub order_url: String,
    pub api_token: Option<String>,
    pub api_token_header: String,
    pub cookie: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub smtp: Option<SmtpSettings>,
    pub run_number: Option<u64>,
    pub cadence: CadencePolicy,
    pub notify_cron: Option<String>,
}

impl AppConfig {
    /// Extra request headers for the order endpoint, in insertion order.
    #[must_use]
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if let Some(token) = &self.api_token {
            headers.push((self.api_token_header.clone(), token.clone()));
        }
        if let Some(cookie) = &self.cookie {
            headers.push(("Cookie".to_string(), cookie.clone()));
        }
        headers
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("order_url", &self.order_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("api_token_header", &self.api_token_header)
            .field("cookie", &self.cookie.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("smtp", &self.smtp)
            .field("run_number", &self.run_number)
            .field("cadence", &self.cadence)
            .field("notify_cron", &self.notify_cron)
            .finish()
    }
}
