pub mod app_config;
pub mod cadence;
pub mod config;
pub mod summary;

use thiserror::Error;

pub use app_config::{AppConfig, CadenceSettings, SmtpSettings, SmtpTls};
pub use cadence::{
    decide, parse_run_counter, CadenceFallback, CadencePolicy, Decision, DecisionReason,
};
pub use config::{
    load_app_config, load_app_config_from_env, load_cadence_settings, load_log_level,
};
pub use summary::{OrderSummary, PLACEHOLDER};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
