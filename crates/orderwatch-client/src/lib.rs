pub mod client;
pub mod error;
pub mod nested;
pub mod normalize;

pub use client::{unwrap_envelope, OrderClient, RawOrder};
pub use error::ClientError;
pub use normalize::{format_currency, normalize_order, normalize_order_at};
