//! REST service layer for the Sitebook backend.
//!
//! All services share one [`ApiClient`], which carries the [`Session`]
//! (bearer token and signed-in user) and normalizes the API's response
//! envelopes.

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod services;
pub mod session;

pub use config::ClientConfig;
pub use error::{get_error_message, is_network_error, ApiError, ApiResult};
pub use http::ApiClient;
pub use session::{AuthUser, Session, SessionEvent};
