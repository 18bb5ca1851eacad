//! Login, logout and password re-verification against the auth service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitebook_core::error::CoreError;
use sitebook_core::password_gate::PasswordVerifier;
use validator::Validate;

use crate::envelope::extract_one;
use crate::error::{get_error_message, ApiError, ApiResult};
use crate::http::ApiClient;
use crate::session::AuthUser;

/// Login form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: AuthUser,
}

#[derive(Serialize)]
struct VerifyBody<'a> {
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(alias = "success", alias = "verified")]
    valid: bool,
}

/// Auth endpoints; the signed-in state lives in the client's session.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and store the token and user in the session.
    ///
    /// Rejected credentials surface as [`ApiError::Status`] with status 401;
    /// they do not count as an expired session.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthUser> {
        sitebook_core::validation::validate_form(credentials)?;
        let body = self
            .client
            .post_credentials("/auth/login", credentials)
            .await?;
        let LoginResponse { token, user } = extract_one(body)?;
        tracing::info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.client.session().sign_in(token, user.clone());
        Ok(user)
    }

    /// Forget the token locally. The API keeps no server-side session.
    pub fn logout(&self) {
        self.client.session().sign_out();
        tracing::info!("Signed out");
    }

    /// Check the signed-in user's password (`POST /auth/verify-password`).
    pub async fn check_password(&self, password: &str) -> ApiResult<bool> {
        match self
            .client
            .post_credentials("/auth/verify-password", &VerifyBody { password })
            .await
        {
            Ok(body) => {
                let VerifyResponse { valid } = extract_one(body)?;
                Ok(valid)
            }
            Err(ApiError::Status { status: 401, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PasswordVerifier for AuthService {
    async fn verify_password(&self, password: &str) -> Result<bool, CoreError> {
        self.check_password(password)
            .await
            .map_err(|e| CoreError::Internal(get_error_message(&e)))
    }
}
