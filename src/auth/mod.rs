//! Identity layer.
//!
//! Tokens are issued by an external identity provider; this service only
//! verifies them and exposes the identity object `{emp_code, name, role,
//! region, branch}` to handlers. The `protect` middleware validates the
//! bearer token and stores an [`AuthUser`] in request extensions; role gates
//! (`admin_only`, `vendor_only`) sit in front of the routes that need them.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Organizational role carried in the token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    RegionalManager,
    BranchManager,
    Manager,
    Employee,
    Vendor,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Claims this service expects in a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee code.
    pub sub: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub branch: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity available to every protected handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub emp_code: String,
    pub name: String,
    pub role: Role,
    pub region: String,
    pub branch: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            emp_code: claims.sub,
            name: claims.name,
            role: claims.role,
            region: claims.region,
            branch: claims.branch,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authentication token")]
    MissingAuth,

    #[error("invalid authentication token")]
    InvalidToken,

    #[error("insufficient role for this operation")]
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingAuth | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Verifies bearer tokens against the identity provider's shared secret.
#[derive(Clone)]
pub struct AuthVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Middleware validating the bearer token and exposing [`AuthUser`] to the
/// rest of the stack.
pub async fn protect(
    State(verifier): State<Arc<AuthVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingAuth)?;

    let claims = verifier.verify(token)?;
    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Role gate; admins pass every gate.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingAuth)?;

    if user.role != required && !user.role.is_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(next.run(request).await)
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}
