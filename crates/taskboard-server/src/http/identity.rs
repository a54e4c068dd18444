//! Acting identity extraction.
//!
//! The identity provider in front of the server authenticates the caller
//! and forwards who they are in `x-user-*` headers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use taskboard_core::{ActingIdentity, CoreError};

use super::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read the acting identity from request headers.
pub fn acting_identity(headers: &HeaderMap) -> Result<ActingIdentity, CoreError> {
    let user_id = header(headers, USER_ID_HEADER).ok_or_else(|| {
        CoreError::Unauthorized(format!("missing {USER_ID_HEADER} header"))
    })?;
    Ok(ActingIdentity {
        user_id: user_id.into(),
        name: header(headers, USER_NAME_HEADER),
        email: header(headers, USER_EMAIL_HEADER),
    })
}

/// Extractor wrapping the caller's [`ActingIdentity`].
#[derive(Debug, Clone)]
pub struct Identity(pub ActingIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Identity(acting_identity(&parts.headers)?))
    }
}
