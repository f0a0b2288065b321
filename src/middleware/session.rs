use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

/// HTTP header carrying the client's session ID
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Optional session identity of the caller.
///
/// Absent header yields `Session(None)`; a header that is not a UUID is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SESSION_ID_HEADER) else {
            return Ok(Session(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(|id| Session(Some(id)))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("{} must be a UUID", SESSION_ID_HEADER))
            })
    }
}
