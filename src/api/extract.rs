//! Request extractors.

use crate::{
    api::{ApiState, error::ApiError},
    core::{audit, auth},
};
use axum::{
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

/// `Json<T>` whose rejections are rendered as JSON errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Returns the bearer token from an `Authorization` header, if any.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Who is performing the request, for audit entries.
///
/// Resolved from a live bearer session; requests without one are attributed
/// to [`audit::DEFAULT_ACTOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Username written to the audit log
    pub username: String,
    /// Account id when the request carried a live session
    pub user_id: Option<i64>,
}

impl Actor {
    fn anonymous() -> Self {
        Self {
            username: audit::DEFAULT_ACTOR.to_string(),
            user_id: None,
        }
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
    Arc<ApiState>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self::anonymous());
        };

        let state = <Arc<ApiState> as FromRef<S>>::from_ref(state);
        let resolved = auth::resolve_session(&state.database, token, chrono::Utc::now()).await?;

        Ok(resolved.map_or_else(Self::anonymous, |account| Self {
            username: account.username,
            user_id: Some(account.id),
        }))
    }
}
