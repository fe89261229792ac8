//! `Authorization: Bearer` header extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

/// Raw bearer token pulled from the `Authorization` header.
///
/// Returns 401 if the header is absent, not valid UTF-8, or lacks the
/// `Bearer ` prefix. Signature validation is done by handlers after
/// extraction.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Extract synchronously and return a 'static future; an `async fn` here
    // trips E0195 against axum-core's desugared trait signature.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self(token))
        }
    }
}
