//! Request-scoped context: typed request id extracted from headers.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

/// Header name for the request id. Default: `X-Request-ID`.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request-scoped metadata threaded through model calls. The request id is
/// optional; absence only affects diagnostic log output.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }

    /// Request id for log fields, `-` when none was supplied.
    pub fn request_id_or_placeholder(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v: &axum::http::HeaderValue| v.to_str().ok())
            .map(|s: &str| s.trim().to_string())
            .filter(|s: &String| !s.is_empty());
        Ok(RequestContext::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_when_absent() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.request_id_or_placeholder(), "-");
    }

    #[test]
    fn keeps_supplied_id() {
        let ctx = RequestContext::new(Some("req-42".into()));
        assert_eq!(ctx.request_id_or_placeholder(), "req-42");
    }
}
