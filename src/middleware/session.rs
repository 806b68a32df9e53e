use std::convert::Infallible;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::backend::Backend;
use crate::AppState;

/// Backend client bound to the caller's session cookie, built fresh for
/// every request.
pub struct RequestClient(pub Arc<dyn Backend>);

#[async_trait]
impl FromRequestParts<AppState> for RequestClient {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestClient(state.factory.server_client(&parts.headers)))
    }
}

/// Backend client that carries only the public key, for sign-up and sign-in.
pub struct AnonymousClient(pub Arc<dyn Backend>);

#[async_trait]
impl FromRequestParts<AppState> for AnonymousClient {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AnonymousClient(state.factory.browser_client()))
    }
}
