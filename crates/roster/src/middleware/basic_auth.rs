//! HTTP Basic authentication.
//!
//! Header parsing and credential checks live in `roster_core::auth`; this
//! layer only turns their outcome into a response.
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware, Router};
//!
//! let app = Router::new()
//!     .route("/students", axum::routing::get(list_students))
//!     .layer(middleware::from_fn_with_state(credentials, basic_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;

use roster_core::auth::{parse_basic_authorization, verify_credentials, BasicAuthError};

use crate::config::BasicAuthCredentials;

const CHALLENGE: &str = r#"Basic realm="roster""#;

/// Rejects requests that do not carry the configured Basic credentials.
pub async fn basic_auth(
    State(credentials): State<BasicAuthCredentials>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let result = parse_basic_authorization(header).and_then(|provided| {
        verify_credentials(
            &provided,
            &credentials.username,
            credentials.password.expose_secret(),
        )
        .map(|()| provided.username)
    });

    match result {
        Ok(username) => {
            tracing::info!(%username, "Authenticated request");
            next.run(request).await
        }
        Err(err) => rejection(err),
    }
}

fn rejection(err: BasicAuthError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
    tracing::warn!(status = %status, error = %err, "Basic authentication failed");

    let mut response = (status, err.public_message()).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    }
    response
}
