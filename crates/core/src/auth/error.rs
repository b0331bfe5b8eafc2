use thiserror::Error;

/// Reasons a `Basic` authorization header is refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasicAuthError {
    #[error("no basic credentials in the authorization header")]
    MissingCredentials,

    #[error("credentials are not valid base64: {0}")]
    InvalidBase64(String),

    #[error("decoded credentials are not valid UTF-8")]
    InvalidEncoding,

    #[error("decoded credentials are not in user:password form")]
    MalformedCredentials,

    #[error("invalid credentials for user {username:?}")]
    InvalidCredentials { username: String },
}

impl BasicAuthError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials { .. } => 401,
            Self::InvalidBase64(_) | Self::InvalidEncoding | Self::MalformedCredentials => 400,
        }
    }

    /// Plain-text body sent to the client. Never includes the credentials.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials | Self::InvalidCredentials { .. } => "Unauthorized.",
            Self::InvalidBase64(_) => "Bad request - Invalid Base64 format",
            Self::InvalidEncoding => "Bad request",
            Self::MalformedCredentials => "Invalid Base64 credentials format.",
        }
    }
}
