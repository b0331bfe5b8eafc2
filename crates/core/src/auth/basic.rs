use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::BasicAuthError;

const SCHEME: &str = "Basic";

/// Username and password decoded from a `Basic` authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decodes the value of an `Authorization` header.
///
/// The scheme is matched case-insensitively. The decoded payload must contain
/// exactly one `:` separating username and password.
///
/// # Examples
///
/// ```
/// use roster_core::auth::{parse_basic_authorization, BasicAuthError};
///
/// // "admin:secret"
/// let credentials = parse_basic_authorization(Some("Basic YWRtaW46c2VjcmV0")).unwrap();
/// assert_eq!(credentials.username, "admin");
/// assert_eq!(credentials.password, "secret");
///
/// assert_eq!(
///     parse_basic_authorization(Some("Bearer token")),
///     Err(BasicAuthError::MissingCredentials)
/// );
/// ```
pub fn parse_basic_authorization(header: Option<&str>) -> Result<BasicCredentials, BasicAuthError> {
    let header = header.unwrap_or_default();

    let has_scheme = header
        .get(..SCHEME.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(SCHEME));
    if !has_scheme {
        return Err(BasicAuthError::MissingCredentials);
    }

    let encoded = header[SCHEME.len()..].trim();
    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| BasicAuthError::InvalidBase64(e.to_string()))?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::InvalidEncoding)?;

    let mut parts = decoded.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(username), Some(password), None) => Ok(BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => Err(BasicAuthError::MalformedCredentials),
    }
}

/// Compares two secrets without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Checks decoded credentials against the configured pair.
pub fn verify_credentials(
    provided: &BasicCredentials,
    username: &str,
    password: &str,
) -> Result<(), BasicAuthError> {
    let user_ok = constant_time_eq(provided.username.as_bytes(), username.as_bytes());
    let pass_ok = constant_time_eq(provided.password.as_bytes(), password.as_bytes());

    if user_ok && pass_ok {
        Ok(())
    } else {
        Err(BasicAuthError::InvalidCredentials {
            username: provided.username.clone(),
        })
    }
}

/// Builds a header value for the given credentials.
pub fn encode_basic_authorization(username: &str, password: &str) -> String {
    format!("{SCHEME} {}", STANDARD.encode(format!("{username}:{password}")))
}
