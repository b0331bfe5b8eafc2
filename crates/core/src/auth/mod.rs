mod basic;
mod error;

pub use basic::{
    encode_basic_authorization, parse_basic_authorization, verify_credentials, BasicCredentials,
};
pub use error::BasicAuthError;
