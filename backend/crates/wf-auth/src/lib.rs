pub mod claims;
pub mod error;
pub mod extract;
pub mod password;
pub mod token_codec;

pub use claims::{AccessClaims, RefreshClaims};
pub use error::{AuthError, Result};
pub use extract::{bearer_token, cookie_value, extract_access_token, extract_refresh_token};
pub use token_codec::TokenCodec;
