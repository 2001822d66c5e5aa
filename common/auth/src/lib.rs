pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod guards;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::ClaimPayload;
pub use config::{jwks_url, JwtConfig};
pub use error::{AuthError, AuthResult};
pub use extractors::{bearer_token, AuthContext};
pub use guards::{check_permission, ensure_permission};
pub use jwks::JwksFetcher;
pub use permissions::{
    ALL_PERMISSIONS, PERM_DELETE_DRINKS, PERM_GET_DRINKS_DETAIL, PERM_PATCH_DRINKS,
    PERM_POST_DRINKS,
};
pub use verifier::JwtVerifier;
