use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::ClaimPayload;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwks::JwksFetcher;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Decoding keys from one JWKS fetch, stamped for expiry.
struct CachedKeys {
    keys: Arc<HashMap<String, DecodingKey>>,
    fetched_at: Instant,
}

/// Verifies RS256 bearer tokens against the keys published by the remote
/// JWKS endpoint. The key set is cached for a short TTL; a TTL of zero
/// re-fetches on every verification.
#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    jwks: JwksFetcher,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CachedKeys>>>,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig, jwks: JwksFetcher) -> Self {
        Self {
            config,
            jwks,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn jwks_fetcher(&self) -> &JwksFetcher {
        &self.jwks
    }

    /// Decode and validate `token`, returning its claims.
    pub async fn verify(&self, token: &str) -> AuthResult<ClaimPayload> {
        let keys = self.decoding_keys().await?;

        let header = decode_header(token).map_err(|_| AuthError::MalformedTokenHeader)?;
        let kid = header.kid.ok_or(AuthError::MalformedTokenHeader)?;

        // The key lookup is settled before any decode attempt; an unknown kid
        // never reaches signature or claim validation.
        let key = match keys.get(&kid) {
            Some(key) => key,
            None => {
                debug!(%kid, "no decoding key matches token kid");
                return Err(AuthError::UnknownKeyId);
            }
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, key, &validation).map_err(classify_decode_error)?;
        let claims = ClaimPayload::try_from(token_data.claims)?;
        debug!(%kid, "verified bearer token");
        Ok(claims)
    }

    async fn decoding_keys(&self) -> AuthResult<Arc<HashMap<String, DecodingKey>>> {
        if !self.cache_ttl.is_zero() {
            let guard = self.cache.read().expect("rwlock poisoned");
            if let Some(cached) = guard.as_ref() {
                if cached.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(Arc::clone(&cached.keys));
                }
            }
        }

        let fetched = self.jwks.fetch().await?;
        let keys: Arc<HashMap<String, DecodingKey>> = Arc::new(fetched.into_iter().collect());
        debug!(count = keys.len(), "refreshed JWKS key set");

        let mut guard = self.cache.write().expect("rwlock poisoned");
        *guard = Some(CachedKeys {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        _ => AuthError::MalformedToken,
    }
}
