use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub database_url: String,
    /// Tenant domain hosting the JWKS document and issuing tokens.
    pub auth_domain: String,
    pub auth_audience: String,
    pub auth_leeway_seconds: u32,
    /// TTL for the in-process JWKS cache; zero re-fetches per verification.
    pub jwks_cache_ttl: Duration,
}

pub fn load_config() -> Result<ServiceConfig> {
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);
    let ip: std::net::IpAddr = host.parse().context("Failed to parse HOST")?;
    let addr = SocketAddr::from((ip, port));

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let auth_domain = env::var("AUTH_DOMAIN").context("AUTH_DOMAIN must be set")?;
    let auth_audience = env::var("AUTH_AUDIENCE").context("AUTH_AUDIENCE must be set")?;

    let auth_leeway_seconds = u64_from_env("AUTH_LEEWAY_SECONDS")
        .unwrap_or(30)
        .try_into()
        .context("AUTH_LEEWAY_SECONDS out of range")?;
    let jwks_cache_ttl = Duration::from_secs(u64_from_env("JWKS_CACHE_TTL_SECONDS").unwrap_or(60));

    Ok(ServiceConfig {
        addr,
        database_url,
        auth_domain,
        auth_audience,
        auth_leeway_seconds,
        jwks_cache_ttl,
    })
}

fn u64_from_env(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
