/// Immutable verification configuration injected into the verifier.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Expected issuer claim (iss).
    pub issuer: String,
    /// Expected audience claim (aud).
    pub audience: String,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtConfig {
    /// Construct config with sensible defaults (30 second leeway).
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds: 30,
        }
    }

    /// Construct config for a tenant domain. Tokens issued for the domain
    /// carry `https://{domain}/` as their issuer.
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Self {
        Self::new(format!("https://{domain}/"), audience)
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

/// Well-known JWKS location for a tenant domain.
pub fn jwks_url(domain: &str) -> String {
    format!("https://{domain}/.well-known/jwks.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_domain_builds_issuer() {
        let config = JwtConfig::for_domain("drinks.example.com", "drinks-api");
        assert_eq!(config.issuer, "https://drinks.example.com/");
        assert_eq!(config.audience, "drinks-api");
        assert_eq!(config.leeway_seconds, 30);
    }

    #[test]
    fn jwks_url_is_well_known() {
        assert_eq!(
            jwks_url("drinks.example.com"),
            "https://drinks.example.com/.well-known/jwks.json"
        );
    }
}
