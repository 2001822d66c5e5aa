use serde::Deserialize;
use serde_json::Value;

use crate::error::{AuthError, AuthResult};

/// Application-focused representation of verified JWT claims.
#[derive(Debug, Clone)]
pub struct ClaimPayload {
    pub subject: Option<String>,
    pub issuer: String,
    pub audience: Vec<String>,
    pub expires_at: i64,
    /// `None` when the token carries no permissions field at all; an empty
    /// list is a present-but-empty claim and is treated differently by the
    /// permission checker.
    pub permissions: Option<Vec<String>>,
    pub raw: Value,
}

impl ClaimPayload {
    /// Convenience helper for permission checks.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .map(|list| list.iter().any(|value| value == permission))
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimsRepr {
    #[serde(default)]
    sub: Option<String>,
    iss: String,
    #[serde(default)]
    aud: Option<AudienceRepr>,
    exp: i64,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AudienceRepr {
    Single(String),
    Many(Vec<String>),
}

impl TryFrom<Value> for ClaimPayload {
    type Error = AuthError;

    fn try_from(value: Value) -> AuthResult<Self> {
        let repr: ClaimsRepr =
            serde_json::from_value(value.clone()).map_err(|_| AuthError::MalformedToken)?;

        let audience = match repr.aud {
            Some(AudienceRepr::Single(item)) => vec![item],
            Some(AudienceRepr::Many(items)) => items,
            None => Vec::new(),
        };

        Ok(Self {
            subject: repr.sub,
            issuer: repr.iss,
            audience,
            expires_at: repr.exp,
            permissions: repr.permissions,
            raw: value,
        })
    }
}
