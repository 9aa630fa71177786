use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult};

/// Bearer token issued by the backend at login.
///
/// Opaque to the client. A token is only constructible from a non-blank string;
/// whether the backend still accepts it is only known after a request.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Unauthorized);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("auth token cannot contain whitespace"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Never print the token itself.
impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AuthToken(***{})", self.0.len())
    }
}

impl TryFrom<String> for AuthToken {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuthToken> for String {
    fn from(value: AuthToken) -> Self {
        value.0
    }
}
