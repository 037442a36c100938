use std::fmt;

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Supplies the session credential for each fetch. Storage and renewal live elsewhere.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    credential: Option<Credential>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            credential: token.map(Credential::new),
        }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self) -> Option<Credential> {
        self.credential.clone()
    }
}
