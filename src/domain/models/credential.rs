use std::fmt;

use crate::domain::DomainError;

/// User-supplied API key. Held for the session only and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value: String = value.into();
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(DomainError::MissingCredential);
        }
        Ok(Self(value))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_rejected() {
        assert!(Credential::new("   ").unwrap_err().is_missing_credential());
    }

    #[test]
    fn debug_output_is_redacted() {
        let credential = Credential::new("sk-test").unwrap();
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.expose(), "sk-test");
    }
}
