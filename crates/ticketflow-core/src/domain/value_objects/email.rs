//! Email Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower-cased, trimmed email address with a minimal shape check.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, EmailError> {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return Err(EmailError::Empty);
        }

        let (local, domain) = value.split_once('@').ok_or(EmailError::InvalidFormat)?;
        let domain_ok = domain.contains('.')
            && !domain.contains('@')
            && !domain.starts_with('.')
            && !domain.ends_with('.');
        if local.is_empty() || !domain_ok {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("invalid email format")]
    InvalidFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = Email::parse("  Agent@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "agent@example.com");
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("nobody"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::parse("a@localhost"), Err(EmailError::InvalidFormat));
    }
}
