//! Account identities

use serde::{Deserialize, Serialize};

/// Identity of an account, contract, or funding recipient
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// A fresh random 20-byte address in `0x` hex form.
    pub fn generate() -> Self {
        let high = uuid::Uuid::new_v4();
        let low = uuid::Uuid::new_v4();
        let hex: String = high
            .as_bytes()
            .iter()
            .chain(low.as_bytes().iter().take(4))
            .map(|byte| format!("{:02x}", byte))
            .collect();
        Self(format!("0x{}", hex))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display, e.g. `0x1234…cdef`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_addresses_are_distinct() {
        let a = Address::generate();
        let b = Address::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("0x"));
        assert_eq!(a.as_str().len(), 42);
    }

    #[test]
    fn test_short_form() {
        let address = Address::new("0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(address.short(), "0x1234…5678");
        assert_eq!(Address::new("alice").short(), "alice");
    }
}
