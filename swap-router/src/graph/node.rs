use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical token identity: chain id plus case-folded address.
///
/// Two tokens are the same iff both components match; addresses are
/// compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId {
    chain_id: u64,
    address: String,
}

impl TokenId {
    pub fn new(chain_id: u64, address: &str) -> Self {
        Self {
            chain_id,
            address: address.trim().to_ascii_lowercase(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

/// A token known to the router.
///
/// `symbol` and `decimals` are display metadata; equality and hashing go
/// through [`TokenId`] only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(chain_id: u64, address: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            chain_id,
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn id(&self) -> TokenId {
        TokenId::new(self.chain_id, &self.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_identity_is_case_insensitive() {
        let a = Token::new(1, "0xAbCd", "FOO", 18);
        let b = Token::new(1, "0xabcd", "FOO-renamed", 6);
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_token_identity_includes_chain() {
        let a = Token::new(1, "0xabcd", "FOO", 18);
        let b = Token::new(10, "0xabcd", "FOO", 18);
        assert_ne!(a, b);
    }
}
