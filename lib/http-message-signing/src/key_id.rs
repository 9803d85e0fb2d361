use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// Identifier the receiver uses to look up the key material of a client
///
/// Comparison is an exact string comparison. The empty value stands for "unset".
#[derive(Clone, Debug, Default, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    /// Unset key ID
    pub const EMPTY: Self = Self(String::new());

    /// Construct a new key ID
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Whether this is the unset sentinel
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for KeyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for KeyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
