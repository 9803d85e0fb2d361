//!
//! Mandatory headers per algorithm family
//!

use crate::{algorithm::HS2019, HeaderName, ValidationError};
use std::collections::HashMap;

/// Headers a family requires or forbids in the signed header list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderRequirement {
    /// Headers that have to be part of the signature
    pub required: Vec<HeaderName>,

    /// Headers that must not be part of the signature
    pub forbidden: Vec<HeaderName>,
}

/// Mapping of algorithm family tokens to their header requirements
///
/// `(request-target)` is required regardless of the family.
/// Families without an entry are rejected.
#[derive(Clone, Debug)]
pub struct MandatoryHeaderPolicy {
    families: HashMap<String, HeaderRequirement>,
}

impl MandatoryHeaderPolicy {
    /// Policy without any families
    #[must_use]
    pub fn empty() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    /// Add or replace the requirement of a family
    #[must_use]
    pub fn with_family(mut self, family: impl AsRef<str>, requirement: HeaderRequirement) -> Self {
        self.families
            .insert(family.as_ref().to_lowercase(), requirement);
        self
    }

    /// Family token of an algorithm identifier
    ///
    /// `rsa-sha256` yields `rsa`, an absent identifier yields `hs2019`
    #[must_use]
    pub fn family_of(algorithm: Option<&str>) -> String {
        let Some(algorithm) = algorithm.map(str::trim).filter(|value| !value.is_empty()) else {
            return HS2019.into();
        };

        algorithm
            .split('-')
            .next()
            .unwrap_or(algorithm)
            .to_lowercase()
    }

    /// Requirement of the family
    pub fn requirement(&self, family: &str) -> Result<&HeaderRequirement, ValidationError> {
        self.families
            .get(&family.to_lowercase())
            .ok_or_else(|| ValidationError::UnknownAlgorithmFamily(family.to_string()))
    }

    /// Requirement of the family an algorithm identifier belongs to
    pub fn requirement_for(
        &self,
        algorithm: Option<&str>,
    ) -> Result<&HeaderRequirement, ValidationError> {
        self.requirement(&Self::family_of(algorithm))
    }
}

impl Default for MandatoryHeaderPolicy {
    fn default() -> Self {
        let legacy = HeaderRequirement {
            required: vec![HeaderName::DATE],
            forbidden: vec![HeaderName::CREATED, HeaderName::EXPIRES],
        };
        let hs2019 = HeaderRequirement {
            required: vec![HeaderName::CREATED, HeaderName::EXPIRES],
            forbidden: Vec::new(),
        };

        Self::empty()
            .with_family("rsa", legacy.clone())
            .with_family("hmac", legacy.clone())
            .with_family("ecdsa", legacy)
            .with_family(HS2019, hs2019)
    }
}
