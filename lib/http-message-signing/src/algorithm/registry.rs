use super::{
    EcdsaSignatureAlgorithm, HashAlgorithm, HmacSignatureAlgorithm, RsaSignatureAlgorithm,
    SignatureAlgorithm, SignatureAlgorithmKind,
};
use crate::{Error, Result};
use std::{collections::HashMap, fmt, sync::Arc};

/// Constructor of a keyed algorithm instance from its hash and raw key material
pub type AlgorithmConstructor =
    Arc<dyn Fn(HashAlgorithm, &[u8]) -> Result<Box<dyn SignatureAlgorithm>> + Send + Sync>;

/// Mapping of family names to algorithm constructors
///
/// `rsa`, `hmac` and `ecdsa` are registered by default. Names are case-insensitive.
#[derive(Clone)]
pub struct SignatureAlgorithmRegistry {
    constructors: HashMap<String, AlgorithmConstructor>,
}

impl SignatureAlgorithmRegistry {
    /// Construct a registry without any algorithms
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under the family name, replacing any previous one
    pub fn register<F>(&mut self, name: impl AsRef<str>, constructor: F) -> &mut Self
    where
        F: Fn(HashAlgorithm, &[u8]) -> Result<Box<dyn SignatureAlgorithm>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.as_ref().to_lowercase(), Arc::new(constructor));
        self
    }

    /// Whether a constructor is registered for the family
    #[must_use]
    pub fn contains(&self, kind: &SignatureAlgorithmKind) -> bool {
        self.constructors.contains_key(&kind.name())
    }

    /// Construct a keyed algorithm instance
    pub fn create(
        &self,
        kind: &SignatureAlgorithmKind,
        hash: HashAlgorithm,
        key_material: &[u8],
    ) -> Result<Box<dyn SignatureAlgorithm>> {
        let name = kind.name();
        let constructor = self
            .constructors
            .get(&name)
            .ok_or_else(|| Error::UnsupportedAlgorithm {
                family: name.clone(),
                hash: hash.to_string(),
            })?;

        constructor(hash, key_material)
    }
}

impl Default for SignatureAlgorithmRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("rsa", |hash, key_material| {
                Ok(Box::new(RsaSignatureAlgorithm::from_key_material(
                    hash,
                    key_material,
                )?))
            })
            .register("hmac", |hash, key_material| {
                Ok(Box::new(HmacSignatureAlgorithm::new(hash, key_material)?))
            })
            .register("ecdsa", |hash, key_material| {
                Ok(Box::new(EcdsaSignatureAlgorithm::from_key_material(
                    hash,
                    key_material,
                )?))
            });

        registry
    }
}

impl fmt::Debug for SignatureAlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::SignatureAlgorithmRegistry;
    use crate::algorithm::{
        CustomSignatureAlgorithm, HashAlgorithm, SignatureAlgorithmKind,
    };
    use crate::Error;

    #[test]
    fn defaults() {
        let registry = SignatureAlgorithmRegistry::default();
        assert!(registry.contains(&SignatureAlgorithmKind::Rsa));
        assert!(registry.contains(&SignatureAlgorithmKind::Hmac));
        assert!(registry.contains(&SignatureAlgorithmKind::Ecdsa));

        let algorithm = registry
            .create(&SignatureAlgorithmKind::Hmac, HashAlgorithm::Sha384, b"s3cr3t")
            .unwrap();
        assert_eq!(algorithm.identifier(), "hmac-sha384");
    }

    #[test]
    fn unknown_family() {
        let registry = SignatureAlgorithmRegistry::default();
        let result = registry.create(
            &SignatureAlgorithmKind::Custom("Reverse".into()),
            HashAlgorithm::Sha256,
            b"",
        );
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm { .. })));
    }

    #[test]
    fn custom_family() {
        let mut registry = SignatureAlgorithmRegistry::default();
        registry.register("Reverse", |hash, _key_material| {
            Ok(Box::new(CustomSignatureAlgorithm::new(
                "Reverse",
                hash,
                |_hash, content| Ok(content.iter().rev().copied().collect()),
            )))
        });

        let algorithm = registry
            .create(
                &SignatureAlgorithmKind::from("reverse"),
                HashAlgorithm::Sha256,
                b"",
            )
            .unwrap();
        assert_eq!(algorithm.compute_hash(b"ab").unwrap(), b"ba");
    }
}
