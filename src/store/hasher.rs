//! Argon2id password hashing.
//!
//! Every hash carries its own random salt and cost parameters in PHC string
//! form (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<digest>`), so verification
//! needs nothing but the stored string.

use super::CredentialError;
use argon2::{
    password_hash::{self, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use rand::rngs::OsRng;

#[derive(Clone, Debug)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher {
    /// Build a hasher with explicit Argon2id costs.
    ///
    /// # Errors
    /// Returns [`CredentialError::Params`] if argon2 rejects the combination,
    /// e.g. memory below `8 * parallelism` KiB or zero iterations.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| CredentialError::Params(e.to_string()))?;

        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh salt.
    ///
    /// # Errors
    /// Returns [`CredentialError::Hash`] if the primitive fails.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// Check a candidate password against a stored PHC string.
    ///
    /// The cost parameters are read from the stored string, not from `self`,
    /// so hashes made under older settings keep verifying.
    ///
    /// # Errors
    /// Returns [`CredentialError::MalformedHash`] if `stored` is not a PHC
    /// string and [`CredentialError::Hash`] if the primitive fails.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored).map_err(|_| CredentialError::MalformedHash)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Hash(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast_hasher() -> CredentialHasher {
        CredentialHasher::new(8, 1, 1).unwrap()
    }

    #[test]
    fn default_uses_argon2_defaults() {
        let hasher = CredentialHasher::default();
        assert_eq!(hasher.params().m_cost(), Params::DEFAULT_M_COST);
        assert_eq!(hasher.params().t_cost(), Params::DEFAULT_T_COST);
        assert_eq!(hasher.params().p_cost(), Params::DEFAULT_P_COST);
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(matches!(
            CredentialHasher::new(8, 0, 1),
            Err(CredentialError::Params(_))
        ));
        assert!(matches!(
            CredentialHasher::new(4, 1, 1),
            Err(CredentialError::Params(_))
        ));
    }

    #[test]
    fn hash_is_phc_argon2id() {
        let hash = fast_hasher().hash("password123").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(!hash.contains("password123"));
    }

    #[test]
    fn hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("password123").unwrap();
        assert!(hasher.verify("password123", &hash).unwrap());
        assert!(!hasher.verify("password124", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = fast_hasher();
        let first = hasher.hash("pw123456").unwrap();
        let second = hasher.hash("pw123456").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("pw123456", &first).unwrap());
        assert!(hasher.verify("pw123456", &second).unwrap());
    }

    #[test]
    fn verify_uses_params_from_stored_hash() {
        let old = CredentialHasher::new(16, 2, 1).unwrap();
        let hash = old.hash("pw123456").unwrap();
        assert!(fast_hasher().verify("pw123456", &hash).unwrap());
    }

    #[test]
    fn empty_password_hashes() {
        let hasher = fast_hasher();
        let hash = hasher.hash("").unwrap();
        assert!(hasher.verify("", &hash).unwrap());
        assert!(!hasher.verify("x", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("password123", "password123"),
            Err(CredentialError::MalformedHash)
        ));
        assert!(matches!(
            hasher.verify("password123", ""),
            Err(CredentialError::MalformedHash)
        ));
    }
}
