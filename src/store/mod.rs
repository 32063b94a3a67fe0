//! Credential store: one identity record per username, Argon2id-hashed.
//!
//! The store trusts its caller for input canonicalization (usernames are
//! trimmed at the HTTP boundary) and never re-validates; it only has to stay
//! well-behaved on odd input such as empty strings.

mod error;
mod hasher;

pub use error::CredentialError;
pub use hasher::CredentialHasher;

use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

// Verified against when the username is unknown so both login outcomes cost
// one Argon2 evaluation.
const DECOY_PASSWORD: &str = "passgate-decoy-credential";

/// Capability interface of a credential store.
///
/// Calls block on password hashing; async callers should run them on a
/// blocking thread.
pub trait CredentialStore: Send + Sync {
    /// Create a record for `username` unless one exists.
    ///
    /// Returns `Ok(false)` without mutating anything if the username is taken.
    ///
    /// # Errors
    /// Only when the hashing primitive fails.
    fn register(&self, username: &str, password: &str) -> Result<bool, CredentialError>;

    /// Check `password` against the record for `username`.
    ///
    /// Unknown usernames and wrong passwords both return `Ok(false)`.
    ///
    /// # Errors
    /// Only when the hashing primitive fails or a stored hash is unreadable.
    fn authenticate(&self, username: &str, password: &str) -> Result<bool, CredentialError>;

    fn exists(&self, username: &str) -> bool;
}

#[derive(Clone)]
pub struct IdentityRecord {
    username: String,
    credential_hash: String,
}

impl IdentityRecord {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }
}

impl fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("username", &self.username)
            .field("credential_hash", &"[redacted]")
            .finish()
    }
}

/// Process-memory credential store, empty at construction.
pub struct MemoryCredentialStore {
    hasher: CredentialHasher,
    records: RwLock<HashMap<String, IdentityRecord>>,
    decoy_hash: String,
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("hasher", &self.hasher)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

impl MemoryCredentialStore {
    /// Build an empty store. The decoy hash is computed here, so no login
    /// ever pays for it.
    ///
    /// # Errors
    /// Returns the hashing error if the decoy hash cannot be computed.
    pub fn new(hasher: CredentialHasher) -> Result<Self, CredentialError> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            hasher,
            records: RwLock::new(HashMap::new()),
            decoy_hash,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of a stored record.
    #[must_use]
    pub fn record(&self, username: &str) -> Option<IdentityRecord> {
        self.read().get(username).cloned()
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, IdentityRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, IdentityRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    #[instrument(skip(self, password))]
    fn register(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        if self.exists(username) {
            debug!("Username already registered");
            return Ok(false);
        }

        // Hash outside the lock; the insert below re-checks atomically.
        let credential_hash = self.hasher.hash(password)?;

        match self.write().entry(username.to_string()) {
            Entry::Occupied(_) => {
                debug!("Username registered concurrently");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                slot.insert(IdentityRecord {
                    username: username.to_string(),
                    credential_hash,
                });
                debug!("Identity record created");
                Ok(true)
            }
        }
    }

    #[instrument(skip(self, password))]
    fn authenticate(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let stored = self
            .read()
            .get(username)
            .map(|record| record.credential_hash.clone());

        if let Some(credential_hash) = stored {
            return self.hasher.verify(password, &credential_hash);
        }

        debug!("Unknown username");
        self.hasher.verify(password, &self.decoy_hash)?;

        Ok(false)
    }

    fn exists(&self, username: &str) -> bool {
        self.read().contains_key(username)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::thread;

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::new(CredentialHasher::new(8, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn starts_empty() {
        let store = store();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(!store.exists("anyone"));
    }

    #[test]
    fn register_then_authenticate() {
        let store = store();
        assert!(store.register("e2e@example.com", "password123").unwrap());
        assert!(store.exists("e2e@example.com"));
        assert!(store
            .authenticate("e2e@example.com", "password123")
            .unwrap());
        assert!(!store
            .authenticate("e2e@example.com", "password12")
            .unwrap());
    }

    #[test]
    fn duplicate_registration_keeps_first_password() {
        let store = store();
        assert!(store.register("u@example.com", "pw123456").unwrap());
        assert!(!store.register("u@example.com", "other123").unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.authenticate("u@example.com", "pw123456").unwrap());
        assert!(!store.authenticate("u@example.com", "other123").unwrap());
    }

    #[test]
    fn decoy_hash_is_ready_after_construction() {
        let store = store();
        assert!(store.decoy_hash.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(store.hasher.verify(DECOY_PASSWORD, &store.decoy_hash).unwrap());

        let before = store.decoy_hash.clone();
        assert!(!store.authenticate("never@example.com", "anything").unwrap());
        assert_eq!(store.decoy_hash, before);
    }

    #[test]
    fn unknown_user_is_rejected() {
        let store = store();
        assert!(!store.authenticate("never@example.com", "anything").unwrap());
        assert!(!store.authenticate("never@example.com", "").unwrap());
        assert!(!store.exists("never@example.com"));
    }

    #[test]
    fn usernames_are_case_sensitive_and_not_trimmed() {
        let store = store();
        assert!(store.register("Alice", "secret99").unwrap());
        assert!(store.register("alice", "secret99").unwrap());
        assert!(store.register(" alice ", "secret99").unwrap());
        assert_eq!(store.len(), 3);
        assert!(!store.authenticate("ALICE", "secret99").unwrap());
    }

    #[test]
    fn same_password_produces_distinct_hashes() {
        let store = store();
        assert!(store.register("a@example.com", "shared-pw").unwrap());
        assert!(store.register("b@example.com", "shared-pw").unwrap());

        let first = store.record("a@example.com").unwrap();
        let second = store.record("b@example.com").unwrap();
        assert_ne!(first.credential_hash(), second.credential_hash());
        assert!(store.authenticate("a@example.com", "shared-pw").unwrap());
        assert!(store.authenticate("b@example.com", "shared-pw").unwrap());
    }

    #[test]
    fn record_never_holds_plaintext() {
        let store = store();
        assert!(store.register("plain@example.com", "hunter22").unwrap());
        let record = store.record("plain@example.com").unwrap();
        assert_eq!(record.username(), "plain@example.com");
        assert!(!record.credential_hash().contains("hunter22"));
        assert!(!format!("{record:?}").contains(record.credential_hash()));
    }

    #[test]
    fn empty_inputs_do_not_panic() {
        let store = store();
        assert!(!store.authenticate("", "").unwrap());
        assert!(store.register("", "").unwrap());
        assert!(!store.register("", "").unwrap());
        assert!(store.authenticate("", "").unwrap());
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        let store = Arc::new(store());
        let winners = Arc::new(AtomicUsize::new(0));

        thread::scope(|scope| {
            for i in 0..8 {
                let store = Arc::clone(&store);
                let winners = Arc::clone(&winners);
                scope.spawn(move || {
                    if store
                        .register("race@example.com", &format!("password-{i}"))
                        .unwrap()
                    {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);

        let verified = (0..8)
            .filter(|i| {
                store
                    .authenticate("race@example.com", &format!("password-{i}"))
                    .unwrap()
            })
            .count();
        assert_eq!(verified, 1);
    }

    #[test]
    fn concurrent_registration_of_distinct_users() {
        let store = Arc::new(store());

        thread::scope(|scope| {
            for i in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    assert!(store
                        .register(&format!("user{i}@example.com"), "password123")
                        .unwrap());
                });
            }
        });

        assert_eq!(store.len(), 8);
    }

    #[test]
    fn usable_as_trait_object() {
        let store: Arc<dyn CredentialStore> = Arc::new(store());
        assert!(store.register("dyn@example.com", "password123").unwrap());
        assert!(store.exists("dyn@example.com"));
    }
}
