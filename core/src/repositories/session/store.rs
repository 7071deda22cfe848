//! Session store contract
//!
//! The store is the single concurrency primitive of the service: all
//! session mutation goes through the version-checked `update`, which maps
//! to a row-level conditional write on a production backend and to a map
//! with per-key locks in process. There is no ambient lock anywhere else.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::session::RegistrationSession;
use crate::errors::StoreError;

/// Mutation applied to a session under compare-and-swap
///
/// A mutator may run more than once when the conditional write loses a
/// race, so it must be a pure function of the record it is given. The
/// `version` field is owned by the store; mutators must leave it alone.
pub type SessionMutator<'a> = &'a (dyn Fn(RegistrationSession) -> RegistrationSession + Send + Sync);

/// Durable map from session id to session record
///
/// Expired records are treated as absent: reads return
/// [`StoreError::NotFound`] and writes fail. Expiry-based eviction is the
/// only way a record is ever destroyed; there is no explicit delete.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session record
    ///
    /// The store assigns a random 128-bit id (any id on the given record is
    /// ignored) and retains the record for at least `ttl`. Returns the
    /// stored record with its assigned id. Fails only on a storage outage.
    async fn create(&self, session: RegistrationSession, ttl: Duration) -> Result<RegistrationSession, StoreError>;

    /// Fetch the live session with the given id
    async fn get(&self, session_id: &Uuid) -> Result<RegistrationSession, StoreError>;

    /// Apply `mutator` to the current record under compare-and-swap
    ///
    /// The result is written if and only if the record's version is
    /// unchanged since the read; the store then increments the version by
    /// exactly one. Returns [`StoreError::Conflict`] when the version
    /// moved, in which case the caller is expected to retry.
    async fn update(&self, session_id: &Uuid, mutator: SessionMutator<'_>) -> Result<RegistrationSession, StoreError>;
}
