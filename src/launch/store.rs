//! Registry of in-flight coordinated launches.
//!
//! Each coordinated launch is independent; the registry exists so that
//! commands issued outside a launch (the restart helper) and diagnostics
//! can find the currently active sessions. No state is shared between
//! launches beyond this bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::host::SessionHandle;
use super::id::LaunchId;
use super::state::LaunchPhase;
use crate::error::LaunchError;
use crate::Result;

/// Bookkeeping for one coordinated launch.
pub struct LaunchRecord {
    /// Unique identifier.
    pub id: LaunchId,
    /// Current phase.
    pub phase: LaunchPhase,
    /// Handle to the python session once it is running.
    pub interpreted: Option<Arc<dyn SessionHandle>>,
    /// Time when the launch was requested.
    pub created_at: Instant,
}

impl LaunchRecord {
    fn new(id: LaunchId) -> Self {
        Self {
            id,
            phase: LaunchPhase::Idle,
            interpreted: None,
            created_at: Instant::now(),
        }
    }
}

impl Clone for LaunchRecord {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            phase: self.phase,
            interpreted: self.interpreted.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for LaunchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchRecord")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("interpreted", &self.interpreted.is_some())
            .finish()
    }
}

/// Thread-safe registry of coordinated launches.
pub struct LaunchRegistry {
    launches: RwLock<HashMap<LaunchId, LaunchRecord>>,
}

impl LaunchRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            launches: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new coordinated launch.
    ///
    /// Finished launches are swept out here so records don't pile up in a
    /// long-lived host process. The newest resumed record with a session
    /// handle survives the sweep; the restart helper still needs it.
    ///
    /// Returns the newly assigned launch ID.
    pub fn create(&self) -> Result<LaunchId> {
        let id = LaunchId::new();
        let record = LaunchRecord::new(id);

        let mut launches = self
            .launches
            .write()
            .map_err(|_| LaunchError::LockPoisoned)?;

        let keep = launches
            .values()
            .filter(|r| r.phase == LaunchPhase::Resumed && r.interpreted.is_some())
            .max_by_key(|r| r.created_at)
            .map(|r| r.id);
        launches.retain(|_, r| !r.phase.is_terminal() || Some(r.id) == keep);

        launches.insert(id, record);
        Ok(id)
    }

    /// Get a clone of the record with the given ID.
    pub fn get(&self, id: &LaunchId) -> Result<Option<LaunchRecord>> {
        let launches = self
            .launches
            .read()
            .map_err(|_| LaunchError::LockPoisoned)?;
        Ok(launches.get(id).cloned())
    }

    /// Update a record using a closure.
    pub fn update<F>(&self, id: &LaunchId, f: F) -> Result<()>
    where
        F: FnOnce(&mut LaunchRecord),
    {
        let mut launches = self
            .launches
            .write()
            .map_err(|_| LaunchError::LockPoisoned)?;

        let record = launches
            .get_mut(id)
            .ok_or_else(|| LaunchError::UnknownLaunch(id.to_string()))?;

        f(record);
        Ok(())
    }

    /// Remove a record from the registry.
    pub fn remove(&self, id: &LaunchId) -> Result<Option<LaunchRecord>> {
        let mut launches = self
            .launches
            .write()
            .map_err(|_| LaunchError::LockPoisoned)?;
        Ok(launches.remove(id))
    }

    /// Number of registered launches.
    pub fn count(&self) -> usize {
        self.launches.read().map(|l| l.len()).unwrap_or(0)
    }

    /// The most recently requested launch whose python session is still
    /// underway, if any.
    pub fn active_interpreted(&self) -> Result<Option<(LaunchId, Arc<dyn SessionHandle>)>> {
        let launches = self
            .launches
            .read()
            .map_err(|_| LaunchError::LockPoisoned)?;

        let newest = launches
            .values()
            .filter(|r| !matches!(r.phase, LaunchPhase::Aborted))
            .filter_map(|r| r.interpreted.clone().map(|h| (r.id, r.created_at, h)))
            .max_by_key(|(_, created_at, _)| *created_at);

        Ok(newest.map(|(id, _, handle)| (id, handle)))
    }
}

impl Default for LaunchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
