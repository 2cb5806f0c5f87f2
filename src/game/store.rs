//! Persistence seam for game state.

use crate::achievements::Achievement;
use crate::recording::types::RunRecord;
use crate::storage::config::UserProfile;
use crate::storage::database::DatabaseError;
use crate::territory::Territory;
use thiserror::Error;

/// Whole-collection storage for one user's game state.
///
/// Every `save_*` call replaces the stored collection. Runs are kept newest
/// first. Implementations must either apply a write completely or leave the
/// previous collection in place.
pub trait GameStore {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError>;
    fn load_runs(&self) -> Result<Vec<RunRecord>, StoreError>;
    fn load_territories(&self) -> Result<Vec<Territory>, StoreError>;
    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError>;

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StoreError>;
    fn save_runs(&mut self, runs: &[RunRecord]) -> Result<(), StoreError>;
    fn save_territories(&mut self, territories: &[Territory]) -> Result<(), StoreError>;
    fn save_achievements(&mut self, achievements: &[Achievement]) -> Result<(), StoreError>;
}

/// Store errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::SerializationError(msg) => StoreError::Serialization(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Volatile store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub profile: Option<UserProfile>,
    pub runs: Vec<RunRecord>,
    pub territories: Vec<Territory>,
    pub achievements: Vec<Achievement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profile.clone())
    }

    fn load_runs(&self) -> Result<Vec<RunRecord>, StoreError> {
        Ok(self.runs.clone())
    }

    fn load_territories(&self) -> Result<Vec<Territory>, StoreError> {
        Ok(self.territories.clone())
    }

    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        Ok(self.achievements.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn save_runs(&mut self, runs: &[RunRecord]) -> Result<(), StoreError> {
        self.runs = runs.to_vec();
        Ok(())
    }

    fn save_territories(&mut self, territories: &[Territory]) -> Result<(), StoreError> {
        self.territories = territories.to_vec();
        Ok(())
    }

    fn save_achievements(&mut self, achievements: &[Achievement]) -> Result<(), StoreError> {
        self.achievements = achievements.to_vec();
        Ok(())
    }
}
