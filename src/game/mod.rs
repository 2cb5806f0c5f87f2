//! Game service: runs the pipeline on finished runs and persists the result.
//!
//! A [`GameService`] owns one user's [`GameSnapshot`]. Every mutation builds
//! the next snapshot off to the side, writes it to the [`GameStore`] and only
//! then swaps it in. If a write fails partway, collections that were already
//! written are restored from the current snapshot before the error returns.

pub mod store;

pub use store::{GameStore, MemoryStore, StoreError};

use crate::achievements::{default_achievements, evaluate, Achievement, CumulativeStats};
use crate::progression::{apply_run, ProgressionUpdate};
use crate::recording::types::RunRecord;
use crate::storage::config::UserProfile;
use crate::territory::{claim_territory, Territory, TerritoryConfig};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// All persisted state for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub profile: UserProfile,
    /// Newest first
    pub runs: Vec<RunRecord>,
    pub territories: Vec<Territory>,
    pub achievements: Vec<Achievement>,
}

impl GameSnapshot {
    /// Counters feeding achievement progress.
    pub fn cumulative_stats(&self) -> CumulativeStats {
        CumulativeStats::collect(&self.profile, &self.runs, self.territories.len())
    }
}

/// What finishing a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub run: RunRecord,
    pub territory: Option<Territory>,
    pub progression: ProgressionUpdate,
    /// Achievements unlocked by this run
    pub newly_unlocked: Vec<Achievement>,
}

/// Game service errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("No profile has been created")]
    NoProfile,
}

type CollectionWrite<S> = fn(&mut S, &GameSnapshot) -> Result<(), StoreError>;

fn write_runs<S: GameStore>(store: &mut S, snapshot: &GameSnapshot) -> Result<(), StoreError> {
    store.save_runs(&snapshot.runs)
}

fn write_territories<S: GameStore>(
    store: &mut S,
    snapshot: &GameSnapshot,
) -> Result<(), StoreError> {
    store.save_territories(&snapshot.territories)
}

fn write_profile<S: GameStore>(store: &mut S, snapshot: &GameSnapshot) -> Result<(), StoreError> {
    store.save_profile(&snapshot.profile)
}

fn write_achievements<S: GameStore>(
    store: &mut S,
    snapshot: &GameSnapshot,
) -> Result<(), StoreError> {
    store.save_achievements(&snapshot.achievements)
}

/// One user's game state backed by a store.
pub struct GameService<S: GameStore> {
    store: S,
    snapshot: GameSnapshot,
    territory_config: TerritoryConfig,
}

impl<S: GameStore> GameService<S> {
    /// Load existing state. Seeds the default achievements if none are stored.
    pub fn load(mut store: S, territory_config: TerritoryConfig) -> Result<Self, GameError> {
        let profile = store.load_profile()?.ok_or(GameError::NoProfile)?;
        let runs = store.load_runs()?;
        let territories = store.load_territories()?;
        let mut achievements = store.load_achievements()?;

        if achievements.is_empty() {
            achievements = default_achievements();
            store.save_achievements(&achievements)?;
            tracing::info!("Seeded {} default achievements", achievements.len());
        }

        tracing::info!(
            "Loaded profile {} ({} runs, {} territories)",
            profile.username,
            runs.len(),
            territories.len()
        );

        Ok(Self {
            store,
            snapshot: GameSnapshot {
                profile,
                runs,
                territories,
                achievements,
            },
            territory_config,
        })
    }

    /// Start fresh state for a new profile, replacing anything stored.
    pub fn create(
        mut store: S,
        profile: UserProfile,
        territory_config: TerritoryConfig,
    ) -> Result<Self, GameError> {
        let snapshot = GameSnapshot {
            profile,
            runs: Vec::new(),
            territories: Vec::new(),
            achievements: default_achievements(),
        };

        for write in Self::writes() {
            write(&mut store, &snapshot)?;
        }

        tracing::info!("Created profile {}", snapshot.profile.username);

        Ok(Self {
            store,
            snapshot,
            territory_config,
        })
    }

    fn writes() -> [CollectionWrite<S>; 4] {
        [
            write_runs::<S>,
            write_territories::<S>,
            write_profile::<S>,
            write_achievements::<S>,
        ]
    }

    /// Run a finished run through territory, progression and achievements.
    pub fn finish_run(
        &mut self,
        run: RunRecord,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, GameError> {
        let current = &self.snapshot;

        let mut runs = Vec::with_capacity(current.runs.len() + 1);
        runs.push(run.clone());
        runs.extend(current.runs.iter().cloned());

        let territory = claim_territory(
            &run,
            current.profile.id,
            &current.profile.territory_color,
            &self.territory_config,
        );
        let mut territories = current.territories.clone();
        territories.extend(territory.clone());

        let (profile, progression) = apply_run(&current.profile, &run, now.date_naive());

        let mut next = GameSnapshot {
            profile,
            runs,
            territories,
            achievements: Vec::new(),
        };
        let evaluation = evaluate(&current.achievements, &next.cumulative_stats(), now);
        let newly_unlocked = evaluation.unlocked().cloned().collect();
        next.achievements = evaluation.achievements;

        self.commit(next)?;

        if progression.leveled_up() {
            tracing::info!(
                "Level up: {} -> {}",
                progression.previous_level,
                progression.new_level
            );
        }

        Ok(RunOutcome {
            run,
            territory,
            progression,
            newly_unlocked,
        })
    }

    /// Record an externally claimed territory and refresh achievements.
    pub fn add_territory(
        &mut self,
        territory: Territory,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>, GameError> {
        let current = &self.snapshot;

        let mut territories = current.territories.clone();
        territories.push(territory);

        let mut next = GameSnapshot {
            profile: current.profile.clone(),
            runs: current.runs.clone(),
            territories,
            achievements: Vec::new(),
        };
        let evaluation = evaluate(&current.achievements, &next.cumulative_stats(), now);
        let newly_unlocked = evaluation.unlocked().cloned().collect();
        next.achievements = evaluation.achievements;

        self.commit(next)?;
        Ok(newly_unlocked)
    }

    /// Persist `next` and adopt it.
    fn commit(&mut self, next: GameSnapshot) -> Result<(), GameError> {
        let writes = Self::writes();

        for (done, write) in writes.iter().enumerate() {
            if let Err(err) = write(&mut self.store, &next) {
                tracing::error!("Failed to persist game state: {}", err);

                for undo in writes[..done].iter().rev() {
                    if let Err(rollback) = undo(&mut self.store, &self.snapshot) {
                        tracing::warn!("Rollback failed, store may be inconsistent: {}", rollback);
                    }
                }

                return Err(GameError::Store(err));
            }
        }

        self.snapshot = next;
        Ok(())
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn profile(&self) -> &UserProfile {
        &self.snapshot.profile
    }

    pub fn runs(&self) -> &[RunRecord] {
        &self.snapshot.runs
    }

    pub fn territories(&self) -> &[Territory] {
        &self.snapshot.territories
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.snapshot.achievements
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
