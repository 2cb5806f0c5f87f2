//! Database operations using rusqlite.
//!
//! Collections are written whole: each `replace_*` call deletes the stored
//! collection and inserts the new one inside a single transaction, so a
//! failed write leaves the previous collection intact.

use crate::achievements::{Achievement, AchievementCategory};
use crate::game::store::{GameStore, StoreError};
use crate::recording::types::RunRecord;
use crate::storage::config::{RunnerGoal, UserProfile};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::territory::Territory;
use crate::tracking::Coordinate;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    /// Schema version currently applied.
    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        self.get_schema_version()
    }

    // ========== Profile ==========

    /// Insert or replace the local profile.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO profile (slot, id, username, email, avatar, bio, goal,
                 country, state, territory_color, xp, level, total_distance_meters, total_runs,
                 current_streak, longest_streak, last_run_date, created_at, updated_at)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    profile.id.to_string(),
                    profile.username,
                    profile.email,
                    profile.avatar,
                    profile.bio,
                    profile.goal.as_str(),
                    profile.country,
                    profile.state,
                    profile.territory_color,
                    to_sql_u64(profile.xp)?,
                    profile.level,
                    profile.total_distance_meters,
                    profile.total_runs,
                    profile.current_streak,
                    profile.longest_streak,
                    profile.last_run_date.map(|d| d.format(DATE_FORMAT).to_string()),
                    profile.created_at.to_rfc3339(),
                    profile.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Load the local profile, if one has been created.
    pub fn get_profile(&self) -> Result<Option<UserProfile>, DatabaseError> {
        let result = self.conn.query_row(
            "SELECT id, username, email, avatar, bio, goal, country, state, territory_color,
             xp, level, total_distance_meters, total_runs, current_streak, longest_streak,
             last_run_date, created_at, updated_at FROM profile WHERE slot = 1",
            [],
            |row| {
                Ok(ProfileRow {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    avatar: row.get(3)?,
                    bio: row.get(4)?,
                    goal: row.get(5)?,
                    country: row.get(6)?,
                    state: row.get(7)?,
                    territory_color: row.get(8)?,
                    xp: row.get(9)?,
                    level: row.get(10)?,
                    total_distance_meters: row.get(11)?,
                    total_runs: row.get(12)?,
                    current_streak: row.get(13)?,
                    longest_streak: row.get(14)?,
                    last_run_date: row.get(15)?,
                    created_at: row.get(16)?,
                    updated_at: row.get(17)?,
                })
            },
        );

        match result {
            Ok(row) => Ok(Some(row.into_profile()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    // ========== Runs ==========

    /// Replace the stored run history. `runs` is newest first.
    pub fn replace_runs(&mut self, runs: &[RunRecord]) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute("DELETE FROM runs", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO runs (id, position, start_time, end_time, duration_seconds,
                     distance_meters, avg_pace, max_speed, path_json, xp_earned,
                     territory_gained, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for (position, run) in runs.iter().enumerate() {
                let path_json = serde_json::to_string(&run.path)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

                stmt.execute(params![
                    run.id.to_string(),
                    position as i64,
                    run.start_time.to_rfc3339(),
                    run.end_time.to_rfc3339(),
                    run.duration_seconds,
                    run.distance_meters,
                    run.avg_pace,
                    run.max_speed,
                    path_json,
                    to_sql_u64(run.xp_earned)?,
                    run.territory_gained,
                    run.created_at.to_rfc3339(),
                ])
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Load the run history, newest first.
    pub fn list_runs(&self) -> Result<Vec<RunRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, start_time, end_time, duration_seconds, distance_meters, avg_pace,
                 max_speed, path_json, xp_earned, territory_gained, created_at
                 FROM runs ORDER BY position ASC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RunRow {
                    id: row.get(0)?,
                    start_time: row.get(1)?,
                    end_time: row.get(2)?,
                    duration_seconds: row.get(3)?,
                    distance_meters: row.get(4)?,
                    avg_pace: row.get(5)?,
                    max_speed: row.get(6)?,
                    path_json: row.get(7)?,
                    xp_earned: row.get(8)?,
                    territory_gained: row.get(9)?,
                    created_at: row.get(10)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut runs = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            runs.push(row.into_run()?);
        }

        Ok(runs)
    }

    /// Count stored runs.
    pub fn count_runs(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }

    // ========== Territories ==========

    /// Replace the stored territories.
    pub fn replace_territories(&mut self, territories: &[Territory]) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute("DELETE FROM territories", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO territories (id, position, user_id, center_latitude,
                     center_longitude, radius_meters, color, distance_meters, captured_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for (position, territory) in territories.iter().enumerate() {
                stmt.execute(params![
                    territory.id.to_string(),
                    position as i64,
                    territory.user_id.to_string(),
                    territory.center.latitude,
                    territory.center.longitude,
                    territory.radius_meters,
                    territory.color,
                    territory.distance_meters,
                    territory.captured_at.to_rfc3339(),
                ])
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Load all territories in claim order.
    pub fn list_territories(&self) -> Result<Vec<Territory>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, center_latitude, center_longitude, radius_meters, color,
                 distance_meters, captured_at FROM territories ORDER BY position ASC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TerritoryRow {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    center_latitude: row.get(2)?,
                    center_longitude: row.get(3)?,
                    radius_meters: row.get(4)?,
                    color: row.get(5)?,
                    distance_meters: row.get(6)?,
                    captured_at: row.get(7)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut territories = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            territories.push(row.into_territory()?);
        }

        Ok(territories)
    }

    // ========== Achievements ==========

    /// Replace stored achievement progress.
    pub fn replace_achievements(
        &mut self,
        achievements: &[Achievement],
    ) -> Result<(), DatabaseError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute("DELETE FROM achievements", [])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO achievements (id, position, title, description, icon,
                     requirement, current, category, unlocked_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            for (position, achievement) in achievements.iter().enumerate() {
                stmt.execute(params![
                    achievement.id,
                    position as i64,
                    achievement.title,
                    achievement.description,
                    achievement.icon,
                    achievement.requirement,
                    achievement.current,
                    achievement.category.as_str(),
                    achievement.unlocked_at.map(|dt| dt.to_rfc3339()),
                ])
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Load achievement progress in catalogue order.
    pub fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, title, description, icon, requirement, current, category, unlocked_at
                 FROM achievements ORDER BY position ASC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AchievementRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    icon: row.get(3)?,
                    requirement: row.get(4)?,
                    current: row.get(5)?,
                    category: row.get(6)?,
                    unlocked_at: row.get(7)?,
                })
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut achievements = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            achievements.push(row.into_achievement()?);
        }

        Ok(achievements)
    }
}

impl GameStore for Database {
    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.get_profile()?)
    }

    fn load_runs(&self) -> Result<Vec<RunRecord>, StoreError> {
        Ok(self.list_runs()?)
    }

    fn load_territories(&self) -> Result<Vec<Territory>, StoreError> {
        Ok(self.list_territories()?)
    }

    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        Ok(self.list_achievements()?)
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<(), StoreError> {
        Ok(Database::save_profile(self, profile)?)
    }

    fn save_runs(&mut self, runs: &[RunRecord]) -> Result<(), StoreError> {
        Ok(self.replace_runs(runs)?)
    }

    fn save_territories(&mut self, territories: &[Territory]) -> Result<(), StoreError> {
        Ok(self.replace_territories(territories)?)
    }

    fn save_achievements(&mut self, achievements: &[Achievement]) -> Result<(), StoreError> {
        Ok(self.replace_achievements(achievements)?)
    }
}

/// SQLite integers are signed.
fn to_sql_u64(value: u64) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::SerializationError(format!("{} exceeds i64", value)))
}

fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

/// Internal row type for the profile table.
struct ProfileRow {
    id: String,
    username: String,
    email: String,
    avatar: String,
    bio: String,
    goal: String,
    country: String,
    state: String,
    territory_color: String,
    xp: i64,
    level: u32,
    total_distance_meters: f64,
    total_runs: u32,
    current_streak: u32,
    longest_streak: u32,
    last_run_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn into_profile(self) -> Result<UserProfile, DatabaseError> {
        let goal: RunnerGoal = self.goal.parse().map_err(DatabaseError::SerializationError)?;

        Ok(UserProfile {
            id: parse_uuid(&self.id)?,
            username: self.username,
            email: self.email,
            avatar: self.avatar,
            bio: self.bio,
            goal,
            country: self.country,
            state: self.state,
            territory_color: self.territory_color,
            xp: u64::try_from(self.xp)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            level: self.level,
            total_distance_meters: self.total_distance_meters,
            total_runs: self.total_runs,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_run_date: self.last_run_date.as_deref().map(parse_date).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Internal row type for the runs table.
struct RunRow {
    id: String,
    start_time: String,
    end_time: String,
    duration_seconds: u32,
    distance_meters: f64,
    avg_pace: f64,
    max_speed: f64,
    path_json: String,
    xp_earned: i64,
    territory_gained: u32,
    created_at: String,
}

impl RunRow {
    fn into_run(self) -> Result<RunRecord, DatabaseError> {
        let path: Vec<Coordinate> = serde_json::from_str(&self.path_json)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(RunRecord {
            id: parse_uuid(&self.id)?,
            start_time: parse_timestamp(&self.start_time)?,
            end_time: parse_timestamp(&self.end_time)?,
            duration_seconds: self.duration_seconds,
            distance_meters: self.distance_meters,
            avg_pace: self.avg_pace,
            max_speed: self.max_speed,
            path,
            xp_earned: u64::try_from(self.xp_earned)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            territory_gained: self.territory_gained,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Internal row type for the territories table.
struct TerritoryRow {
    id: String,
    user_id: String,
    center_latitude: f64,
    center_longitude: f64,
    radius_meters: f64,
    color: String,
    distance_meters: f64,
    captured_at: String,
}

impl TerritoryRow {
    fn into_territory(self) -> Result<Territory, DatabaseError> {
        Ok(Territory {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            center: Coordinate::new(self.center_latitude, self.center_longitude),
            radius_meters: self.radius_meters,
            color: self.color,
            distance_meters: self.distance_meters,
            captured_at: parse_timestamp(&self.captured_at)?,
        })
    }
}

/// Internal row type for the achievements table.
struct AchievementRow {
    id: String,
    title: String,
    description: String,
    icon: String,
    requirement: f64,
    current: f64,
    category: String,
    unlocked_at: Option<String>,
}

impl AchievementRow {
    fn into_achievement(self) -> Result<Achievement, DatabaseError> {
        let category: AchievementCategory = self
            .category
            .parse()
            .map_err(DatabaseError::SerializationError)?;

        Ok(Achievement {
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            requirement: self.requirement,
            current: self.current,
            category,
            unlocked_at: self.unlocked_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}
