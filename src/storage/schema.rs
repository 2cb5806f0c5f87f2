//! Database schema definitions for RunConquer.

/// SQL schema for creating all database tables.
///
/// Collections keep an explicit `position` so a whole-collection rewrite
/// reads back in exactly the order it was written.
pub const SCHEMA: &str = r#"
-- Profile table (single local user)
CREATE TABLE IF NOT EXISTS profile (
    slot INTEGER PRIMARY KEY CHECK (slot = 1),
    id TEXT NOT NULL,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    avatar TEXT NOT NULL,
    bio TEXT NOT NULL DEFAULT '',
    goal TEXT NOT NULL DEFAULT 'casual',
    country TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT '',
    territory_color TEXT NOT NULL,
    xp INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    total_distance_meters REAL NOT NULL DEFAULT 0,
    total_runs INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0,
    last_run_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Run history (newest first by position)
CREATE TABLE IF NOT EXISTS runs (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    duration_seconds INTEGER NOT NULL,
    distance_meters REAL NOT NULL,
    avg_pace REAL NOT NULL,
    max_speed REAL NOT NULL,
    path_json TEXT NOT NULL,
    xp_earned INTEGER NOT NULL,
    territory_gained INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_runs_position ON runs(position);

-- Claimed territories
CREATE TABLE IF NOT EXISTS territories (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    user_id TEXT NOT NULL,
    center_latitude REAL NOT NULL,
    center_longitude REAL NOT NULL,
    radius_meters REAL NOT NULL,
    color TEXT NOT NULL,
    distance_meters REAL NOT NULL,
    captured_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_territories_position ON territories(position);

-- Achievement progress
CREATE TABLE IF NOT EXISTS achievements (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL,
    requirement REAL NOT NULL,
    current REAL NOT NULL DEFAULT 0,
    category TEXT NOT NULL,
    unlocked_at TEXT
);
"#;

/// Schema version table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
