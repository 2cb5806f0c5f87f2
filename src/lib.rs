//! RunConquer - Run tracking and territory game core
//!
//! Turns GPS-tracked runs into distance, claimed territories, experience,
//! levels, streaks and achievements. The pipeline stages (`tracking`,
//! `recording`, `territory`, `progression`, `achievements`) are pure; the
//! `game` service persists their results through a store, and `session`
//! drives a live run from an async location stream.

pub mod achievements;
pub mod game;
pub mod import;
pub mod progression;
pub mod recording;
pub mod session;
pub mod stats;
pub mod storage;
pub mod territory;
pub mod tracking;

// Re-export commonly used types
pub use game::{GameService, GameSnapshot, GameStore};
pub use recording::recorder::RunRecorder;
pub use session::{RunHandle, RunSession};
pub use storage::config::UserProfile;
pub use storage::database::Database;
