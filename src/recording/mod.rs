//! Recording module for run capture.

pub mod recorder;
pub mod types;

pub use recorder::RunRecorder;
pub use types::{LiveRunSummary, RecorderConfig, RecorderError, RecordingStatus, RunRecord};
