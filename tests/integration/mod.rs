//! Integration tests for runconquer.
//!
//! These exercise whole flows: recording or importing a run, feeding it
//! through the game service and reading the result back from storage.

mod persistence_test;
mod run_pipeline_test;
mod session_test;
