//! Live run session.
//!
//! A [`RunSession`] owns a [`RunRecorder`] on a single tokio task. Location
//! fixes, the 1 Hz duration tick and user commands all arrive on that task,
//! so recorder mutations never interleave. Pausing drops the location
//! subscription and disables the tick in the same step, which means nothing
//! can reach a paused run.

pub mod source;

pub use source::{FeedLocationSource, FixFeed, LocationSource};

use crate::recording::types::{LiveRunSummary, RecorderError, RecordingStatus, RunRecord};
use crate::recording::RunRecorder;
use crate::tracking::{FixOutcome, LocationFix};
use chrono::Utc;
use crossbeam::channel::{Receiver, Sender};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Events emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started,
    Fix(FixOutcome),
    Tick { elapsed_seconds: u32 },
    Paused,
    Resumed,
    /// Final record, or `None` when the run was too short to keep
    Stopped(Option<RunRecord>),
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("Run session has ended")]
    Closed,
}

enum Command {
    Pause(oneshot::Sender<Result<(), RecorderError>>),
    Resume(oneshot::Sender<Result<(), RecorderError>>),
    Stop(oneshot::Sender<Result<Option<RunRecord>, RecorderError>>),
}

/// Starts run sessions.
pub struct RunSession;

impl RunSession {
    /// Request location access, start `recorder` and spawn the session task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<L: LocationSource>(
        mut source: L,
        mut recorder: RunRecorder,
    ) -> Result<RunHandle, SessionError> {
        source.request_permission()?;
        recorder.start(Utc::now())?;

        let fixes = source.subscribe();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = crossbeam::channel::unbounded();
        let (summary_tx, summary_rx) = watch::channel(recorder.live_summary());

        let _ = event_tx.send(RunEvent::Started);

        let actor = SessionActor {
            source,
            recorder,
            event_tx,
            summary_tx,
        };
        let task = tokio::spawn(actor.run(fixes, command_rx));

        Ok(RunHandle {
            commands: command_tx,
            events: event_rx,
            summary: summary_rx,
            task,
        })
    }
}

/// Control handle for a running session.
pub struct RunHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: Receiver<RunEvent>,
    summary: watch::Receiver<LiveRunSummary>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Pause the run, detaching the timer and the location subscription.
    pub async fn pause(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Pause(tx))?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    /// Resume a paused run with a fresh subscription.
    pub async fn resume(&self) -> Result<(), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Resume(tx))?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    /// Stop the run and wait for the session task to finish.
    ///
    /// Fixes already delivered are processed before the stop takes effect.
    pub async fn stop(self) -> Result<Option<RunRecord>, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stop(tx))?;
        let record = rx.await.map_err(|_| SessionError::Closed)??;

        if let Err(e) = self.task.await {
            tracing::warn!("Run session task ended abnormally: {}", e);
        }

        Ok(record)
    }

    /// Latest live statistics.
    pub fn summary(&self) -> LiveRunSummary {
        self.summary.borrow().clone()
    }

    /// Event stream for observers.
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }
}

struct SessionActor<L> {
    source: L,
    recorder: RunRecorder,
    event_tx: Sender<RunEvent>,
    summary_tx: watch::Sender<LiveRunSummary>,
}

impl<L: LocationSource> SessionActor<L> {
    async fn run(
        mut self,
        fixes: mpsc::UnboundedReceiver<LocationFix>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let mut fixes = Some(fixes);
        let mut ticker = new_ticker();

        loop {
            tokio::select! {
                biased;

                fix = next_fix(&mut fixes), if fixes.is_some() => match fix {
                    Some(fix) => self.on_fix(&fix),
                    None => fixes = None,
                },

                _ = ticker.tick(), if self.recorder.status() == RecordingStatus::Running => {
                    self.on_tick();
                }

                command = commands.recv() => match command {
                    Some(Command::Pause(reply)) => {
                        let result = self.recorder.pause();
                        if result.is_ok() {
                            fixes = None;
                            self.emit(RunEvent::Paused);
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::Resume(reply)) => {
                        let result = self.recorder.resume();
                        if result.is_ok() {
                            fixes = Some(self.source.subscribe());
                            ticker.reset();
                            self.emit(RunEvent::Resumed);
                        }
                        let _ = reply.send(result);
                    }
                    Some(Command::Stop(reply)) => {
                        let result = self.finish();
                        let _ = reply.send(result);
                        break;
                    }
                    None => {
                        tracing::warn!("Run handle dropped, stopping run");
                        let _ = self.finish();
                        break;
                    }
                },
            }
        }
    }

    fn on_fix(&mut self, fix: &LocationFix) {
        match self.recorder.record_fix(fix) {
            Ok(outcome) => self.emit(RunEvent::Fix(outcome)),
            Err(e) => tracing::trace!("Ignoring fix: {}", e),
        }
    }

    fn on_tick(&mut self) {
        if let Ok(elapsed_seconds) = self.recorder.tick(1) {
            self.emit(RunEvent::Tick { elapsed_seconds });
        }
    }

    fn finish(&mut self) -> Result<Option<RunRecord>, RecorderError> {
        let record = self.recorder.stop(Utc::now())?;
        self.emit(RunEvent::Stopped(record.clone()));
        Ok(record)
    }

    fn emit(&self, event: RunEvent) {
        let _ = self.summary_tx.send(self.recorder.live_summary());
        let _ = self.event_tx.send(event);
    }
}

fn new_ticker() -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_fix(fixes: &mut Option<mpsc::UnboundedReceiver<LocationFix>>) -> Option<LocationFix> {
    match fixes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
