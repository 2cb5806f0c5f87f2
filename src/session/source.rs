//! Location sources feeding a run session.

use super::SessionError;
use crate::tracking::LocationFix;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A push-style provider of location fixes.
pub trait LocationSource: Send + 'static {
    /// Ask for location access. A denial prevents the run from starting.
    fn request_permission(&mut self) -> Result<(), SessionError>;

    /// Open a fresh subscription. Dropping the receiver detaches it.
    fn subscribe(&mut self) -> UnboundedReceiver<LocationFix>;
}

/// Producer side of a [`FeedLocationSource`].
///
/// Whoever owns the device integration pushes fixes here. Pushes are dropped
/// while the session is paused because the subscription is gone.
#[derive(Debug, Clone, Default)]
pub struct FixFeed {
    sender: Arc<Mutex<Option<UnboundedSender<LocationFix>>>>,
}

impl FixFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a fix. Returns false if nobody is subscribed.
    pub fn push(&self, fix: LocationFix) -> bool {
        match self.slot().as_ref() {
            Some(tx) => tx.send(fix).is_ok(),
            None => false,
        }
    }

    /// Whether a live subscription exists.
    pub fn is_subscribed(&self) -> bool {
        self.slot().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    fn slot(&self) -> MutexGuard<'_, Option<UnboundedSender<LocationFix>>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach(&self, tx: UnboundedSender<LocationFix>) {
        *self.slot() = Some(tx);
    }
}

/// Location source driven by a [`FixFeed`].
#[derive(Debug, Clone)]
pub struct FeedLocationSource {
    feed: FixFeed,
    permitted: bool,
}

impl FeedLocationSource {
    /// Source with location permission granted.
    pub fn new(feed: FixFeed) -> Self {
        Self {
            feed,
            permitted: true,
        }
    }

    /// Source whose permission request is refused.
    pub fn denied(feed: FixFeed) -> Self {
        Self {
            feed,
            permitted: false,
        }
    }
}

impl LocationSource for FeedLocationSource {
    fn request_permission(&mut self) -> Result<(), SessionError> {
        if self.permitted {
            Ok(())
        } else {
            Err(SessionError::PermissionDenied)
        }
    }

    fn subscribe(&mut self) -> UnboundedReceiver<LocationFix> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.feed.attach(tx);
        rx
    }
}
