//! Mutation Coordinator
//!
//! Every command runs `pending → fulfilled | rejected` against the remote
//! collaborator. Store data changes only on settlement: a fulfilled command
//! applies the server payload, a rejected one records the error and leaves the
//! data at its last good value. Commands on the same entity are serialized
//! through [`Lanes`].

use std::{future::Future, sync::Arc};

use tokio::sync::watch;
use tracing::{debug, warn};

pub mod errors;
pub mod lanes;

pub use errors::{Command, IntoRejection, MutationError};
pub use lanes::{EntityKey, LaneGuard, Lanes};

/// Lifecycle phase of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Fulfilled,
    Rejected,
}

/// Latest lifecycle event of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub command: Command,
    pub phase: Phase,
}

/// Store data plus the loading and error flags the UI renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot<S> {
    pub data: S,
    pub error: Option<MutationError>,
    pub last: Option<Outcome>,
    in_flight: usize,
}

impl<S> Snapshot<S> {
    pub fn new(data: S) -> Self {
        Self {
            data,
            error: None,
            last: None,
            in_flight: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Owns a store's snapshot and runs its commands.
#[derive(Debug)]
pub struct Coordinator<S> {
    state: watch::Sender<Snapshot<S>>,
    lanes: Arc<Lanes>,
}

impl<S: Clone> Coordinator<S> {
    pub fn new(data: S, lanes: Arc<Lanes>) -> Self {
        let (state, _) = watch::channel(Snapshot::new(data));

        Self { state, lanes }
    }

    /// Read-only view that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<S> {
        self.state.borrow().clone()
    }

    pub fn read<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.state.borrow().data)
    }

    /// Local change that involves no server state.
    pub fn update(&self, update: impl FnOnce(&mut S)) {
        self.state.send_modify(|snapshot| update(&mut snapshot.data));
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|snapshot| snapshot.error = None);
    }

    /// Reject `command` without dispatching it.
    pub fn reject(&self, command: Command, error: MutationError) -> MutationError {
        warn!(command = command.as_str(), %error, "rejected before dispatch");

        self.state.send_modify(|snapshot| {
            snapshot.error = Some(error.clone());
            snapshot.last = Some(Outcome {
                command,
                phase: Phase::Rejected,
            });
        });

        error
    }

    /// Run `request` on the lane of `key` and settle it.
    ///
    /// On success `apply` folds the payload into the store data and the
    /// payload is handed back to the caller.
    ///
    /// # Errors
    ///
    /// Returns the rejection recorded in the snapshot.
    pub async fn dispatch<T, E, Fut>(
        &self,
        command: Command,
        key: EntityKey,
        request: Fut,
        apply: impl FnOnce(&mut S, &T),
    ) -> Result<T, MutationError>
    where
        Fut: Future<Output = Result<T, E>>,
        E: IntoRejection,
    {
        let in_flight = InFlight::start(&self.state, command);
        let _lane = self.lanes.acquire(key).await;

        debug!(command = command.as_str(), %key, "dispatching");

        match request.await {
            Ok(payload) => {
                in_flight.settle(|snapshot| {
                    apply(&mut snapshot.data, &payload);
                    snapshot.last = Some(Outcome {
                        command,
                        phase: Phase::Fulfilled,
                    });
                });

                debug!(command = command.as_str(), %key, "fulfilled");

                Ok(payload)
            }
            Err(error) => {
                let error = error.into_rejection(command);

                warn!(command = command.as_str(), %key, %error, "rejected");

                in_flight.settle(|snapshot| {
                    snapshot.error = Some(error.clone());
                    snapshot.last = Some(Outcome {
                        command,
                        phase: Phase::Rejected,
                    });
                });

                Err(error)
            }
        }
    }
}

/// Pending marker; released on settlement or when the command is dropped.
struct InFlight<'a, S> {
    state: &'a watch::Sender<Snapshot<S>>,
    armed: bool,
}

impl<'a, S> InFlight<'a, S> {
    fn start(state: &'a watch::Sender<Snapshot<S>>, command: Command) -> Self {
        state.send_modify(|snapshot| {
            snapshot.in_flight += 1;
            snapshot.error = None;
            snapshot.last = Some(Outcome {
                command,
                phase: Phase::Pending,
            });
        });

        Self { state, armed: true }
    }

    fn settle(mut self, settle: impl FnOnce(&mut Snapshot<S>)) {
        self.armed = false;

        self.state.send_modify(|snapshot| {
            snapshot.in_flight = snapshot.in_flight.saturating_sub(1);
            settle(snapshot);
        });
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|snapshot| {
                snapshot.in_flight = snapshot.in_flight.saturating_sub(1);
            });
        }
    }
}
