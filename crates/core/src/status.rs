//! Order Status
//!
//! Orders move `pending → processing → shipped → delivered` one step at a time,
//! and may be cancelled from any non-terminal state. Only the server moves an
//! order; everything here is derivation from the status it reports.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to order status transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusTransitionError {
    /// The transition skips a stage, goes backwards or leaves a terminal state.
    #[error("cannot move an order from {from} to {to}")]
    Illegal {
        /// Status before the transition.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },
}

/// Lifecycle state of an order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting processing.
    #[default]
    Pending,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// The forward progression rendered by the order timeline.
    pub const PROGRESSION: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    /// Position in [`Self::PROGRESSION`], `None` for [`OrderStatus::Cancelled`].
    pub fn position(self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|status| *status == self)
    }

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the order may still be cancelled.
    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// Whether `next` is a legal single step from this status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if next == OrderStatus::Cancelled {
            return self.can_cancel();
        }

        match (self.position(), next.position()) {
            (Some(from), Some(to)) => to == from + 1,
            _ => false,
        }
    }

    /// Validate a single step to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError::Illegal`] if `next` is not reachable in one step.
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError::Illegal {
                from: self,
                to: next,
            })
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge style for the status.
    pub fn badge(self) -> Badge {
        match self {
            OrderStatus::Pending => Badge::Warning,
            OrderStatus::Processing | OrderStatus::Shipped => Badge::Info,
            OrderStatus::Delivered => Badge::Success,
            OrderStatus::Cancelled => Badge::Error,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Waiting on someone.
    Warning,

    /// In progress.
    Info,

    /// Finished successfully.
    Success,

    /// Finished unsuccessfully.
    Error,
}

/// One stage of the order timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Status this stage represents.
    pub status: OrderStatus,

    /// Whether the order has reached this stage.
    pub completed: bool,

    /// Whether this is the order's current stage.
    pub current: bool,
}

/// The `pending → delivered` timeline derived from an order's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    stages: [Stage; 4],
}

impl Timeline {
    /// Derive the timeline for `status`.
    ///
    /// Every stage up to and including the current one is completed. A
    /// cancelled order was still placed, so only `pending` is completed.
    pub fn for_status(status: OrderStatus) -> Self {
        let reached = status.position().unwrap_or(0);

        let stages = OrderStatus::PROGRESSION.map(|stage| {
            let index = stage.position().unwrap_or(0);

            Stage {
                status: stage,
                completed: index <= reached,
                current: stage == status,
            }
        });

        Self { stages }
    }

    /// All four stages in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stages marked completed.
    pub fn completed(&self) -> impl Iterator<Item = OrderStatus> + '_ {
        self.stages
            .iter()
            .filter(|stage| stage.completed)
            .map(|stage| stage.status)
    }
}
