//! Shipment lifecycle state machine
//!
//! ```text
//! Pending ──▶ InProcess ──▶ InTransit ──▶ InDistribution ──▶ Delivered
//!    │            │             │               │
//!    └────────────┴─────────────┴───────────────┴──▶ Cancelled
//! ```
//!
//! `Delivered` and `Cancelled` are terminal. Asking a terminal state to
//! advance, or asking `Delivered` to cancel, yields a [`Transition`] whose
//! `from` and `to` are equal and whose message explains why nothing happened.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Pending,
    InProcess,
    InTransit,
    InDistribution,
    Delivered,
    Cancelled,
}

/// Outcome of asking a state to advance or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub message: &'static str,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl LifecycleState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProcess => "InProcess",
            Self::InTransit => "InTransit",
            Self::InDistribution => "InDistribution",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Pending => "Pending validation",
            Self::InProcess => "Being prepared",
            Self::InTransit => "In transit to destination",
            Self::InDistribution => "At local distribution",
            Self::Delivered => "Delivered successfully",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Longer operational status, shown when a shipment's state is queried.
    pub fn detail(self) -> &'static str {
        match self {
            Self::Pending => "The shipment has been registered and is pending validation",
            Self::InProcess => "The shipment is being processed and prepared for transport",
            Self::InTransit => "The shipment is on its way to the destination distribution centre",
            Self::InDistribution => {
                "The shipment is at the local distribution centre, ready for delivery"
            }
            Self::Delivered => "The shipment has been delivered to the recipient",
            Self::Cancelled => "The shipment has been cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProcess),
            Self::InProcess => Some(Self::InTransit),
            Self::InTransit => Some(Self::InDistribution),
            Self::InDistribution => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn advance(self) -> Transition {
        let (to, message) = match self {
            Self::Pending => (Self::InProcess, "Shipment moved to processing"),
            Self::InProcess => (Self::InTransit, "Shipment dispatched and in transit"),
            Self::InTransit => (
                Self::InDistribution,
                "Shipment arrived at the distribution centre",
            ),
            Self::InDistribution => (Self::Delivered, "Shipment delivered successfully"),
            Self::Delivered => (
                Self::Delivered,
                "The shipment has already been delivered. There are no further states",
            ),
            Self::Cancelled => (
                Self::Cancelled,
                "A cancelled shipment cannot advance to other states",
            ),
        };

        Transition {
            from: self,
            to,
            message,
        }
    }

    pub fn cancel(self) -> Transition {
        let (to, message) = match self {
            Self::Pending => (Self::Cancelled, "Shipment cancelled while pending"),
            Self::InProcess => (Self::Cancelled, "Shipment cancelled during processing"),
            Self::InTransit => (
                Self::Cancelled,
                "Shipment cancelled in transit; it will be returned to origin",
            ),
            Self::InDistribution => (
                Self::Cancelled,
                "Shipment cancelled at distribution; available for return or pickup",
            ),
            Self::Delivered => (Self::Delivered, "A delivered shipment cannot be cancelled"),
            Self::Cancelled => (Self::Cancelled, "The shipment is already cancelled"),
        };

        Transition {
            from: self,
            to,
            message,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
