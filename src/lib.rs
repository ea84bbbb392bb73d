//! Shipment lifecycle tracking engine.
//!
//! Shipments are admitted through a fixed validation pipeline, advance
//! through a linear lifecycle, keep a snapshot history with undo/redo, and
//! expose derived computations (cost, delivery time, discounts, report).
//! [`Engine`] is the entry point adapters talk to.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod operations;
pub mod shipment;
pub mod state;
pub mod utils;
pub mod validation;

pub use config::EngineConfig;
pub use engine::{Engine, FieldChange, SharedEngine};
pub use error::{ConfigError, ShipmentError, ValidationError};
pub use history::{HistoryManager, Snapshot, SnapshotSummary};
pub use shipment::{ServiceClass, Shipment, ShipmentDraft, ShipmentId};
pub use state::{LifecycleState, Transition};
