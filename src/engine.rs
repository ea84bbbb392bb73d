//! Engine API for shipment lifecycle operations
use super::config::EngineConfig;
use super::error::ShipmentError;
use super::history::{HistoryManager, Snapshot, SnapshotSummary};
use super::operations::{
    self, DeliveryEstimator, DiscountBreakdown, DiscountCalculator, Operation, ReportGenerator,
};
use super::shipment::{Shipment, ShipmentDraft, ShipmentFields, ShipmentId};
use super::state::Transition;
use super::validation::{Admission, MAX_WEIGHT_KG, MIN_WEIGHT_KG, Pipeline};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// A modification to one of the editable fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Sender(String),
    Recipient(String),
    Weight(f64),
    Destination(String),
    Fragile(bool),
}

impl FieldChange {
    /// Build a change from the field name and raw value an adapter received.
    pub fn parse(field: &str, value: &str) -> Result<Self, ShipmentError> {
        let change = match field.trim().to_ascii_lowercase().as_str() {
            "sender" => Self::Sender(value.to_string()),
            "recipient" => Self::Recipient(value.to_string()),
            "destination" => Self::Destination(value.to_string()),
            "weight" => {
                let weight = value.trim().parse::<f64>().map_err(|err| {
                    ShipmentError::InvalidValue {
                        field: "weight",
                        reason: format!("'{value}' is not a number ({err})"),
                    }
                })?;
                Self::Weight(weight)
            }
            "fragile" => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Self::Fragile(true),
                "false" | "no" | "0" => Self::Fragile(false),
                _ => {
                    return Err(ShipmentError::InvalidValue {
                        field: "fragile",
                        reason: format!("'{value}' is not a boolean"),
                    });
                }
            },
            _ => return Err(ShipmentError::UnknownField(field.to_string())),
        };
        Ok(change)
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Sender(_) => "sender",
            Self::Recipient(_) => "recipient",
            Self::Weight(_) => "weight",
            Self::Destination(_) => "destination",
            Self::Fragile(_) => "fragile",
        }
    }

    /// Rejects values that would break the entity invariants.
    pub fn validate(&self) -> Result<(), ShipmentError> {
        let invalid = |reason: String| ShipmentError::InvalidValue {
            field: self.field(),
            reason,
        };
        match self {
            Self::Sender(value) | Self::Recipient(value) | Self::Destination(value)
                if value.trim().is_empty() =>
            {
                Err(invalid("must not be empty".to_string()))
            }
            Self::Weight(weight) if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(weight) => Err(
                invalid(format!("{weight} kg is outside [{MIN_WEIGHT_KG}, {MAX_WEIGHT_KG}] kg")),
            ),
            _ => Ok(()),
        }
    }

    fn apply_to(&self, fields: &mut ShipmentFields) {
        match self {
            Self::Sender(value) => fields.sender = value.clone(),
            Self::Recipient(value) => fields.recipient = value.clone(),
            Self::Weight(weight) => fields.weight_kg = *weight,
            Self::Destination(value) => fields.destination_address = value.clone(),
            Self::Fragile(fragile) => fields.is_fragile = *fragile,
        }
    }

    /// Change description recorded in the history.
    pub fn describe(&self) -> String {
        match self {
            Self::Sender(value) => format!("Sender changed to: {value}"),
            Self::Recipient(value) => format!("Recipient changed to: {value}"),
            Self::Weight(weight) => format!("Weight changed to: {weight} kg"),
            Self::Destination(value) => format!("Destination changed to: {value}"),
            Self::Fragile(true) => "Marked as fragile".to_string(),
            Self::Fragile(false) => "Marked as not fragile".to_string(),
        }
    }
}

#[derive(Debug)]
struct Tracked {
    shipment: Shipment,
    history: HistoryManager,
}

/// Owns every shipment and its history, and sequences each request through
/// validation, the state machine, the history log and the computations.
pub struct Engine {
    config: EngineConfig,
    pipeline: Pipeline,
    order: Vec<ShipmentId>, // insertion order
    shipments: HashMap<ShipmentId, Tracked>,
    sequence: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::standard(),
            order: vec![],
            shipments: HashMap::new(),
            sequence: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn tracked(&self, id: &str) -> Result<&Tracked, ShipmentError> {
        self.shipments
            .get(id)
            .ok_or_else(|| ShipmentError::NotFound(id.to_string()))
    }

    fn tracked_mut(&mut self, id: &str) -> Result<&mut Tracked, ShipmentError> {
        self.shipments
            .get_mut(id)
            .ok_or_else(|| ShipmentError::NotFound(id.to_string()))
    }

    /// Validate a draft and register it as a new `Pending` shipment.
    ///
    /// An identity is consumed by every attempt, so ids skip over rejected drafts.
    pub fn create_shipment(&mut self, draft: ShipmentDraft) -> Result<Shipment, ShipmentError> {
        self.sequence += 1;
        let id = ShipmentId::from_sequence(self.sequence);

        let mut admission = Admission::new(&draft);
        if let Err(err) = self.pipeline.validate(&mut admission) {
            warn!(%id, %err, "shipment rejected");
            return Err(err.into());
        }
        for advisory in &admission.advisories {
            warn!(%id, %advisory, "admission advisory");
        }
        let (service_class, fields) = admission.finish()?;

        let mut shipment = Shipment::admit(id.clone(), service_class, fields);
        let cost = operations::reprice(&mut shipment);
        let history = HistoryManager::new(
            Snapshot::capture(&shipment, "Created")?,
            self.config.history_capacity,
        );

        info!(%id, %service_class, cost, "shipment created");
        self.order.push(id.clone());
        self.shipments.insert(
            id,
            Tracked {
                shipment: shipment.clone(),
                history,
            },
        );

        Ok(shipment)
    }

    pub fn get_shipment(&self, id: &str) -> Result<&Shipment, ShipmentError> {
        Ok(&self.tracked(id)?.shipment)
    }

    /// All shipments in the order they were created.
    pub fn list_shipments(&self) -> impl Iterator<Item = &Shipment> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.shipments.get(id))
            .map(|tracked| &tracked.shipment)
    }

    pub fn shipment_count(&self) -> usize {
        self.order.len()
    }

    /// Move to the next lifecycle state. On a terminal state this is a no-op
    /// whose transition carries the explanation.
    pub fn advance_state(&mut self, id: &str) -> Result<Transition, ShipmentError> {
        let tracked = self.tracked_mut(id)?;
        let transition = tracked.shipment.state().advance();
        Self::commit_transition(tracked, transition, || {
            format!("Status changed to: {}", transition.to.description())
        })?;
        Ok(transition)
    }

    pub fn cancel_shipment(&mut self, id: &str) -> Result<Transition, ShipmentError> {
        let tracked = self.tracked_mut(id)?;
        let transition = tracked.shipment.state().cancel();
        Self::commit_transition(tracked, transition, || "Shipment cancelled".to_string())?;
        Ok(transition)
    }

    // Only transitions that change state are applied and recorded.
    fn commit_transition(
        tracked: &mut Tracked,
        transition: Transition,
        describe: impl FnOnce() -> String,
    ) -> Result<(), ShipmentError> {
        let id = tracked.shipment.id().clone();
        if !transition.changed() {
            info!(%id, state = %transition.from, "{}", transition.message);
            return Ok(());
        }

        let mut updated = tracked.shipment.clone();
        updated.state = transition.to;
        let snapshot = Snapshot::capture(&updated, describe())?;

        tracked.shipment = updated;
        tracked.history.record(snapshot);
        info!(%id, from = %transition.from, to = %transition.to, "state changed");
        Ok(())
    }

    /// Operational detail for the shipment's current state.
    pub fn state_detail(&self, id: &str) -> Result<&'static str, ShipmentError> {
        Ok(self.get_shipment(id)?.state().detail())
    }

    /// Apply a field change, reprice, then record a snapshot. A rejected change
    /// leaves both the shipment and its history untouched.
    pub fn modify_field(&mut self, id: &str, change: FieldChange) -> Result<&Shipment, ShipmentError> {
        let tracked = self.tracked_mut(id)?;
        change.validate()?;

        let mut updated = tracked.shipment.clone();
        change.apply_to(&mut updated.fields);
        let cost = operations::reprice(&mut updated);
        let snapshot = Snapshot::capture(&updated, change.describe())?;

        tracked.shipment = updated;
        tracked.history.record(snapshot);
        info!(id, field = change.field(), cost, "shipment modified");
        Ok(&tracked.shipment)
    }

    pub fn undo(&mut self, id: &str) -> Result<&Shipment, ShipmentError> {
        let tracked = self.tracked_mut(id)?;
        let snapshot = tracked
            .history
            .undo()
            .ok_or_else(|| ShipmentError::NothingToUndo(id.to_string()))?;

        snapshot.restore_onto(&mut tracked.shipment);
        operations::reprice(&mut tracked.shipment);
        info!(id, position = tracked.history.current_index() + 1, "change undone");
        Ok(&tracked.shipment)
    }

    pub fn redo(&mut self, id: &str) -> Result<&Shipment, ShipmentError> {
        let tracked = self.tracked_mut(id)?;
        let snapshot = tracked
            .history
            .redo()
            .ok_or_else(|| ShipmentError::NothingToRedo(id.to_string()))?;

        snapshot.restore_onto(&mut tracked.shipment);
        operations::reprice(&mut tracked.shipment);
        info!(id, position = tracked.history.current_index() + 1, "change redone");
        Ok(&tracked.shipment)
    }

    pub fn history(&self, id: &str) -> Result<&HistoryManager, ShipmentError> {
        Ok(&self.tracked(id)?.history)
    }

    pub fn get_history(&self, id: &str) -> Result<Vec<SnapshotSummary>, ShipmentError> {
        Ok(self.history(id)?.summaries())
    }

    pub fn compute_delivery_time(&self, id: &str) -> Result<u32, ShipmentError> {
        Ok(DeliveryEstimator.apply(self.get_shipment(id)?))
    }

    pub fn compute_discount(&self, id: &str) -> Result<f64, ShipmentError> {
        Ok(self.discount_breakdown(id)?.total)
    }

    pub fn discount_breakdown(&self, id: &str) -> Result<DiscountBreakdown, ShipmentError> {
        Ok(DiscountCalculator.apply(self.get_shipment(id)?))
    }

    pub fn generate_report(&self, id: &str) -> Result<String, ShipmentError> {
        Ok(ReportGenerator.apply(self.get_shipment(id)?))
    }
}

/// An [`Engine`] behind a single lock, for adapters that serve concurrent
/// requests. Every operation runs to completion while holding the lock, so
/// snapshot, undo and redo on a shipment stay strictly sequential.
#[derive(Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        // mutations commit with a single assignment, so a poisoned engine is still consistent
        let mut engine = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }
}
