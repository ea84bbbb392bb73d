//! Per-shipment snapshot log with linear undo/redo
use super::error::ShipmentError;
use super::shipment::{Shipment, ShipmentFields, TimeStamp};
use super::state::LifecycleState;
use chrono::Utc;
use std::collections::{VecDeque, vec_deque};
use std::iter::Enumerate;
use tracing::debug;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Point-in-time copy of a shipment's mutable fields.
///
/// Identity, service class and creation time are never captured since they
/// cannot change. The lifecycle state is recorded for display only, restoring
/// a snapshot leaves the live state alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    fields: ShipmentFields,
    state: LifecycleState,
    description: String,
    taken_at: TimeStamp<Utc>,
    fingerprint: String, // sha256 of the cbor encoded fields
}

impl Snapshot {
    pub fn capture(shipment: &Shipment, description: impl Into<String>) -> Result<Self, ShipmentError> {
        let fields = shipment.fields().clone();
        let fingerprint = fields.digest()?;

        Ok(Self {
            fields,
            state: shipment.state(),
            description: description.into(),
            taken_at: TimeStamp::new(),
            fingerprint,
        })
    }

    /// Overwrites every captured field on `shipment`. The lifecycle state is
    /// left untouched, an undo never un-delivers or un-cancels a shipment.
    pub fn restore_onto(&self, shipment: &mut Shipment) {
        shipment.fields = self.fields.clone();
    }

    pub fn fields(&self) -> &ShipmentFields {
        &self.fields
    }
    pub fn state(&self) -> LifecycleState {
        self.state
    }
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn taken_at(&self) -> &TimeStamp<Utc> {
        &self.taken_at
    }
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Owned, display-ready view of one history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSummary {
    pub position: usize, // 1-based
    pub taken_at: String,
    pub state_name: &'static str,
    pub description: String,
    pub sender: String,
    pub recipient: String,
    pub weight_kg: f64,
    pub cost: f64,
    pub fingerprint: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry<'a> {
    pub index: usize,
    pub snapshot: &'a Snapshot,
    pub is_current: bool,
}

impl HistoryEntry<'_> {
    pub fn summary(&self) -> SnapshotSummary {
        let fields = self.snapshot.fields();
        SnapshotSummary {
            position: self.index + 1,
            taken_at: self.snapshot.taken_at().to_string(),
            state_name: self.snapshot.state_name(),
            description: self.snapshot.description().to_string(),
            sender: fields.sender.clone(),
            recipient: fields.recipient.clone(),
            weight_kg: fields.weight_kg,
            cost: fields.cost,
            fingerprint: self.snapshot.fingerprint().to_string(),
            is_current: self.is_current,
        }
    }
}

/// Chronological walk over a history. Cheap to clone, so it can be restarted.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: Enumerate<vec_deque::Iter<'a, Snapshot>>,
    current: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = HistoryEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, snapshot)| HistoryEntry {
            index,
            snapshot,
            is_current: index == self.current,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Linear undo/redo log.
///
/// Always holds at least one snapshot, and `current` always points into it.
/// Recording after an undo discards everything past the cursor first, and
/// only then evicts the oldest entry if capacity is exceeded.
#[derive(Debug)]
pub struct HistoryManager {
    snapshots: VecDeque<Snapshot>,
    current: usize,
    capacity: usize,
}

impl HistoryManager {
    /// `capacity` is clamped to at least one.
    pub fn new(initial: Snapshot, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots = VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY));
        snapshots.push_back(initial);

        Self {
            snapshots,
            current: 0,
            capacity,
        }
    }

    pub fn record(&mut self, snapshot: Snapshot) {
        if self.can_redo() {
            let discarded = self.snapshots.len() - self.current - 1;
            self.snapshots.truncate(self.current + 1);
            debug!(discarded, "discarded redo path");
        }

        debug!(description = snapshot.description(), "snapshot recorded");
        self.snapshots.push_back(snapshot);

        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            debug!(capacity = self.capacity, "evicted oldest snapshot");
        }
        self.current = self.snapshots.len() - 1;
    }

    /// Steps the cursor back. `None` when already at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        self.snapshots.get(self.current)
    }

    /// Steps the cursor forward. `None` when already at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        self.snapshots.get(self.current)
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.current]
    }
    pub fn current_index(&self) -> usize {
        self.current
    }
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// 1-based position of the cursor, and the total number of snapshots.
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.snapshots.len())
    }

    pub fn entries(&self) -> Entries<'_> {
        Entries {
            inner: self.snapshots.iter().enumerate(),
            current: self.current,
        }
    }

    pub fn summaries(&self) -> Vec<SnapshotSummary> {
        self.entries().map(|entry| entry.summary()).collect()
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(80);
        let mut lines = vec![rule.clone(), "SHIPMENT CHANGE HISTORY".to_string(), rule.clone()];

        for entry in self.entries() {
            let marker = if entry.is_current { "→ " } else { "  " };
            lines.push(format!(
                "{marker}{}. [{}] {} - {}",
                entry.index + 1,
                entry.snapshot.taken_at(),
                entry.snapshot.state_name(),
                entry.snapshot.description()
            ));
        }

        let (position, total) = self.position();
        lines.push(rule.clone());
        lines.push(format!("Current position: {position}/{total}"));
        lines.push(rule);
        lines.join("\n")
    }
}
