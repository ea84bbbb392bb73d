//! Core shipment entity, identity and draft builder
use super::error::{ShipmentError, ValidationError};
use super::state::LifecycleState;
use super::utils;
use chrono::{DateTime, TimeZone, Utc};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceClass {
    Express,
    Standard,
    Economy,
}

impl ServiceClass {
    pub const ALL: [ServiceClass; 3] = [Self::Express, Self::Standard, Self::Economy];

    pub fn label(self) -> &'static str {
        match self {
            Self::Express => "Express",
            Self::Standard => "Standard",
            Self::Economy => "Economy",
        }
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidServiceClass(s.to_string()))
    }
}

/// Sequential shipment identity, rendered as `SHIP-00001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipmentId(String);

impl ShipmentId {
    pub(crate) fn from_sequence(sequence: u64) -> Self {
        Self(format!("SHIP-{sequence:05}"))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// lets the registry be queried with the plain `&str` adapters hand us
impl Borrow<str> for ShipmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl fmt::Display for TimeStamp<Utc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Every field of a shipment that may change after creation.
///
/// This is exactly what a history snapshot captures and restores. Identity,
/// service class, creation time and lifecycle state live on [`Shipment`].
#[derive(minicbor::Encode, Debug, Clone, PartialEq)]
pub struct ShipmentFields {
    #[n(0)]
    pub sender: String,
    #[n(1)]
    pub recipient: String,
    #[n(2)]
    pub origin_address: String,
    #[n(3)]
    pub destination_address: String,
    #[n(4)]
    pub weight_kg: f64,
    #[n(5)]
    pub description: Option<String>,
    #[n(6)]
    pub is_fragile: bool,
    #[n(7)]
    pub requires_insurance: bool, // derived at admission
    #[n(8)]
    pub distance_km: f64, // derived at admission
    #[n(9)]
    pub cost: f64, // derived, see operations::reprice
}

impl ShipmentFields {
    /// SHA-256 over the CBOR encoding of the fields.
    pub fn digest(&self) -> Result<String, ShipmentError> {
        let (hash, _) = utils::cbor_digest(self)?;
        Ok(hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    id: ShipmentId,
    service_class: ServiceClass,
    created_at: TimeStamp<Utc>,
    pub(crate) state: LifecycleState,
    pub(crate) fields: ShipmentFields,
}

impl Shipment {
    /// A freshly admitted shipment always starts out `Pending`.
    pub(crate) fn admit(id: ShipmentId, service_class: ServiceClass, fields: ShipmentFields) -> Self {
        Self {
            id,
            service_class,
            created_at: TimeStamp::new(),
            state: LifecycleState::Pending,
            fields,
        }
    }

    pub fn id(&self) -> &ShipmentId {
        &self.id
    }
    pub fn service_class(&self) -> ServiceClass {
        self.service_class
    }
    pub fn created_at(&self) -> &TimeStamp<Utc> {
        &self.created_at
    }
    pub fn state(&self) -> LifecycleState {
        self.state
    }
    pub fn fields(&self) -> &ShipmentFields {
        &self.fields
    }
    pub fn sender(&self) -> &str {
        &self.fields.sender
    }
    pub fn recipient(&self) -> &str {
        &self.fields.recipient
    }
    pub fn origin_address(&self) -> &str {
        &self.fields.origin_address
    }
    pub fn destination_address(&self) -> &str {
        &self.fields.destination_address
    }
    pub fn weight_kg(&self) -> f64 {
        self.fields.weight_kg
    }
    pub fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }
    pub fn is_fragile(&self) -> bool {
        self.fields.is_fragile
    }
    pub fn requires_insurance(&self) -> bool {
        self.fields.requires_insurance
    }
    pub fn distance_km(&self) -> f64 {
        self.fields.distance_km
    }
    pub fn cost(&self) -> f64 {
        self.fields.cost
    }

    /// Digest of the live mutable fields, comparable with [`crate::history::Snapshot::fingerprint`].
    pub fn fingerprint(&self) -> Result<String, ShipmentError> {
        self.fields.digest()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} -> {} | {} | {} | ${:.2}",
            self.id,
            self.fields.sender,
            self.fields.recipient,
            self.service_class,
            self.state.description(),
            self.fields.cost
        )
    }
}

/// Raw creation input. Nothing here is trusted until the validation pipeline
/// has run over it, so the service class is kept as the label we were given.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShipmentDraft {
    pub(crate) service_class: String,
    pub(crate) sender: String,
    pub(crate) recipient: String,
    pub(crate) origin_address: String,
    pub(crate) destination_address: String,
    pub(crate) weight_kg: f64,
    pub(crate) description: Option<String>,
    pub(crate) is_fragile: bool,
}

impl ShipmentDraft {
    /// Construct an empty draft, filled in with the `set_*` methods
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_service_class(mut self, label: impl Into<String>) -> Self {
        self.service_class = label.into();
        self
    }
    pub fn set_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }
    pub fn set_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }
    pub fn set_origin(mut self, address: impl Into<String>) -> Self {
        self.origin_address = address.into();
        self
    }
    pub fn set_destination(mut self, address: impl Into<String>) -> Self {
        self.destination_address = address.into();
        self
    }
    pub fn set_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = weight_kg;
        self
    }
    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }
    pub fn set_fragile(mut self, fragile: bool) -> Self {
        self.is_fragile = fragile;
        self
    }

    pub fn service_class_label(&self) -> &str {
        &self.service_class
    }
}
