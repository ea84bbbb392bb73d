//! Admission checks run once, in a fixed order, before a shipment exists.
//!
//! Each check sees the in-flight [`Admission`] and may record derived values
//! on it (distance, insurance, advisories). The first failing check stops the
//! pipeline; failures are never aggregated.
use super::error::ValidationError;
use super::shipment::{ServiceClass, ShipmentDraft, ShipmentFields};
use std::fmt;
use tracing::{debug, warn};

pub const MIN_WEIGHT_KG: f64 = 0.1;
pub const MAX_WEIGHT_KG: f64 = 1000.0;
pub const EXPRESS_MAX_DISTANCE_KM: f64 = 500.0;
pub const LONG_DISTANCE_ADVISORY_KM: f64 = 2000.0;
pub const INSURANCE_WEIGHT_THRESHOLD_KG: f64 = 50.0;
const KM_PER_ADDRESS_CHAR: f64 = 10.0;

/// Stand-in for a real distance lookup: ten km per character of the destination.
pub fn placeholder_distance_km(destination: &str) -> f64 {
    destination.chars().count() as f64 * KM_PER_ADDRESS_CHAR
}

/// Non-fatal notes raised during admission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    LongDistance { distance_km: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LongDistance { distance_km } => write!(
                f,
                "Long distance ({distance_km} km); delivery may take additional time"
            ),
        }
    }
}

/// A draft on its way through the pipeline, plus everything derived so far.
#[derive(Debug)]
pub struct Admission<'a> {
    pub draft: &'a ShipmentDraft,
    pub service_class: Option<ServiceClass>,
    pub distance_km: f64,
    pub requires_insurance: bool,
    pub advisories: Vec<Advisory>,
}

impl<'a> Admission<'a> {
    pub fn new(draft: &'a ShipmentDraft) -> Self {
        Self {
            draft,
            service_class: None,
            distance_km: 0.0,
            requires_insurance: false,
            advisories: vec![],
        }
    }

    /// The admitted service class and fields. Cost starts at zero and is
    /// priced by the engine right after.
    pub fn finish(self) -> Result<(ServiceClass, ShipmentFields), ValidationError> {
        let service_class = self.service_class.ok_or_else(|| {
            ValidationError::InvalidServiceClass(self.draft.service_class.clone())
        })?;
        let draft = self.draft;

        let fields = ShipmentFields {
            sender: draft.sender.clone(),
            recipient: draft.recipient.clone(),
            origin_address: draft.origin_address.clone(),
            destination_address: draft.destination_address.clone(),
            weight_kg: draft.weight_kg,
            description: draft.description.clone(),
            is_fragile: draft.is_fragile,
            requires_insurance: self.requires_insurance,
            distance_km: self.distance_km,
            cost: 0.0,
        };

        Ok((service_class, fields))
    }
}

pub type Check = fn(&mut Admission<'_>) -> Result<(), ValidationError>;

pub fn check_completeness(admission: &mut Admission<'_>) -> Result<(), ValidationError> {
    let draft = admission.draft;
    if draft.sender.is_empty() || draft.recipient.is_empty() {
        return Err(ValidationError::IncompleteData(
            "sender or recipient is empty".into(),
        ));
    }
    if draft.origin_address.is_empty() || draft.destination_address.is_empty() {
        return Err(ValidationError::IncompleteData(
            "origin or destination address is missing".into(),
        ));
    }
    Ok(())
}

pub fn check_weight(admission: &mut Admission<'_>) -> Result<(), ValidationError> {
    let weight = admission.draft.weight_kg;
    // NaN fails the range test too
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight) {
        return Err(ValidationError::WeightOutOfRange {
            weight,
            min: MIN_WEIGHT_KG,
            max: MAX_WEIGHT_KG,
        });
    }
    Ok(())
}

pub fn check_service_class(admission: &mut Admission<'_>) -> Result<(), ValidationError> {
    admission.service_class = Some(admission.draft.service_class.parse()?);
    Ok(())
}

pub fn check_distance(admission: &mut Admission<'_>) -> Result<(), ValidationError> {
    let distance_km = placeholder_distance_km(&admission.draft.destination_address);
    admission.distance_km = distance_km;

    if admission.service_class == Some(ServiceClass::Express)
        && distance_km > EXPRESS_MAX_DISTANCE_KM
    {
        return Err(ValidationError::ServiceDistanceViolation {
            distance_km,
            limit_km: EXPRESS_MAX_DISTANCE_KM,
        });
    }
    if distance_km > LONG_DISTANCE_ADVISORY_KM {
        admission
            .advisories
            .push(Advisory::LongDistance { distance_km });
    }
    Ok(())
}

pub fn check_insurance(admission: &mut Admission<'_>) -> Result<(), ValidationError> {
    if admission.draft.weight_kg > INSURANCE_WEIGHT_THRESHOLD_KG || admission.draft.is_fragile {
        admission.requires_insurance = true;
    }
    Ok(())
}

pub struct Pipeline {
    checks: Vec<(&'static str, Check)>,
}

impl Pipeline {
    /// Completeness, weight, service class, distance, insurance.
    pub fn standard() -> Self {
        Self {
            checks: vec![
                ("completeness", check_completeness as Check),
                ("weight", check_weight as Check),
                ("service_class", check_service_class as Check),
                ("distance", check_distance as Check),
                ("insurance", check_insurance as Check),
            ],
        }
    }

    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|(name, _)| *name)
    }

    pub fn validate(&self, admission: &mut Admission<'_>) -> Result<(), ValidationError> {
        for (name, check) in &self.checks {
            if let Err(err) = check(admission) {
                warn!(check = *name, %err, "validation check failed");
                return Err(err);
            }
            debug!(check = *name, "validation check passed");
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
