use std::path::PathBuf;

/// Admission failures. Raised only while a shipment is being created.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Incomplete data: {0}")]
    IncompleteData(String),
    #[error("Weight {weight} kg is outside the permitted range [{min}, {max}] kg")]
    WeightOutOfRange { weight: f64, min: f64, max: f64 },
    #[error("Invalid service class '{0}'. Valid classes: Express, Standard, Economy")]
    InvalidServiceClass(String),
    #[error("Express service is limited to {limit_km} km (distance: {distance_km} km)")]
    ServiceDistanceViolation { distance_km: f64, limit_km: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum ShipmentError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Shipment {0} not found")]
    NotFound(String),
    #[error("Field '{0}' is not modifiable. Fields: sender, recipient, weight, destination, fragile")]
    UnknownField(String),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Nothing to undo for shipment {0}")]
    NothingToUndo(String),
    #[error("Nothing to redo for shipment {0}")]
    NothingToRedo(String),
    #[error("Failed to encode snapshot fields")]
    Encoding(#[from] minicbor::encode::Error<std::convert::Infallible>),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("History capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),
}
