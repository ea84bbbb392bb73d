//! Smoke Screen Unit tests for shipment tracker components
//!
//! These tests span the codebase through its public API, one module at a
//! time. They are intended as a smoke screen and mostly cover the happy path.

use shipment_tracker::{
    Engine, EngineConfig, FieldChange, LifecycleState, ServiceClass, ShipmentDraft,
    ShipmentError, ValidationError,
    utils::cbor_digest,
    validation::{Admission, Advisory, Pipeline, placeholder_distance_km},
};
use std::io::Write;

fn standard_draft() -> ShipmentDraft {
    ShipmentDraft::new()
        .set_service_class("Standard")
        .set_sender("Laura Gomez")
        .set_recipient("Diego Hernandez")
        .set_origin("Calle Principal 123")
        .set_destination("Avenida Secundaria 456") // 22 chars, 220 km
        .set_weight(12.0)
        .set_description("Books")
}

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Digest is a 64 character hex string and stable for equal input
    #[test]
    fn digest_is_stable_hex() {
        let (a, bytes_a) = cbor_digest(&"parcel").unwrap();
        let (b, bytes_b) = cbor_digest(&"parcel").unwrap();

        assert_eq!(a, b);
        assert_eq!(bytes_a, bytes_b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

// SHIPMENT MODULE TESTS
#[cfg(test)]
mod shipment_tests {
    use super::*;

    /// Service classes parse from their labels regardless of case
    #[test]
    fn service_class_labels_round_trip() {
        for class in ServiceClass::ALL {
            assert_eq!(class.label().parse::<ServiceClass>(), Ok(class));
            assert_eq!(
                class.label().to_uppercase().parse::<ServiceClass>(),
                Ok(class)
            );
        }
    }

    /// The draft keeps the raw service class label until admission
    #[test]
    fn draft_keeps_raw_label() {
        let draft = standard_draft().set_service_class("Teleport");
        assert_eq!(draft.service_class_label(), "Teleport");
    }

    /// Created shipments expose every field through accessors
    #[test]
    fn created_shipment_accessors() {
        let mut engine = Engine::default();
        let shipment = engine.create_shipment(standard_draft()).unwrap();

        assert_eq!(shipment.id().as_str(), "SHIP-00001");
        assert_eq!(shipment.service_class(), ServiceClass::Standard);
        assert_eq!(shipment.sender(), "Laura Gomez");
        assert_eq!(shipment.recipient(), "Diego Hernandez");
        assert_eq!(shipment.origin_address(), "Calle Principal 123");
        assert_eq!(shipment.destination_address(), "Avenida Secundaria 456");
        assert_eq!(shipment.weight_kg(), 12.0);
        assert_eq!(shipment.description(), Some("Books"));
        assert!(!shipment.is_fragile());
        assert!(!shipment.requires_insurance());
        assert_eq!(shipment.distance_km(), 220.0);
        assert_eq!(shipment.cost(), 12.0 * 8.0 + 220.0 * 0.5);
        assert_eq!(shipment.state(), LifecycleState::Pending);
    }

    /// Ids are handed out sequentially
    #[test]
    fn ids_are_sequential() {
        let mut engine = Engine::default();
        let first = engine.create_shipment(standard_draft()).unwrap();
        let second = engine.create_shipment(standard_draft()).unwrap();

        assert_eq!(first.id().as_str(), "SHIP-00001");
        assert_eq!(second.id().as_str(), "SHIP-00002");
    }
}

// VALIDATION MODULE TESTS
#[cfg(test)]
mod validation_tests {
    use super::*;

    /// A complete draft passes every check
    #[test]
    fn complete_draft_passes() {
        let draft = standard_draft();
        let mut admission = Admission::new(&draft);

        assert!(Pipeline::standard().validate(&mut admission).is_ok());
        assert_eq!(admission.service_class, Some(ServiceClass::Standard));
        assert_eq!(admission.distance_km, 220.0);
    }

    /// Missing addresses fail with incomplete data
    #[test]
    fn missing_origin_fails() {
        let draft = standard_draft().set_origin("");
        let mut admission = Admission::new(&draft);

        assert!(matches!(
            Pipeline::standard().validate(&mut admission),
            Err(ValidationError::IncompleteData(_))
        ));
    }

    /// Long routes carry an advisory but are admitted
    #[test]
    fn long_route_advisory() {
        let destination = "z".repeat(250);
        let draft = standard_draft().set_destination(destination.clone());
        let mut admission = Admission::new(&draft);

        assert!(Pipeline::standard().validate(&mut admission).is_ok());
        assert_eq!(
            admission.advisories,
            vec![Advisory::LongDistance {
                distance_km: placeholder_distance_km(&destination)
            }]
        );
    }
}

// STATE MODULE TESTS
#[cfg(test)]
mod state_tests {
    use super::*;

    /// Advancing walks the happy path one step at a time
    #[test]
    fn advance_walks_the_lifecycle() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        let expected = [
            LifecycleState::InProcess,
            LifecycleState::InTransit,
            LifecycleState::InDistribution,
            LifecycleState::Delivered,
        ];
        for state in expected {
            let transition = engine.advance_state(&id).unwrap();
            assert_eq!(transition.to, state);
            assert_eq!(engine.get_shipment(&id).unwrap().state(), state);
        }
    }

    /// State detail follows the current state
    #[test]
    fn state_detail_follows_state() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        assert_eq!(
            engine.state_detail(&id).unwrap(),
            LifecycleState::Pending.detail()
        );
        engine.advance_state(&id).unwrap();
        assert_eq!(
            engine.state_detail(&id).unwrap(),
            LifecycleState::InProcess.detail()
        );
    }
}

// HISTORY MODULE TESTS
#[cfg(test)]
mod history_tests {
    use super::*;

    /// A new shipment starts with exactly one "Created" snapshot
    #[test]
    fn creation_records_initial_snapshot() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        let history = engine.get_history(&id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].description, "Created");
        assert_eq!(history[0].state_name, "Pending");
        assert!(history[0].is_current);
        assert_eq!(history[0].position, 1);
    }

    /// Undo on a fresh shipment reports nothing to undo
    #[test]
    fn nothing_to_undo_on_fresh_shipment() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        assert!(matches!(
            engine.undo(&id),
            Err(ShipmentError::NothingToUndo(_))
        ));
        assert!(matches!(
            engine.redo(&id),
            Err(ShipmentError::NothingToRedo(_))
        ));
    }

    /// Each modification adds one snapshot
    #[test]
    fn modifications_add_snapshots() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        engine
            .modify_field(&id, FieldChange::Sender("Ana".into()))
            .unwrap();
        engine
            .modify_field(&id, FieldChange::Fragile(true))
            .unwrap();

        let history = engine.history(&id).unwrap();
        assert_eq!(history.len(), 2 + 1);
        assert_eq!(history.position(), (3, 3));
        assert_eq!(history.current().description(), "Marked as fragile");
    }
}

// OPERATIONS MODULE TESTS
#[cfg(test)]
mod operations_tests {
    use super::*;

    /// Delivery time for a standard shipment over 220 km
    #[test]
    fn delivery_time() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        // 1 processing day + floor(220 / 300) + 1
        assert_eq!(engine.compute_delivery_time(&id).unwrap(), 2);
    }

    /// Light standard shipments over short distances get no discount
    #[test]
    fn no_discount_for_light_standard() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        assert_eq!(engine.compute_discount(&id).unwrap(), 0.0);
    }

    /// The report names the shipment
    #[test]
    fn report_mentions_shipment() {
        let mut engine = Engine::default();
        let id = engine.create_shipment(standard_draft()).unwrap().id().to_string();

        let report = engine.generate_report(&id).unwrap();
        assert!(report.contains("SHIPMENT REPORT - SHIP-00001"));
        assert!(report.contains("Description: Books"));
    }
}

// CONFIG MODULE TESTS
#[cfg(test)]
mod config_tests {
    use super::*;

    /// Config files are read from disk
    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "history_capacity = 7").unwrap();
        writeln!(file, "log_filter = \"shipment_tracker=debug\"").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.history_capacity, 7);
        assert_eq!(config.log_filter, "shipment_tracker=debug");

        let engine = Engine::new(config);
        assert_eq!(engine.config().history_capacity, 7);
    }
}
