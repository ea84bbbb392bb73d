//! Walks one shipment through creation, edits, undo/redo and delivery.
//!
//! Pass a TOML config path as the first argument to override the defaults;
//! `RUST_LOG` takes precedence over the configured log filter.
//!
//! ```sh
//! cargo run --example lifecycle
//! RUST_LOG=shipment_tracker=debug cargo run --example lifecycle
//! ```

use anyhow::Context;
use shipment_tracker::{Engine, EngineConfig, FieldChange, ShipmentDraft, operations::days};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => EngineConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let mut engine = Engine::new(config);

    let draft = ShipmentDraft::new()
        .set_service_class("Express")
        .set_sender("Juan Pérez")
        .set_recipient("María García")
        .set_origin("Calle 100 #45-67, Bogotá")
        .set_destination("Carrera 50 #23-45, Medellín")
        .set_weight(25.5)
        .set_description("Electronic documents");

    let shipment = engine.create_shipment(draft).context("creating shipment")?;
    let id = shipment.id().to_string();
    println!("{}", shipment.summary_line());

    // a field edit, then take it back and reapply it
    let change = FieldChange::parse("weight", "30")?;
    let modified = engine.modify_field(&id, change)?;
    println!("modified: {} kg, ${:.2}", modified.weight_kg(), modified.cost());

    let undone = engine.undo(&id)?;
    println!("undone:   {} kg, ${:.2}", undone.weight_kg(), undone.cost());

    let redone = engine.redo(&id)?;
    println!("redone:   {} kg, ${:.2}", redone.weight_kg(), redone.cost());

    loop {
        let transition = engine.advance_state(&id)?;
        if !transition.changed() {
            println!("{}", transition.message);
            break;
        }
        println!("{} -> {}: {}", transition.from, transition.to, transition.message);
    }

    println!("estimated delivery: {}", days(engine.compute_delivery_time(&id)?));
    let breakdown = engine.discount_breakdown(&id)?;
    for line in &breakdown.lines {
        println!("{}: -${:.2}", line.label, line.amount);
    }
    println!("final cost: ${:.2}", breakdown.final_cost);

    println!("{}", engine.history(&id)?.render());
    println!("{}", engine.generate_report(&id)?);

    Ok(())
}
