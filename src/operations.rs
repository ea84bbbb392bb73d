//! Read-only computations over a shipment
//!
//! Each computation is its own [`Operation`], so a new one can be added
//! without touching [`Shipment`]. Rates and speeds are table lookups on the
//! service class.
use super::shipment::{ServiceClass, Shipment};

pub const RATE_PER_KM: f64 = 0.5;
pub const HEAVY_PARCEL_THRESHOLD_KG: f64 = 50.0;
pub const HEAVY_PARCEL_RATE_PER_KG: f64 = 2.0;
pub const FRAGILE_SURCHARGE: f64 = 50.0;
pub const INSURANCE_RATE: f64 = 0.02;

pub fn rate_per_kg(class: ServiceClass) -> f64 {
    match class {
        ServiceClass::Express => 15.0,
        ServiceClass::Standard => 8.0,
        ServiceClass::Economy => 4.0,
    }
}

pub fn processing_days(class: ServiceClass) -> u32 {
    match class {
        ServiceClass::Express => 0,
        ServiceClass::Standard => 1,
        ServiceClass::Economy => 2,
    }
}

pub fn speed_km_per_day(class: ServiceClass) -> f64 {
    match class {
        ServiceClass::Express => 500.0,
        ServiceClass::Standard => 300.0,
        ServiceClass::Economy => 150.0,
    }
}

pub trait Operation {
    type Output;

    fn apply(&self, shipment: &Shipment) -> Self::Output;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostCalculator;

impl Operation for CostCalculator {
    type Output = f64;

    fn apply(&self, shipment: &Shipment) -> f64 {
        let weight = shipment.weight_kg();

        let mut total =
            weight * rate_per_kg(shipment.service_class()) + shipment.distance_km() * RATE_PER_KM;
        if weight > HEAVY_PARCEL_THRESHOLD_KG {
            total += (weight - HEAVY_PARCEL_THRESHOLD_KG) * HEAVY_PARCEL_RATE_PER_KG;
        }
        if shipment.is_fragile() {
            total += FRAGILE_SURCHARGE;
        }
        // insurance is charged on the running total, surcharges included
        if shipment.requires_insurance() {
            total += total * INSURANCE_RATE;
        }
        total
    }
}

/// Prices `shipment` and stores the result as its cost.
pub fn reprice(shipment: &mut Shipment) -> f64 {
    let cost = CostCalculator.apply(shipment);
    shipment.fields.cost = cost;
    cost
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryEstimator;

impl Operation for DeliveryEstimator {
    /// Whole days.
    type Output = u32;

    fn apply(&self, shipment: &Shipment) -> u32 {
        let class = shipment.service_class();
        let transit_days = (shipment.distance_km() / speed_km_per_day(class)).floor() as u32 + 1;
        let handling_days = u32::from(shipment.is_fragile());

        processing_days(class) + transit_days + handling_days
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountLine {
    pub label: &'static str,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountBreakdown {
    pub cost: f64,
    pub lines: Vec<DiscountLine>,
    pub total: f64,
    pub final_cost: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountCalculator;

impl Operation for DiscountCalculator {
    type Output = DiscountBreakdown;

    fn apply(&self, shipment: &Shipment) -> DiscountBreakdown {
        let cost = shipment.cost();
        let weight = shipment.weight_kg();
        let mut rates = vec![];

        // the two volume tiers are exclusive
        if weight > 100.0 {
            rates.push(("Volume discount (over 100 kg)", 0.10));
        } else if weight > 50.0 {
            rates.push(("Volume discount (over 50 kg)", 0.05));
        }
        if shipment.distance_km() > 1000.0 {
            rates.push(("Long distance discount (over 1000 km)", 0.08));
        }
        if shipment.service_class() == ServiceClass::Economy {
            rates.push(("Economy service discount", 0.05));
        }

        // every rate applies to the undiscounted cost, never compounded
        let lines: Vec<DiscountLine> = rates
            .into_iter()
            .map(|(label, rate)| DiscountLine {
                label,
                rate,
                amount: cost * rate,
            })
            .collect();
        let total = lines.iter().map(|line| line.amount).sum::<f64>();

        DiscountBreakdown {
            cost,
            lines,
            total,
            final_cost: cost - total,
        }
    }
}

pub fn days(count: u32) -> String {
    match count {
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl Operation for ReportGenerator {
    type Output = String;

    fn apply(&self, shipment: &Shipment) -> String {
        let rule = "=".repeat(80);
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let delivery_days = DeliveryEstimator.apply(shipment);

        let report = [
            rule.clone(),
            format!("SHIPMENT REPORT - {}", shipment.id()),
            rule.clone(),
            String::new(),
            "GENERAL INFORMATION:".to_string(),
            format!("  • Shipment ID: {}", shipment.id()),
            format!("  • Service class: {}", shipment.service_class()),
            format!("  • Created at: {}", shipment.created_at()),
            format!("  • Current state: {}", shipment.state().description()),
            String::new(),
            "SENDER:".to_string(),
            format!("  • Name: {}", shipment.sender()),
            format!("  • Address: {}", shipment.origin_address()),
            String::new(),
            "RECIPIENT:".to_string(),
            format!("  • Name: {}", shipment.recipient()),
            format!("  • Address: {}", shipment.destination_address()),
            String::new(),
            "PACKAGE DETAILS:".to_string(),
            format!("  • Weight: {} kg", shipment.weight_kg()),
            format!("  • Distance: {} km", shipment.distance_km()),
            format!("  • Fragile: {}", yes_no(shipment.is_fragile())),
            format!("  • Requires insurance: {}", yes_no(shipment.requires_insurance())),
            format!("  • Description: {}", shipment.description().unwrap_or("N/A")),
            String::new(),
            "COSTS:".to_string(),
            format!("  • Total cost: ${:.2}", shipment.cost()),
            format!("  • Estimated delivery: {}", days(delivery_days)),
            String::new(),
            rule.clone(),
            "END OF REPORT".to_string(),
            rule,
        ];

        report.join("\n")
    }
}
