//! Context derivation for chat turns.
//!
//! The context string is rebuilt from the current specification record on
//! every provider call and sent as the system message. It is never cached
//! and never stored in the message log, so replacing the record takes effect
//! on the very next turn.
//!
//! # Determinism
//!
//! [`ContextBuilder::build`] is a pure function of the record: equal records
//! yield byte-identical strings, and records differing in any field yield
//! different strings. Numbers use Rust's shortest round-trip float
//! formatting and free-text fields are quoted and escaped, so no two field
//! values can render the same way.

use pumpwise_core::spec::SpecificationRecord;

/// Stateless builder for the per-call context message.
pub struct ContextBuilder;

impl ContextBuilder {
    /// Render every field of `record` in a fixed label order.
    pub fn build(record: &SpecificationRecord) -> String {
        format!(
            "Pump Data: Head - {head} m, Flow - {flow} m³/h, Material - {material}, \
             Type of Fluid - {fluid}, Pumping Temperature - {pumping} °C, \
             Type of Pump - {pump}, Sealing System - {sealing}, \
             Area of Installation - {area:?}, Ambient Temperature - {ambient} °C, \
             Description - {description:?}\n",
            head = record.head,
            flow = record.flow,
            material = record.material,
            fluid = record.fluid_type,
            pumping = record.pumping_temperature,
            pump = record.pump_type,
            sealing = record.sealing_system,
            area = record.installation_area,
            ambient = record.ambient_temperature,
            description = record.description,
        )
    }

    /// Context used for chat turns before any record has been submitted.
    pub fn placeholder() -> String {
        "Pump Data: not provided yet. Head, Flow, Material, Type of Fluid, \
         Pumping Temperature, Type of Pump, Sealing System, Area of Installation, \
         Ambient Temperature and Description are all unknown.\n"
            .to_string()
    }

    /// Context for an optional record: the record itself, or the placeholder.
    pub fn for_record(record: Option<&SpecificationRecord>) -> String {
        record.map_or_else(Self::placeholder, Self::build)
    }
}
