//! One-shot recommendation prompt.

use pumpwise_core::spec::SpecificationRecord;

/// System role for the one-shot "generate solution" request.
pub const RECOMMENDATION_SYSTEM_ROLE: &str =
    "You are an assistant knowledgeable in pump selection.";

/// Closing instruction of the recommendation prompt.
pub const RECOMMENDATION_INSTRUCTION: &str = "Suggest a suitable pump solution:";

/// The user prompt listing every field of `record`, one per line.
pub fn recommendation_prompt(record: &SpecificationRecord) -> String {
    format!(
        "Head: {} m\n\
         Flow: {} m³/h\n\
         Material: {}\n\
         Type of Fluid: {}\n\
         Pumping Temperature: {} °C\n\
         Type of Pump: {}\n\
         Sealing System: {}\n\
         Area of Installation: {}\n\
         Ambient Temperature: {} °C\n\
         Description: {}\n\n\
         {RECOMMENDATION_INSTRUCTION}",
        record.head,
        record.flow,
        record.material,
        record.fluid_type,
        record.pumping_temperature,
        record.pump_type,
        record.sealing_system,
        record.installation_area,
        record.ambient_temperature,
        record.description,
    )
}
