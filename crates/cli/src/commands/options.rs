//! `pumpwise options`: List accepted values for the specification fields.

use pumpwise_core::spec::{ABSOLUTE_ZERO_C, FluidType, Material, PumpType, SealingSystem};

fn labels<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 Specification Fields");
    println!("=======================");
    println!();
    println!("  --material             {}", labels(Material::ALL));
    println!("  --fluid                {}", labels(FluidType::ALL));
    println!("  --pump-type            {}", labels(PumpType::ALL));
    println!("  --sealing              {}", labels(SealingSystem::ALL));
    println!();
    println!("  --head                 m, at least 0");
    println!("  --flow                 m³/h, at least 0");
    println!("  --pumping-temperature  °C, at least {ABSOLUTE_ZERO_C}");
    println!("  --ambient-temperature  °C, at least {ABSOLUTE_ZERO_C}");
    println!("  --area, --description  free text");
    println!();
    println!("  Values are matched ignoring case and punctuation,");
    println!("  so \"seal-less\" and \"SealLess\" are the same.");

    Ok(())
}
