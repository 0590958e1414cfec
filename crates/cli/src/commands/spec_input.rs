//! Building a specification record from flags or a spec file.

use clap::Args;
use pumpwise_core::spec::{FluidType, Material, PumpType, SealingSystem, SpecificationRecord};
use std::path::{Path, PathBuf};

/// Temperature used when a flag is left out, in °C.
const DEFAULT_TEMPERATURE_C: f64 = 20.0;

#[derive(Args, Debug, Default, Clone)]
pub struct SpecArgs {
    /// Read the whole specification from a TOML or JSON file
    #[arg(
        long = "spec",
        value_name = "FILE",
        conflicts_with_all = [
            "head", "flow", "material", "fluid", "pumping_temperature", "pump_type",
            "sealing", "area", "ambient_temperature", "description",
        ]
    )]
    pub spec_file: Option<PathBuf>,

    /// Total head in m
    #[arg(long, allow_negative_numbers = true)]
    pub head: Option<f64>,

    /// Flow in m³/h
    #[arg(long, allow_negative_numbers = true)]
    pub flow: Option<f64>,

    /// Casing material (see `pumpwise options`)
    #[arg(long)]
    pub material: Option<Material>,

    /// Type of pumped fluid
    #[arg(long)]
    pub fluid: Option<FluidType>,

    /// Pumping temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    pub pumping_temperature: Option<f64>,

    /// Type of pump
    #[arg(long)]
    pub pump_type: Option<PumpType>,

    /// Sealing system
    #[arg(long)]
    pub sealing: Option<SealingSystem>,

    /// Area of installation
    #[arg(long)]
    pub area: Option<String>,

    /// Ambient temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    pub ambient_temperature: Option<f64>,

    /// Free-text description of the application
    #[arg(long)]
    pub description: Option<String>,
}

impl SpecArgs {
    fn has_field_flags(&self) -> bool {
        self.head.is_some()
            || self.flow.is_some()
            || self.material.is_some()
            || self.fluid.is_some()
            || self.pumping_temperature.is_some()
            || self.pump_type.is_some()
            || self.sealing.is_some()
            || self.area.is_some()
            || self.ambient_temperature.is_some()
            || self.description.is_some()
    }

    /// The record the user asked for, or `None` when nothing was given.
    pub fn record(&self) -> Result<Option<SpecificationRecord>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.spec_file {
            return Ok(Some(load_spec_file(path)?));
        }
        if !self.has_field_flags() {
            return Ok(None);
        }
        Ok(Some(self.record_with_defaults()?))
    }

    /// Build a record, filling missing flags with form defaults.
    pub fn record_with_defaults(&self) -> Result<SpecificationRecord, Box<dyn std::error::Error>> {
        if let Some(path) = &self.spec_file {
            return load_spec_file(path);
        }

        let record = SpecificationRecord {
            head: self.head.unwrap_or(0.0),
            flow: self.flow.unwrap_or(0.0),
            material: self.material.unwrap_or(Material::ALL[0]),
            fluid_type: self.fluid.unwrap_or(FluidType::ALL[0]),
            pumping_temperature: self.pumping_temperature.unwrap_or(DEFAULT_TEMPERATURE_C),
            pump_type: self.pump_type.unwrap_or(PumpType::ALL[0]),
            sealing_system: self.sealing.unwrap_or(SealingSystem::ALL[0]),
            installation_area: self.area.clone().unwrap_or_default(),
            ambient_temperature: self.ambient_temperature.unwrap_or(DEFAULT_TEMPERATURE_C),
            description: self.description.clone().unwrap_or_default(),
        };

        Ok(record.validated()?)
    }
}

/// Parse a spec file: JSON for `.json`, TOML otherwise.
pub fn load_spec_file(path: &Path) -> Result<SpecificationRecord, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_spec(&content, path)
}

fn parse_spec(content: &str, path: &Path) -> Result<SpecificationRecord, Box<dyn std::error::Error>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let record: SpecificationRecord = if is_json {
        serde_json::from_str(content).map_err(|e| format!("Invalid spec {}: {e}", path.display()))?
    } else {
        toml::from_str(content).map_err(|e| format!("Invalid spec {}: {e}", path.display()))?
    };

    Ok(record.validated()?)
}
