//! The pump specification record and its closed value sets.
//!
//! A [`SpecificationRecord`] is captured once per "generate" action and is
//! never edited afterwards: a new submission produces a new record that
//! supersedes the old one.

use crate::error::SpecError;
use serde::{Deserialize, Serialize};

/// Lowest physically meaningful temperature, in °C.
pub const ABSOLUTE_ZERO_C: f64 = -273.0;

/// Defines a closed set of labelled values.
///
/// Parsing is lenient about case, spaces and punctuation so that
/// `"Seal-less"`, `"seal_less"` and `"SEALLESS"` all name the same value.
/// Serialization always uses the canonical label.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value, in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = SpecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.label()) == wanted)
                    .ok_or_else(|| SpecError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = SpecError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.label().to_string()
            }
        }
    };
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

closed_set! {
    /// Wetted-part material.
    Material, "material" {
        Steel => "Steel",
        Copper => "Copper",
        Aluminum => "Aluminum",
        Plastic => "Plastic",
    }
}

closed_set! {
    /// The pumped medium.
    FluidType, "fluid type" {
        Water => "Water",
        Oil => "Oil",
        Chemicals => "Chemicals",
        Other => "Other",
    }
}

closed_set! {
    /// Pump construction family.
    PumpType, "pump type" {
        Centrifugal => "Centrifugal",
        PositiveDisplacement => "Positive Displacement",
        Submersible => "Submersible",
        Other => "Other",
    }
}

closed_set! {
    /// Shaft sealing arrangement.
    SealingSystem, "sealing system" {
        MechanicalSeal => "Mechanical Seal",
        PackingSeal => "Packing Seal",
        /// Magnetic drive or canned motor; no shaft seal at all
        SealLess => "Seal-less",
    }
}

/// The engineering parameters a recommendation is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRecord {
    /// Total head, in meters
    pub head: f64,

    /// Volume flow, in cubic meters per hour
    pub flow: f64,

    pub material: Material,

    pub fluid_type: FluidType,

    /// Temperature of the pumped fluid, in °C
    pub pumping_temperature: f64,

    pub pump_type: PumpType,

    pub sealing_system: SealingSystem,

    /// Where the pump will be installed (free text)
    #[serde(default)]
    pub installation_area: String,

    /// Temperature around the installation, in °C
    pub ambient_temperature: f64,

    /// Free-text description of the application
    #[serde(default)]
    pub description: String,
}

impl SpecificationRecord {
    /// Check the numeric floors. Enum fields are closed by construction.
    pub fn validate(&self) -> Result<(), SpecError> {
        check("head", self.head, 0.0)?;
        check("flow", self.flow, 0.0)?;
        check("pumping temperature", self.pumping_temperature, ABSOLUTE_ZERO_C)?;
        check("ambient temperature", self.ambient_temperature, ABSOLUTE_ZERO_C)?;
        Ok(())
    }

    /// Validate and return the record, for use in builder-style chains.
    pub fn validated(self) -> Result<Self, SpecError> {
        self.validate()?;
        Ok(self)
    }
}

fn check(field: &'static str, value: f64, floor: f64) -> Result<(), SpecError> {
    if !value.is_finite() {
        return Err(SpecError::NotFinite { field });
    }
    if value < floor {
        return Err(SpecError::BelowFloor {
            field,
            floor,
            value,
        });
    }
    Ok(())
}
