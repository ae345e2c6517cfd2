// msf_core/src/modules.rs

use crate::error::ConfigError;
use crate::types::ModuleId;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

/// Static declaration of one sensor module's state-vector geometry.
///
/// A descriptor is a configuration fact: created when the filter is
/// configured, never mutated afterwards. It says nothing about *where* the
/// module's states live; offsets are assigned by the schema composer so
/// that a module never needs to know its own position in the vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique name of the module within one configuration.
    pub id: ModuleId,
    /// Number of scalars in the module's measurement vector `z`.
    pub measurement_size: usize,
    /// Extra additive states, same count in nominal and error space.
    #[serde(default)]
    pub num_linear: usize,
    /// Extra rotational blocks. Each contributes one quaternion (4 scalars)
    /// to the nominal state and one tangent vector (3 scalars) to the
    /// error state.
    #[serde(default)]
    pub num_rotational: usize,
}

impl ModuleDescriptor {
    pub fn new(
        id: impl Into<ModuleId>,
        measurement_size: usize,
        num_linear: usize,
        num_rotational: usize,
    ) -> Self {
        Self {
            id: id.into(),
            measurement_size,
            num_linear,
            num_rotational,
        }
    }
}

/// Rejects configurations that must never produce a schema: an empty module
/// list, a module with a zero-sized measurement, or duplicate module names.
///
/// Duplicate detection sorts a copy of the name list and scans adjacent
/// pairs, so the whole check is `O(N log N)` and runs exactly once per
/// configuration attempt. Duplicates are an error, never silently merged.
pub fn validate_modules(descriptors: &[ModuleDescriptor]) -> Result<(), ConfigError> {
    if descriptors.is_empty() {
        return Err(ConfigError::NoModules);
    }

    for desc in descriptors {
        if desc.measurement_size == 0 {
            return Err(ConfigError::ZeroMeasurementSize(desc.id.clone()));
        }
    }

    let mut ids: Vec<&ModuleId> = descriptors.iter().map(|d| &d.id).collect();
    ids.sort_unstable();
    for pair in ids.windows(2) {
        if pair[0] == pair[1] {
            return Err(ConfigError::DuplicateModule(pair[0].clone()));
        }
    }

    Ok(())
}

// --- SENSOR MODULE TRAIT ---
// The runtime half of a sensor: whatever per-module instance data the
// measurement models need (calibration, extrinsics, tuning). The schema
// only ever sees the descriptor; this trait is what `ModuleStorage` holds.
pub trait SensorModule: DynClone + Debug + Send + Sync {
    /// The identity this instance was configured under. Must match the
    /// descriptor the schema was composed from.
    fn id(&self) -> &ModuleId;

    /// Human-readable self-description, used for startup logs and
    /// diagnostics. Override to report calibration state or firmware info.
    fn describe(&self) -> String {
        format!("sensor module '{}'", self.id())
    }

    /// Allows downcasting to the concrete module type.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn SensorModule>`.
dyn_clone::clone_trait_object!(SensorModule);
