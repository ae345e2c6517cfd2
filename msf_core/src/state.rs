// msf_core/src/state.rs

use crate::error::LookupError;
use crate::layout::{CoreState, StateSchema};
use crate::types::{ModuleId, StateKind, StateSpace};
use nalgebra::{DMatrix, DVector};

/// The numeric containers of one filter instance, allocated from a schema.
///
/// Bundles the nominal state vector `x`, the error state vector `dx`, the
/// error covariance `P` and the timestamp of the last update. The filter
/// recursion itself lives with the estimator; this struct only guarantees
/// that the containers have the schema's dimensions and start out valid.
#[derive(Debug, Clone)]
pub struct FilterState {
    schema: StateSchema,
    /// The nominal state vector `x`.
    pub nominal: DVector<f64>,
    /// The error state vector `dx`, reset to zero after each injection.
    pub error: DVector<f64>,
    /// The error covariance matrix `P`, sized by the error state.
    pub covariance: DMatrix<f64>,
    /// The timestamp of the last update.
    pub last_update_timestamp: f64,
}

impl FilterState {
    /// Allocates zeroed vectors and a scaled-identity covariance.
    ///
    /// Every quaternion in the nominal state is initialized to identity:
    /// the core attitude plus one per rotational block of every module.
    /// This is critical to prevent NaN values from an invalid zero
    /// quaternion the moment anything normalizes or rotates through it.
    pub fn new(schema: StateSchema, initial_covariance_val: f64, timestamp: f64) -> Self {
        let mut nominal = DVector::zeros(schema.nominal_dim());
        let error = DVector::zeros(schema.error_dim());
        let covariance =
            DMatrix::identity(schema.error_dim(), schema.error_dim()) * initial_covariance_val;

        // Quaternions are stored [x, y, z, w]; set each 'w' to 1.
        let attitude = schema.resolve_core(CoreState::Attitude, StateSpace::Nominal);
        nominal[attitude.offset + 3] = 1.0;

        for entry in schema.modules() {
            let count = entry.descriptor.num_rotational;
            if count == 0 {
                continue;
            }
            // The resolve cannot fail: the module came from this schema
            // and declares a non-zero rotational count.
            if let Ok(block) =
                schema.resolve_module(&entry.descriptor.id, StateKind::Rotational, StateSpace::Nominal)
            {
                for q in 0..count {
                    nominal[block.offset + 4 * q + 3] = 1.0;
                }
            }
        }

        Self {
            schema,
            nominal,
            error,
            covariance,
            last_update_timestamp: timestamp,
        }
    }

    /// The schema these containers were allocated from.
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    pub fn nominal_dim(&self) -> usize {
        self.schema.nominal_dim()
    }

    pub fn error_dim(&self) -> usize {
        self.schema.error_dim()
    }

    /// The nominal-state slice of a core quantity.
    pub fn core(&self, label: CoreState) -> &[f64] {
        let block = self.schema.resolve_core(label, StateSpace::Nominal);
        &self.nominal.as_slice()[block.as_range()]
    }

    pub fn core_mut(&mut self, label: CoreState) -> &mut [f64] {
        let block = self.schema.resolve_core(label, StateSpace::Nominal);
        &mut self.nominal.as_mut_slice()[block.as_range()]
    }

    /// The nominal-state slice of one kind of a module's extra states.
    pub fn module(&self, id: &ModuleId, kind: StateKind) -> Result<&[f64], LookupError> {
        let block = self.schema.resolve_module(id, kind, StateSpace::Nominal)?;
        Ok(&self.nominal.as_slice()[block.as_range()])
    }

    pub fn module_mut(&mut self, id: &ModuleId, kind: StateKind) -> Result<&mut [f64], LookupError> {
        let block = self.schema.resolve_module(id, kind, StateSpace::Nominal)?;
        Ok(&mut self.nominal.as_mut_slice()[block.as_range()])
    }

    /// Zeroes the error vector, as done after injecting it into the
    /// nominal state.
    pub fn reset_error(&mut self) {
        self.error.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleDescriptor;
    use approx::assert_abs_diff_eq;

    fn schema() -> StateSchema {
        StateSchema::compose(&[
            ModuleDescriptor::new("gps", 3, 0, 0),
            ModuleDescriptor::new("camera", 2, 1, 2),
        ])
        .unwrap()
    }

    #[test]
    fn containers_get_the_schema_dimensions() {
        let state = FilterState::new(schema(), 0.1, 0.0);
        // 16 + 1 + 8 and 15 + 1 + 6
        assert_eq!(state.nominal.len(), 25);
        assert_eq!(state.error.len(), 21);
        assert_eq!(state.covariance.nrows(), 21);
        assert_eq!(state.covariance.ncols(), 21);
        assert_abs_diff_eq!(state.covariance[(0, 0)], 0.1);
        assert_abs_diff_eq!(state.covariance[(0, 1)], 0.0);
    }

    #[test]
    fn every_quaternion_starts_at_identity() {
        let state = FilterState::new(schema(), 1.0, 0.0);

        let attitude = state.core(CoreState::Attitude);
        assert_eq!(attitude, [0.0, 0.0, 0.0, 1.0]);

        let camera = ModuleId::from("camera");
        let extrinsics = state.module(&camera, StateKind::Rotational).unwrap();
        assert_eq!(extrinsics, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

        // Everything that is not a quaternion 'w' stays zero.
        let ones = state.nominal.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(ones, 3);
        assert_abs_diff_eq!(state.nominal.sum(), 3.0);
    }

    #[test]
    fn block_accessors_write_through() {
        let mut state = FilterState::new(schema(), 1.0, 0.0);

        state.core_mut(CoreState::Velocity).copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(state.core(CoreState::Velocity), [1.0, 2.0, 3.0]);
        // Velocity occupies indices 3..6 of the nominal vector.
        assert_abs_diff_eq!(state.nominal[3], 1.0);
        assert_abs_diff_eq!(state.nominal[5], 3.0);

        let camera = ModuleId::from("camera");
        state.module_mut(&camera, StateKind::Linear).unwrap()[0] = 0.5;
        assert_eq!(state.module(&camera, StateKind::Linear).unwrap(), [0.5]);

        let gps = ModuleId::from("gps");
        assert!(state.module(&gps, StateKind::Linear).is_err());
    }

    #[test]
    fn reset_error_zeroes_the_tangent_vector() {
        let mut state = FilterState::new(schema(), 1.0, 0.0);
        state.error[4] = 0.25;
        state.reset_error();
        assert_abs_diff_eq!(state.error.norm(), 0.0);
    }
}
