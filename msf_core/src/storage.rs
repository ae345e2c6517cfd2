// msf_core/src/storage.rs

use crate::error::{ConfigError, LookupError};
use crate::layout::StateSchema;
use crate::modules::SensorModule;
use crate::types::ModuleId;
use std::collections::HashMap;

/// The ordered, heterogeneous container of per-module runtime data.
///
/// Built once, from the same configuration the schema was composed from:
/// one boxed [`SensorModule`] instance per descriptor, in declaration
/// order. Construction cross-checks the instances against the schema, so a
/// lookup that succeeds on the schema also succeeds here. The shape is
/// fixed for the lifetime of the estimator that owns it — no inserts, no
/// removals, no re-keying.
#[derive(Debug, Clone)]
pub struct ModuleStorage {
    instances: Vec<Box<dyn SensorModule>>,
    // Name -> position in `instances`; same order as the schema entries.
    index: HashMap<ModuleId, usize>,
}

impl ModuleStorage {
    /// Builds storage for `schema` from the module instances.
    ///
    /// The instances must match the schema's modules exactly: same count,
    /// same ids, same declaration order. A mismatch is a configuration
    /// fault and fails here, once, rather than surfacing later as a failed
    /// per-measurement lookup.
    pub fn new(
        schema: &StateSchema,
        instances: Vec<Box<dyn SensorModule>>,
    ) -> Result<Self, ConfigError> {
        if instances.len() != schema.num_modules() {
            return Err(ConfigError::StorageLengthMismatch {
                expected: schema.num_modules(),
                found: instances.len(),
            });
        }

        let mut index = HashMap::with_capacity(instances.len());
        for (position, (desc, instance)) in
            schema.descriptors().zip(instances.iter()).enumerate()
        {
            if instance.id() != &desc.id {
                return Err(ConfigError::StorageMismatch {
                    position,
                    expected: desc.id.clone(),
                    found: instance.id().clone(),
                });
            }
            index.insert(desc.id.clone(), position);
        }

        Ok(Self { instances, index })
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Shared access to a module's instance data.
    pub fn get(&self, id: &ModuleId) -> Result<&dyn SensorModule, LookupError> {
        self.position(id).map(|i| self.instances[i].as_ref())
    }

    /// Mutable access to a module's instance data, e.g. for a measurement
    /// model updating its calibration.
    pub fn get_mut(&mut self, id: &ModuleId) -> Result<&mut dyn SensorModule, LookupError> {
        let i = self.position(id)?;
        Ok(self.instances[i].as_mut())
    }

    /// The instances in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn SensorModule> {
        self.instances.iter().map(|b| b.as_ref())
    }

    fn position(&self, id: &ModuleId) -> Result<usize, LookupError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LookupError::UnknownModule(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleDescriptor;
    use std::any::Any;

    #[derive(Debug, Clone)]
    struct Gps {
        id: ModuleId,
        antenna_lever_arm: [f64; 3],
    }

    impl SensorModule for Gps {
        fn id(&self) -> &ModuleId {
            &self.id
        }

        fn describe(&self) -> String {
            format!("gps '{}', lever arm {:?}", self.id, self.antenna_lever_arm)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug, Clone)]
    struct Baro {
        id: ModuleId,
        reference_pressure: f64,
    }

    impl SensorModule for Baro {
        fn id(&self) -> &ModuleId {
            &self.id
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn schema() -> StateSchema {
        StateSchema::compose(&[
            ModuleDescriptor::new("gps", 3, 0, 0),
            ModuleDescriptor::new("baro", 1, 1, 0),
        ])
        .unwrap()
    }

    fn instances() -> Vec<Box<dyn SensorModule>> {
        vec![
            Box::new(Gps {
                id: ModuleId::from("gps"),
                antenna_lever_arm: [0.1, 0.0, -0.3],
            }),
            Box::new(Baro {
                id: ModuleId::from("baro"),
                reference_pressure: 101_325.0,
            }),
        ]
    }

    #[test]
    fn lookup_and_downcast_by_identity() {
        let mut storage = ModuleStorage::new(&schema(), instances()).unwrap();
        assert_eq!(storage.len(), 2);

        let baro = storage.get_mut(&ModuleId::from("baro")).unwrap();
        let baro = baro.as_any_mut().downcast_mut::<Baro>().unwrap();
        baro.reference_pressure = 99_000.0;

        let baro = storage.get(&ModuleId::from("baro")).unwrap();
        let baro = baro.as_any().downcast_ref::<Baro>().unwrap();
        assert_eq!(baro.reference_pressure, 99_000.0);

        let gps = storage.get(&ModuleId::from("gps")).unwrap();
        assert!(gps.describe().contains("lever arm"));
    }

    #[test]
    fn unknown_identity_is_rejected() {
        let mut storage = ModuleStorage::new(&schema(), instances()).unwrap();
        let lidar = ModuleId::from("lidar");
        assert_eq!(
            storage.get(&lidar).err(),
            Some(LookupError::UnknownModule(lidar.clone()))
        );
        assert_eq!(
            storage.get_mut(&lidar).err(),
            Some(LookupError::UnknownModule(lidar))
        );
    }

    #[test]
    fn construction_rejects_a_short_list() {
        let mut short = instances();
        short.pop();
        assert_eq!(
            ModuleStorage::new(&schema(), short).err(),
            Some(ConfigError::StorageLengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn construction_rejects_reordered_instances() {
        let mut swapped = instances();
        swapped.swap(0, 1);
        assert_eq!(
            ModuleStorage::new(&schema(), swapped).err(),
            Some(ConfigError::StorageMismatch {
                position: 0,
                expected: ModuleId::from("gps"),
                found: ModuleId::from("baro"),
            })
        );
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let storage = ModuleStorage::new(&schema(), instances()).unwrap();
        let order: Vec<String> = storage.iter().map(|m| m.id().to_string()).collect();
        assert_eq!(order, ["gps", "baro"]);
    }
}
